// Copyright 2026 The rediff Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use thiserror::Error;

use crate::DeltaStatus;

/// Errors that abort loading file histories.
///
/// None of these are recoverable: a load either produces every history or
/// nothing.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// A commit in the range has more than one parent.
    #[error("merge commit {commit} is not supported")]
    UnsupportedMergeCommit { commit: String },

    /// The repository reported a delta kind other than added, modified,
    /// deleted or renamed.
    #[error("unhandled change kind {status:?} in commit {commit}")]
    UnhandledChangeKind { commit: String, status: DeltaStatus },

    /// A history was filled without an explicit or inherited filename.
    #[error("missing filename for commit {commit}")]
    MissingFilename { commit: String },

    /// Materializing a commit did not consume exactly its own diff lines.
    #[error(
        "coordinate mismatch for '{file}' at commit {commit}: \
         consumed {consumed} of {expected} lines"
    )]
    CoordinateMismatch {
        file: String,
        commit: String,
        consumed: usize,
        expected: usize,
    },

    /// The repository could not answer a query.
    #[error(transparent)]
    Repo(#[from] anyhow::Error),
}

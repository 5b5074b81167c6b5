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

use anyhow::{Context, Result};
use tracing::trace;

use crate::{repo::GitRepo, CommitRef, DeltaStatus, DiffLine};

/// Tagged lines of `file_name` in `commit`, relative to the commit's parent.
///
/// When the commit touched the file this is its full-context diff. When it
/// did not (or only renamed it), the parent's content is returned with every
/// line tagged as context.
pub(crate) fn diff_lines(
    repo: &impl GitRepo,
    commit: &CommitRef,
    file_name: &str,
) -> Result<Vec<DiffLine>> {
    match repo.file_patch(&commit.oid, file_name)? {
        Some(patch) if !patch.lines.is_empty() => Ok(patch.lines),
        // Empty file created: nothing in the parent to fall back to
        Some(patch) if patch.status == DeltaStatus::Added => Ok(Vec::new()),
        Some(patch) => {
            let parent_name = patch.old_path.as_deref().unwrap_or(file_name);
            trace!(commit = %commit.short_id, file_name, parent_name, "no content change");
            parent_content(repo, commit, parent_name)
        }
        None => parent_content(repo, commit, file_name),
    }
}

fn parent_content(repo: &impl GitRepo, commit: &CommitRef, path: &str) -> Result<Vec<DiffLine>> {
    let source = commit.parent_oids.first().unwrap_or(&commit.oid);
    let content = repo
        .blob_at(source, path)
        .context(format!("Failed to read '{}' before {}", path, commit.short_id))?;

    Ok(content.lines().map(DiffLine::context).collect())
}

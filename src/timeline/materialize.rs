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

use std::collections::BTreeMap;
use std::fmt;

use crate::{DiffLine, DiffLineKind};

use super::{PatchKind, PatchSpan};

/// Character printed for rows a commit does not have.
pub const PLACEHOLDER: char = 'x';

/// One row of a commit's content in the shared coordinate space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignedRow {
    /// The commit has no line here: it was removed earlier or is added later.
    Placeholder,
    /// A line of the commit's own diff.
    Line(DiffLine),
}

impl AlignedRow {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, AlignedRow::Placeholder)
    }

    /// Diff tag of the row, `None` for placeholders.
    pub fn kind(&self) -> Option<DiffLineKind> {
        match self {
            AlignedRow::Placeholder => None,
            AlignedRow::Line(line) => Some(line.kind),
        }
    }

    /// Row text without its tag character.
    pub fn text(&self) -> &str {
        match self {
            AlignedRow::Placeholder => "",
            AlignedRow::Line(line) => &line.content,
        }
    }
}

impl fmt::Display for AlignedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignedRow::Placeholder => write!(f, "{}", PLACEHOLDER),
            AlignedRow::Line(line) => write!(f, "{}", line),
        }
    }
}

/// The coordinate walk did not line up with the commit's own lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateMismatch {
    pub consumed: usize,
    pub expected: usize,
}

/// Lay the `target` commit's lines onto the shared grid.
///
/// `cascaded` holds every commit's spans in shared coordinates, oldest first,
/// and `target` indexes into it. Rows deleted by an earlier commit and rows
/// added by a later commit become placeholders; every other row takes the
/// next of `lines`. The walk must use up `lines` exactly.
pub fn materialize(
    target: usize,
    lines: &[DiffLine],
    cascaded: &[Vec<PatchSpan>],
    total_length: usize,
) -> Result<Vec<AlignedRow>, CoordinateMismatch> {
    let skips = skip_runs(target, cascaded);

    let mut rows = Vec::with_capacity(total_length);
    let mut own = lines.iter();
    let mut consumed = 0;
    let mut pending = 0;

    for position in 0..total_length {
        // A run may start while an earlier one is still being emitted; its
        // rows are appended rather than dropped.
        pending += skips.get(&position).copied().unwrap_or(0);
        if pending > 0 {
            pending -= 1;
            rows.push(AlignedRow::Placeholder);
            continue;
        }

        match own.next() {
            Some(line) => {
                rows.push(AlignedRow::Line(line.clone()));
                consumed += 1;
            }
            None => {
                return Err(CoordinateMismatch {
                    consumed,
                    expected: lines.len(),
                })
            }
        }
    }

    if consumed != lines.len() || pending > 0 {
        return Err(CoordinateMismatch {
            consumed,
            expected: lines.len(),
        });
    }

    Ok(rows)
}

/// Map from grid row to the number of placeholder rows starting there.
fn skip_runs(target: usize, cascaded: &[Vec<PatchSpan>]) -> BTreeMap<usize, usize> {
    let mut skips = BTreeMap::new();

    for (idx, spans) in cascaded.iter().enumerate() {
        let absent_kind = match idx.cmp(&target) {
            std::cmp::Ordering::Less => PatchKind::Delete,
            std::cmp::Ordering::Greater => PatchKind::Add,
            std::cmp::Ordering::Equal => continue,
        };

        for span in spans.iter().filter(|span| span.kind == absent_kind) {
            *skips.entry(span.start).or_insert(0) += span.len();
        }
    }

    skips
}

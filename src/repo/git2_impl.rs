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

use std::path::Path;

use anyhow::{Context, Result};
use tracing::trace;

use crate::{ChangeRecord, CommitRef, DeltaStatus, DiffLine, DiffLineKind, FilePatch};

use super::GitRepo;

/// Context size large enough that every file fits in a single hunk.
const FULL_CONTEXT: u32 = 999_999;

/// Concrete git repository backed by `libgit2` via the `git2` crate.
///
/// Construct with [`Git2Repo::open`]; then use through the [`GitRepo`] trait.
pub struct Git2Repo {
    inner: git2::Repository,
}

impl Git2Repo {
    /// Try to open a git repository by iteratively trying the given path and
    /// its parents until a repository root is found.
    pub fn open(mut path: std::path::PathBuf) -> Result<Self> {
        loop {
            let result = git2::Repository::open(&path);
            if let Ok(repo) = result {
                return Ok(Git2Repo { inner: repo });
            }
            if !path.pop() {
                anyhow::bail!("Could not find git repository root");
            }
        }
    }

    fn find_commit(&self, oid: &str) -> Result<git2::Commit<'_>> {
        self.inner
            .revparse_single(oid)
            .context(format!("Failed to resolve '{}'", oid))?
            .peel_to_commit()
            .context("Resolved object is not a commit")
    }

    /// Diff the first parent's tree (or the empty tree) against the commit
    /// tree, with rename detection applied.
    fn parent_diff(
        &self,
        commit: &git2::Commit,
        opts: Option<&mut git2::DiffOptions>,
    ) -> Result<git2::Diff<'_>> {
        let new_tree = commit.tree().context("Failed to get commit tree")?;

        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };

        let mut diff = self
            .inner
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&new_tree), opts)?;

        let mut find_opts = git2::DiffFindOptions::new();
        find_opts.renames(true);
        diff.find_similar(Some(&mut find_opts))
            .context("Failed to detect renames")?;

        Ok(diff)
    }
}

impl GitRepo for Git2Repo {
    fn list_commits(&self, base: &str) -> Result<Vec<CommitRef>> {
        let base_oid = self.find_commit(base)?.id();

        let mut revwalk = self.inner.revwalk()?;
        revwalk.push_head().context("Failed to get HEAD")?;
        revwalk.hide(base_oid)?;
        revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::REVERSE)?;

        let mut commits = Vec::new();
        for (ordinal, oid_result) in revwalk.enumerate() {
            let commit = self.inner.find_commit(oid_result?)?;
            commits.push(commit_ref_from(&commit, ordinal));
        }

        trace!(base, count = commits.len(), "listed commits");
        Ok(commits)
    }

    fn changes(&self, oid: &str) -> Result<Vec<ChangeRecord>> {
        let commit = self.find_commit(oid)?;
        let diff = self.parent_diff(&commit, None)?;

        Ok(diff
            .deltas()
            .map(|delta| {
                let status = delta_status(delta.status());
                let (old_path, new_path) = delta_paths(&delta, status);
                ChangeRecord {
                    status,
                    old_path,
                    new_path,
                }
            })
            .collect())
    }

    fn file_patch(&self, oid: &str, path: &str) -> Result<Option<FilePatch>> {
        let commit = self.find_commit(oid)?;

        let mut opts = git2::DiffOptions::new();
        opts.context_lines(FULL_CONTEXT);
        opts.interhunk_lines(FULL_CONTEXT);

        let diff = self.parent_diff(&commit, Some(&mut opts))?;

        for (delta_idx, delta) in diff.deltas().enumerate() {
            let status = delta_status(delta.status());
            let (old_path, new_path) = delta_paths(&delta, status);

            let touched = match status {
                DeltaStatus::Deleted => old_path.as_deref() == Some(path),
                _ => new_path.as_deref() == Some(path),
            };
            if !touched {
                continue;
            }

            let lines = match git2::Patch::from_diff(&diff, delta_idx)? {
                Some(patch) => patch_lines(&patch)?,
                None => Vec::new(),
            };

            return Ok(Some(FilePatch {
                old_path,
                new_path,
                status,
                lines,
            }));
        }

        Ok(None)
    }

    fn blob_at(&self, oid: &str, path: &str) -> Result<String> {
        let commit = self.find_commit(oid)?;
        let tree = commit.tree().context("Failed to get commit tree")?;
        let entry = tree
            .get_path(Path::new(path))
            .context(format!("'{}' does not exist in {}", path, oid))?;
        let blob = self
            .inner
            .find_blob(entry.id())
            .context(format!("'{}' is not a file in {}", path, oid))?;

        Ok(String::from_utf8_lossy(blob.content()).into_owned())
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn git_time_to_offset_datetime(git_time: git2::Time) -> time::OffsetDateTime {
    let offset_seconds = git_time.offset_minutes() * 60;
    let utc_offset =
        time::UtcOffset::from_whole_seconds(offset_seconds).unwrap_or(time::UtcOffset::UTC);

    time::OffsetDateTime::from_unix_timestamp(git_time.seconds())
        .unwrap_or(time::OffsetDateTime::UNIX_EPOCH)
        .to_offset(utc_offset)
}

fn commit_ref_from(commit: &git2::Commit, ordinal: usize) -> CommitRef {
    let oid = commit.id().to_string();
    let short_id = oid.chars().take(crate::SHORT_ID_LENGTH).collect();

    CommitRef {
        oid,
        short_id,
        summary: commit.summary().unwrap_or("").to_string(),
        author: commit.author().name().unwrap_or("").to_string(),
        commit_date: git_time_to_offset_datetime(commit.time()),
        parent_oids: commit.parent_ids().map(|id| id.to_string()).collect(),
        ordinal,
    }
}

fn delta_status(status: git2::Delta) -> DeltaStatus {
    match status {
        git2::Delta::Unmodified => DeltaStatus::Unmodified,
        git2::Delta::Added => DeltaStatus::Added,
        git2::Delta::Deleted => DeltaStatus::Deleted,
        git2::Delta::Modified => DeltaStatus::Modified,
        git2::Delta::Renamed => DeltaStatus::Renamed,
        git2::Delta::Copied => DeltaStatus::Copied,
        git2::Delta::Ignored => DeltaStatus::Ignored,
        git2::Delta::Untracked => DeltaStatus::Untracked,
        git2::Delta::Typechange => DeltaStatus::Typechange,
        git2::Delta::Unreadable => DeltaStatus::Unreadable,
        git2::Delta::Conflicted => DeltaStatus::Conflicted,
    }
}

/// libgit2 fills in both paths even for additions and deletions; drop the
/// side that does not exist.
fn delta_paths(
    delta: &git2::DiffDelta,
    status: DeltaStatus,
) -> (Option<String>, Option<String>) {
    let old_path = delta
        .old_file()
        .path()
        .map(|p| p.to_string_lossy().into_owned());
    let new_path = delta
        .new_file()
        .path()
        .map(|p| p.to_string_lossy().into_owned());

    match status {
        DeltaStatus::Added => (None, new_path),
        DeltaStatus::Deleted => (old_path, None),
        _ => (old_path, new_path),
    }
}

/// Flatten every hunk of a patch into tagged lines.
///
/// Hunk headers and "no newline at end of file" markers are not content and
/// are skipped.
fn patch_lines(patch: &git2::Patch) -> Result<Vec<DiffLine>> {
    let mut lines = Vec::new();

    for hunk_idx in 0..patch.num_hunks() {
        for line_idx in 0..patch.num_lines_in_hunk(hunk_idx)? {
            let line = patch.line_in_hunk(hunk_idx, line_idx)?;
            let kind = match line.origin() {
                '+' => DiffLineKind::Addition,
                '-' => DiffLineKind::Deletion,
                ' ' => DiffLineKind::Context,
                _ => continue,
            };
            let content = String::from_utf8_lossy(line.content());
            let content = content.strip_suffix('\n').unwrap_or(&content);
            let content = content.strip_suffix('\r').unwrap_or(content);
            lines.push(DiffLine {
                kind,
                content: content.to_string(),
            });
        }
    }

    Ok(lines)
}

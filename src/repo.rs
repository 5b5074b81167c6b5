// Repository operations

mod git2_impl;

use anyhow::Result;

pub use git2_impl::Git2Repo;

use crate::{ChangeRecord, CommitRef, FilePatch};

/// Read-only queries the history loader needs from a repository.
///
/// [`Git2Repo`] is the real implementation; tests substitute in-memory fakes.
pub trait GitRepo {
    /// List the commits in `base..HEAD`, oldest first.
    ///
    /// `base` can be any commit-ish (branch, tag, short or long hash). The
    /// base commit itself and its ancestors are excluded. Each returned
    /// commit carries its ordinal in the list.
    fn list_commits(&self, base: &str) -> Result<Vec<CommitRef>>;

    /// Paths touched by a commit relative to its first parent.
    ///
    /// Root commits are compared against the empty tree. Renames are
    /// detected, so a moved file yields one record instead of a
    /// delete/add pair.
    fn changes(&self, oid: &str) -> Result<Vec<ChangeRecord>>;

    /// Full-context diff of `path` in the given commit.
    ///
    /// `path` is matched against the post-commit path, or the pre-commit
    /// path for deletions. Returns `None` if the commit did not touch it.
    fn file_patch(&self, oid: &str, path: &str) -> Result<Option<FilePatch>>;

    /// Raw content of `path` in the tree of the given commit.
    fn blob_at(&self, oid: &str, path: &str) -> Result<String>;
}

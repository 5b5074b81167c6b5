// Core library for rediff

use std::fmt;

pub mod app;
pub mod error;
pub mod event;
pub mod history;
pub mod repo;
pub mod timeline;
pub mod views;

pub use error::HistoryError;
pub use history::{load, FileCommit, FileHistories, FileHistory};
pub use timeline::{AlignedRow, PatchKind, PatchSpan};

/// Number of characters shown for an abbreviated commit id.
pub const SHORT_ID_LENGTH: usize = 8;

/// A commit in the analyzed `base..HEAD` range.
///
/// Created once while listing commits and shared (never copied) by every
/// [`FileCommit`] that refers to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRef {
    pub oid: String,
    pub short_id: String,
    pub summary: String,
    pub author: String,
    pub commit_date: time::OffsetDateTime,
    pub parent_oids: Vec<String>,
    /// Position in the loaded sequence, oldest commit is 0.
    pub ordinal: usize,
}

/// Raw delta classification as reported by the repository.
///
/// Mirrors libgit2's delta kinds; only four of them are meaningful to the
/// history classifier, the rest are rejected there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaStatus {
    Unmodified,
    Added,
    Deleted,
    Modified,
    Renamed,
    Copied,
    Ignored,
    Untracked,
    Typechange,
    Unreadable,
    Conflicted,
}

/// One path touched by one commit, relative to its first parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub status: DeltaStatus,
    /// Path before the commit; `None` for added files.
    pub old_path: Option<String>,
    /// Path after the commit; `None` for deleted files.
    pub new_path: Option<String>,
}

/// The type of a line in a unified diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineKind {
    Context,
    Addition,
    Deletion,
}

impl DiffLineKind {
    /// The one-character prefix used by unified diffs.
    pub fn tag(self) -> char {
        match self {
            DiffLineKind::Context => ' ',
            DiffLineKind::Addition => '+',
            DiffLineKind::Deletion => '-',
        }
    }
}

/// A single line of a diff, without its trailing newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub content: String,
}

impl DiffLine {
    pub fn context(content: impl Into<String>) -> Self {
        DiffLine {
            kind: DiffLineKind::Context,
            content: content.into(),
        }
    }

    pub fn addition(content: impl Into<String>) -> Self {
        DiffLine {
            kind: DiffLineKind::Addition,
            content: content.into(),
        }
    }

    pub fn deletion(content: impl Into<String>) -> Self {
        DiffLine {
            kind: DiffLineKind::Deletion,
            content: content.into(),
        }
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.tag(), self.content)
    }
}

/// The diff of a single path within one commit, with unlimited context.
///
/// `lines` covers the whole file (context included), so it is empty only when
/// the content did not change, e.g. for a pure rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePatch {
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    pub status: DeltaStatus,
    pub lines: Vec<DiffLine>,
}

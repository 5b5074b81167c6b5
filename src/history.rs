// File histories: per-file state across a commit range

mod extract;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, trace};

use crate::{
    error::HistoryError,
    repo::GitRepo,
    timeline::{self, AlignedRow, PatchSpan},
    ChangeRecord, CommitRef, DeltaStatus, DiffLine,
};

/// One file at one commit of the range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCommit {
    commit: Arc<CommitRef>,
    file_name: Option<String>,
    lines: Vec<DiffLine>,
    patches: Vec<PatchSpan>,
    content: Vec<AlignedRow>,
}

impl FileCommit {
    pub fn oid(&self) -> &str {
        &self.commit.oid
    }

    pub fn commit(&self) -> &CommitRef {
        &self.commit
    }

    /// Name of the file at this commit, `None` before it was created.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Tagged lines of this commit's diff against its parent.
    pub fn diff_lines(&self) -> &[DiffLine] {
        &self.lines
    }

    /// ADD/DELETE spans in this commit's own diff coordinates.
    pub fn patches(&self) -> &[PatchSpan] {
        &self.patches
    }

    /// This commit's lines laid out on the history's shared grid.
    ///
    /// Always exactly [`FileHistory::total_length`] rows long.
    pub fn content_in_global_coordinates(&self) -> &[AlignedRow] {
        &self.content
    }
}

/// Every state of one file across the loaded commits.
///
/// Holds exactly one [`FileCommit`] per loaded commit, in commit order, along
/// with the spans of all commits expressed in one shared coordinate space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHistory {
    original_filename: Option<String>,
    current_filename: Option<String>,
    commits: Vec<FileCommit>,
    all_patches: Vec<Vec<PatchSpan>>,
    total_length: usize,
}

impl FileHistory {
    /// First name the file was seen under.
    pub fn original_filename(&self) -> Option<&str> {
        self.original_filename.as_deref()
    }

    /// Name at the newest commit in range, or at deletion.
    pub fn current_filename(&self) -> Option<&str> {
        self.current_filename.as_deref()
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    pub fn commits(&self) -> &[FileCommit] {
        &self.commits
    }

    pub fn commit(&self, oid: &str) -> Option<&FileCommit> {
        self.commits.iter().find(|fc| fc.oid() == oid)
    }

    /// Spans of every commit in shared coordinates, keyed by commit OID.
    pub fn all_patches(&self) -> impl Iterator<Item = (&str, &[PatchSpan])> {
        self.commits
            .iter()
            .zip(&self.all_patches)
            .map(|(fc, spans)| (fc.oid(), spans.as_slice()))
    }

    /// Rows in the shared coordinate space.
    pub fn total_length(&self) -> usize {
        self.total_length
    }

    pub fn content(&self, oid: &str) -> Option<&[AlignedRow]> {
        self.commit(oid).map(FileCommit::content_in_global_coordinates)
    }

    fn display_name(&self) -> &str {
        self.current_filename()
            .or(self.original_filename())
            .unwrap_or("<unknown>")
    }
}

/// All file histories of a commit range, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHistories {
    commits: Vec<Arc<CommitRef>>,
    histories: Vec<FileHistory>,
    by_path: HashMap<String, usize>,
}

impl FileHistories {
    /// `by_path` maps end-state paths to indices into `histories`.
    fn new(
        commits: Vec<Arc<CommitRef>>,
        histories: Vec<FileHistory>,
        by_path: HashMap<String, usize>,
    ) -> Self {
        FileHistories {
            commits,
            histories,
            by_path,
        }
    }

    /// The loaded commits, oldest first.
    pub fn commits(&self) -> &[Arc<CommitRef>] {
        &self.commits
    }

    /// Look up a history by its end-state path.
    pub fn get(&self, path: &str) -> Option<&FileHistory> {
        self.position(path).map(|idx| &self.histories[idx])
    }

    pub fn position(&self, path: &str) -> Option<usize> {
        self.by_path.get(path).copied()
    }

    pub fn get_index(&self, idx: usize) -> Option<&FileHistory> {
        self.histories.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileHistory> {
        self.histories.iter()
    }

    pub fn len(&self) -> usize {
        self.histories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }
}

impl<'a> IntoIterator for &'a FileHistories {
    type Item = &'a FileHistory;
    type IntoIter = std::slice::Iter<'a, FileHistory>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Load the history of every file touched in `base..HEAD`.
///
/// Runs the whole pipeline: classify each commit's changes per file, fetch
/// each file's diff at each commit, and align all versions of a file onto a
/// shared row grid. Any failure aborts the load.
pub fn load(repo: &impl GitRepo, base: &str) -> Result<FileHistories, HistoryError> {
    let commits: Vec<Arc<CommitRef>> = repo
        .list_commits(base)?
        .into_iter()
        .map(Arc::new)
        .collect();
    info!(base, commits = commits.len(), "loading file histories");

    let (files, by_path) = classify(repo, &commits)?;

    let histories = files
        .into_iter()
        .map(|file| build_history(repo, &commits, file))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FileHistories::new(commits, histories, by_path))
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// A change record reduced to the four kinds the classifier handles.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Change {
    Created { path: String },
    Modified { path: String },
    Deleted { path: String },
    Renamed { from: String, to: String },
}

impl Change {
    fn from_record(record: ChangeRecord, commit: &CommitRef) -> Result<Self, HistoryError> {
        let missing = || HistoryError::MissingFilename {
            commit: commit.oid.clone(),
        };

        match record.status {
            DeltaStatus::Added => Ok(Change::Created {
                path: record.new_path.ok_or_else(missing)?,
            }),
            DeltaStatus::Modified => Ok(Change::Modified {
                path: record.new_path.ok_or_else(missing)?,
            }),
            DeltaStatus::Deleted => Ok(Change::Deleted {
                path: record.old_path.ok_or_else(missing)?,
            }),
            DeltaStatus::Renamed => Ok(Change::Renamed {
                from: record.old_path.ok_or_else(missing)?,
                to: record.new_path.ok_or_else(missing)?,
            }),
            status => Err(HistoryError::UnhandledChangeKind {
                commit: commit.oid.clone(),
                status,
            }),
        }
    }
}

/// Where a file stands after the commits classified so far.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FileState {
    Untracked,
    Tracked(String),
    Deleted(String),
}

/// The file's name at one commit, and whether it exists there.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fill {
    file_name: Option<String>,
    exists: bool,
}

#[derive(Debug)]
struct TrackedFile {
    original: Option<String>,
    current: Option<String>,
    state: FileState,
    fills: Vec<Fill>,
}

impl TrackedFile {
    fn new() -> Self {
        TrackedFile {
            original: None,
            current: None,
            state: FileState::Untracked,
            fills: Vec::new(),
        }
    }

    /// Record the file at commit `ordinal`, inheriting the current name when
    /// `file_name` is `None`. Filling the same commit twice keeps the last.
    fn fill(
        &mut self,
        ordinal: usize,
        commit: &CommitRef,
        file_name: Option<&str>,
        exists: bool,
    ) -> Result<(), HistoryError> {
        if self.original.is_none() {
            self.original = file_name.map(str::to_string);
        }
        if let Some(name) = file_name {
            self.current = Some(name.to_string());
        }

        let name = self
            .current
            .clone()
            .ok_or_else(|| HistoryError::MissingFilename {
                commit: commit.oid.clone(),
            })?;

        self.fills.truncate(ordinal);
        self.fills.push(Fill {
            file_name: Some(name),
            exists,
        });
        Ok(())
    }

    /// Fill every commit before the one where the file was first seen.
    ///
    /// With a name the file already existed before the range; without one it
    /// did not exist yet.
    fn backfill(&mut self, earlier: &[Arc<CommitRef>], file_name: Option<&str>) -> Result<(), HistoryError> {
        for (ordinal, commit) in earlier.iter().enumerate() {
            match file_name {
                Some(_) => self.fill(ordinal, commit, file_name, true)?,
                None => self.fills.push(Fill {
                    file_name: None,
                    exists: false,
                }),
            }
        }
        Ok(())
    }

    fn exists(&self) -> bool {
        matches!(self.state, FileState::Tracked(_))
    }

    /// Path the file was last seen under, `None` while untracked.
    fn last_path(&self) -> Option<String> {
        match &self.state {
            FileState::Untracked => None,
            FileState::Tracked(path) | FileState::Deleted(path) => Some(path.clone()),
        }
    }
}

struct Classifier<'a> {
    commits: &'a [Arc<CommitRef>],
    files: Vec<TrackedFile>,
    by_path: HashMap<String, usize>,
}

impl<'a> Classifier<'a> {
    fn new(commits: &'a [Arc<CommitRef>]) -> Self {
        Classifier {
            commits,
            files: Vec::new(),
            by_path: HashMap::new(),
        }
    }

    fn track(&mut self, path: String, file: TrackedFile) {
        self.files.push(file);
        self.by_path.insert(path, self.files.len() - 1);
    }

    /// Start a history for a file first seen at commit `ordinal`.
    fn discover(
        &self,
        ordinal: usize,
        earlier_name: Option<&str>,
    ) -> Result<TrackedFile, HistoryError> {
        let mut file = TrackedFile::new();
        file.backfill(&self.commits[..ordinal], earlier_name)?;
        Ok(file)
    }

    fn apply(&mut self, ordinal: usize, change: Change) -> Result<(), HistoryError> {
        let commits = self.commits;
        let commit = &commits[ordinal];
        let known = match &change {
            Change::Created { .. } => None,
            Change::Modified { path } | Change::Deleted { path } => self.by_path.get(path).copied(),
            Change::Renamed { from, .. } => self.by_path.get(from).copied(),
        };
        debug!(commit = %commit.short_id, ?change, tracked = known.is_some(), "classifying");

        match (change, known) {
            (Change::Created { path }, _) => {
                let mut file = self.discover(ordinal, None)?;
                file.fill(ordinal, commit, Some(&path), true)?;
                file.state = FileState::Tracked(path.clone());
                self.track(path, file);
            }
            (Change::Modified { path }, Some(idx)) => {
                let file = &mut self.files[idx];
                file.fill(ordinal, commit, Some(&path), true)?;
                file.state = FileState::Tracked(path);
            }
            (Change::Modified { path }, None) => {
                let mut file = self.discover(ordinal, Some(&path))?;
                file.fill(ordinal, commit, Some(&path), true)?;
                file.state = FileState::Tracked(path.clone());
                self.track(path, file);
            }
            (Change::Deleted { path }, Some(idx)) => {
                let file = &mut self.files[idx];
                file.fill(ordinal, commit, Some(&path), true)?;
                file.state = FileState::Deleted(path);
            }
            (Change::Deleted { path }, None) => {
                let mut file = self.discover(ordinal, Some(&path))?;
                file.fill(ordinal, commit, Some(&path), true)?;
                file.state = FileState::Deleted(path.clone());
                self.track(path, file);
            }
            (Change::Renamed { from, to }, Some(idx)) => {
                let file = &mut self.files[idx];
                file.fill(ordinal, commit, Some(&to), true)?;
                file.state = FileState::Tracked(to.clone());
                self.by_path.remove(&from);
                self.by_path.insert(to, idx);
            }
            (Change::Renamed { from, to }, None) => {
                let mut file = self.discover(ordinal, Some(&from))?;
                file.original = Some(from);
                file.fill(ordinal, commit, Some(&to), true)?;
                file.state = FileState::Tracked(to.clone());
                self.track(to, file);
            }
        }

        Ok(())
    }

    /// Carry every file not touched by commit `ordinal` forward unchanged.
    fn fill_untouched(&mut self, ordinal: usize) -> Result<(), HistoryError> {
        let commits = self.commits;
        let commit = &commits[ordinal];
        for file in self.files.iter_mut().filter(|f| f.fills.len() == ordinal) {
            let exists = file.exists();
            let path = file.last_path();
            file.fill(ordinal, commit, path.as_deref(), exists)?;
        }
        Ok(())
    }
}

/// Walk the commits oldest first and build one [`TrackedFile`] per file.
///
/// Also returns the path index as it stands after the last commit. A rename
/// onto a deleted file's path or a re-created path points at the live file.
fn classify(
    repo: &impl GitRepo,
    commits: &[Arc<CommitRef>],
) -> Result<(Vec<TrackedFile>, HashMap<String, usize>), HistoryError> {
    let mut classifier = Classifier::new(commits);

    for (ordinal, commit) in commits.iter().enumerate() {
        if commit.parent_oids.len() > 1 {
            return Err(HistoryError::UnsupportedMergeCommit {
                commit: commit.oid.clone(),
            });
        }

        for record in repo.changes(&commit.oid)? {
            let change = Change::from_record(record, commit)?;
            classifier.apply(ordinal, change)?;
        }

        classifier.fill_untouched(ordinal)?;
    }

    Ok((classifier.files, classifier.by_path))
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

fn build_history(
    repo: &impl GitRepo,
    commits: &[Arc<CommitRef>],
    file: TrackedFile,
) -> Result<FileHistory, HistoryError> {
    let mut lines = Vec::with_capacity(commits.len());
    for (commit, fill) in commits.iter().zip(&file.fills) {
        lines.push(match (&fill.file_name, fill.exists) {
            (Some(name), true) => extract::diff_lines(repo, commit, name)?,
            _ => Vec::new(),
        });
    }

    let local: Vec<Vec<PatchSpan>> = lines.iter().map(|l| timeline::segment(l)).collect();
    let all_patches = timeline::cascade(&local);
    let total_length = timeline::total_length(lines.first().map_or(0, Vec::len), &all_patches);

    let mut history = FileHistory {
        original_filename: file.original,
        current_filename: file.current,
        commits: Vec::with_capacity(commits.len()),
        all_patches,
        total_length,
    };
    debug!(
        file = history.display_name(),
        total_length, "aligned file history"
    );
    trace!(file = history.display_name(), patches = ?history.all_patches, "cascaded spans");

    for (idx, ((commit, fill), (lines, patches))) in commits
        .iter()
        .zip(file.fills)
        .zip(lines.into_iter().zip(local))
        .enumerate()
    {
        let content = timeline::materialize(idx, &lines, &history.all_patches, total_length)
            .map_err(|mismatch| HistoryError::CoordinateMismatch {
                file: history.display_name().to_string(),
                commit: commit.oid.clone(),
                consumed: mismatch.consumed,
                expected: mismatch.expected,
            })?;

        history.commits.push(FileCommit {
            commit: Arc::clone(commit),
            file_name: fill.file_name,
            lines,
            patches,
            content,
        });
    }

    Ok(history)
}

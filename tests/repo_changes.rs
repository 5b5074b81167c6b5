mod common;

use rediff::{repo::GitRepo, ChangeRecord, DeltaStatus, DiffLine, DiffLineKind};

fn record(status: DeltaStatus, old: Option<&str>, new: Option<&str>) -> ChangeRecord {
    ChangeRecord {
        status,
        old_path: old.map(str::to_string),
        new_path: new.map(str::to_string),
    }
}

#[test]
fn test_changes_root_commit_against_empty_tree() {
    let test = common::TestRepo::new();
    let c1 = test.commit_file("hello.txt", "Hello, world!\n", "Initial commit");

    let changes = test.git_repo().changes(&c1.to_string()).unwrap();

    assert_eq!(
        changes,
        vec![record(DeltaStatus::Added, None, Some("hello.txt"))]
    );
}

#[test]
fn test_changes_modification_and_deletion() {
    let test = common::TestRepo::with_base(&[("FILE2", "FILE2 line 1\n")]);
    test.write("FILE1", "FILE1 line 1\nmore\n");
    std::fs::remove_file(test.path().join("FILE2")).unwrap();
    let mut index = test.repo.index().unwrap();
    index.remove_path(std::path::Path::new("FILE2")).unwrap();
    index.write().unwrap();
    let c1 = test.commit_index("Modify and delete");

    let changes = test.git_repo().changes(&c1.to_string()).unwrap();

    assert_eq!(
        changes,
        vec![
            record(DeltaStatus::Modified, Some("FILE1"), Some("FILE1")),
            record(DeltaStatus::Deleted, Some("FILE2"), None),
        ]
    );
}

#[test]
fn test_changes_detects_pure_rename() {
    let test = common::TestRepo::with_base(&[]);
    let c1 = test.rename_file("FILE1", "FILE1.new", None, "Rename");

    let changes = test.git_repo().changes(&c1.to_string()).unwrap();

    assert_eq!(
        changes,
        vec![record(DeltaStatus::Renamed, Some("FILE1"), Some("FILE1.new"))]
    );
}

#[test]
fn test_changes_detects_rename_with_edit() {
    let test = common::TestRepo::new();
    let content = common::long_content();
    test.commit_file("long.txt", &content, "Initial commit");
    let edited = format!("{}one more line\n", content);
    let c1 = test.rename_file("long.txt", "moved.txt", Some(&edited), "Move and edit");

    let changes = test.git_repo().changes(&c1.to_string()).unwrap();

    assert_eq!(
        changes,
        vec![record(DeltaStatus::Renamed, Some("long.txt"), Some("moved.txt"))]
    );
}

#[test]
fn test_file_patch_has_full_context() {
    let test = common::TestRepo::new();
    let before: String = (1..=20).map(|n| format!("line {}\n", n)).collect();
    test.commit_file("file.txt", &before, "First");
    let after = before.replace("line 10\n", "line ten\n");
    let c2 = test.commit_file("file.txt", &after, "Modify middle");

    let patch = test
        .git_repo()
        .file_patch(&c2.to_string(), "file.txt")
        .unwrap()
        .unwrap();

    assert_eq!(patch.status, DeltaStatus::Modified);
    assert_eq!(patch.lines.len(), 21);
    assert_eq!(patch.lines[0], DiffLine::context("line 1"));
    assert_eq!(patch.lines[9], DiffLine::deletion("line 10"));
    assert_eq!(patch.lines[10], DiffLine::addition("line ten"));
    assert_eq!(patch.lines[20], DiffLine::context("line 20"));
}

#[test]
fn test_file_patch_strips_line_endings() {
    let test = common::TestRepo::new();
    test.commit_file("file.txt", "a\r\n", "First");
    let c2 = test.commit_file("file.txt", "a\r\nb\r\n", "Second");

    let patch = test
        .git_repo()
        .file_patch(&c2.to_string(), "file.txt")
        .unwrap()
        .unwrap();

    assert_eq!(
        patch.lines,
        vec![DiffLine::context("a"), DiffLine::addition("b")]
    );
}

#[test]
fn test_file_patch_of_deleted_file_matches_old_path() {
    let test = common::TestRepo::with_base(&[]);
    let c1 = test.delete_file("FILE1", "Delete");

    let patch = test
        .git_repo()
        .file_patch(&c1.to_string(), "FILE1")
        .unwrap()
        .unwrap();

    assert_eq!(patch.status, DeltaStatus::Deleted);
    assert_eq!(patch.lines, vec![DiffLine::deletion("FILE1 line 1")]);
}

#[test]
fn test_file_patch_of_pure_rename_has_no_lines() {
    let test = common::TestRepo::with_base(&[]);
    let c1 = test.rename_file("FILE1", "FILE1.new", None, "Rename");

    let patch = test
        .git_repo()
        .file_patch(&c1.to_string(), "FILE1.new")
        .unwrap()
        .unwrap();

    assert_eq!(patch.old_path.as_deref(), Some("FILE1"));
    assert!(patch.lines.is_empty());
}

#[test]
fn test_file_patch_untouched_path_is_none() {
    let test = common::TestRepo::with_base(&[("FILE2", "FILE2 line 1\n")]);
    let c1 = test.commit_file("FILE1", "FILE1 line 1\nnew line\n", "Modify");

    let patch = test.git_repo().file_patch(&c1.to_string(), "FILE2").unwrap();

    assert!(patch.is_none());
}

#[test]
fn test_file_patch_lines_carry_kind() {
    let test = common::TestRepo::with_base(&[]);
    let c1 = test.commit_file("FILE1", "FILE1 line 1\nnew line\n", "Append");

    let patch = test
        .git_repo()
        .file_patch(&c1.to_string(), "FILE1")
        .unwrap()
        .unwrap();

    let kinds: Vec<DiffLineKind> = patch.lines.iter().map(|l| l.kind).collect();
    assert_eq!(kinds, vec![DiffLineKind::Context, DiffLineKind::Addition]);
}

#[test]
fn test_blob_at_reads_tree_content() {
    let test = common::TestRepo::new();
    let c1 = test.commit_file("dir/file.txt", "first\n", "First");
    let c2 = test.commit_file("dir/file.txt", "second\n", "Second");

    let repo = test.git_repo();

    assert_eq!(repo.blob_at(&c1.to_string(), "dir/file.txt").unwrap(), "first\n");
    assert_eq!(repo.blob_at(&c2.to_string(), "dir/file.txt").unwrap(), "second\n");
}

#[test]
fn test_blob_at_missing_path_fails() {
    let test = common::TestRepo::new();
    let c1 = test.commit_file("file.txt", "content\n", "First");

    assert!(test.git_repo().blob_at(&c1.to_string(), "other.txt").is_err());
}

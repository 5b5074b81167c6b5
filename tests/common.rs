use git2::{Oid, Repository, Signature};
use rediff::repo::Git2Repo;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Shared git repository fixture for integration tests.
///
/// Keeps a `git2::Repository` for low-level setup (creating commits, renames,
/// branches) and exposes [`git_repo()`][TestRepo::git_repo] to obtain a
/// `Git2Repo` handle for calling library functions under test.
pub struct TestRepo {
    pub _temp_dir: TempDir,
    pub repo: Repository,
}

impl TestRepo {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path()).unwrap();

        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();

        Self {
            _temp_dir: temp_dir,
            repo,
        }
    }

    /// Repository with a `base` branch on a first commit holding `FILE1`.
    #[allow(dead_code)]
    pub fn with_base(extra_files: &[(&str, &str)]) -> Self {
        let test = Self::new();
        test.write(FILE1, FILE1_CONTENT);
        for (path, content) in extra_files {
            test.write(path, content);
        }
        let base = test.commit_index("Initial commit");
        test.create_branch("base", base);
        test
    }

    /// Open a `Git2Repo` handle to this repository for use with library functions.
    #[allow(dead_code)]
    pub fn git_repo(&self) -> Git2Repo {
        Git2Repo::open(self._temp_dir.path().to_path_buf()).unwrap()
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        self._temp_dir.path()
    }

    /// Write a file into the work tree and stage it.
    pub fn write(&self, path: &str, content: &str) {
        let file_path = self.repo.workdir().unwrap().join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&file_path, content).unwrap();

        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(path)).unwrap();
        index.write().unwrap();
    }

    /// Commit whatever is staged on top of HEAD (or as a root commit).
    pub fn commit_index(&self, message: &str) -> Oid {
        let mut index = self.repo.index().unwrap();
        let tree_oid = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_oid).unwrap();

        let sig = Signature::now("Test User", "test@example.com").unwrap();

        let parent_commit = if let Ok(head) = self.repo.head() {
            Some(self.repo.find_commit(head.target().unwrap()).unwrap())
        } else {
            None
        };

        let parents: Vec<&git2::Commit> = parent_commit.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    #[allow(dead_code)]
    pub fn commit_file(&self, path: &str, content: &str, message: &str) -> Oid {
        self.write(path, content);
        self.commit_index(message)
    }

    #[allow(dead_code)]
    pub fn delete_file(&self, path: &str, message: &str) -> Oid {
        let file_path = self.repo.workdir().unwrap().join(path);
        fs::remove_file(&file_path).unwrap();

        let mut index = self.repo.index().unwrap();
        index.remove_path(Path::new(path)).unwrap();
        index.write().unwrap();

        self.commit_index(message)
    }

    /// Move `from` to `to`, optionally replacing its content, in one commit.
    #[allow(dead_code)]
    pub fn rename_file(&self, from: &str, to: &str, content: Option<&str>, message: &str) -> Oid {
        let workdir = self.repo.workdir().unwrap();
        let old_content = fs::read_to_string(workdir.join(from)).unwrap();
        fs::remove_file(workdir.join(from)).unwrap();

        let mut index = self.repo.index().unwrap();
        index.remove_path(Path::new(from)).unwrap();
        index.write().unwrap();

        self.write(to, content.unwrap_or(&old_content));
        self.commit_index(message)
    }

    /// Commit HEAD's tree with HEAD and `other` as parents.
    #[allow(dead_code)]
    pub fn merge_commit(&self, other: Oid, message: &str) -> Oid {
        let head = self
            .repo
            .find_commit(self.repo.head().unwrap().target().unwrap())
            .unwrap();
        let other = self.repo.find_commit(other).unwrap();
        let tree = head.tree().unwrap();
        let sig = Signature::now("Test User", "test@example.com").unwrap();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &[&head, &other])
            .unwrap()
    }

    #[allow(dead_code)]
    pub fn create_branch(&self, name: &str, target: Oid) {
        let commit = self.repo.find_commit(target).unwrap();
        self.repo.branch(name, &commit, false).unwrap();
    }

    #[allow(dead_code)]
    pub fn create_tag(&self, name: &str, target: Oid) {
        let commit = self.repo.find_commit(target).unwrap();
        let sig = Signature::now("Test User", "test@example.com").unwrap();
        self.repo
            .tag(name, commit.as_object(), &sig, "test tag", false)
            .unwrap();
    }
}

#[allow(dead_code)]
pub const FILE1: &str = "FILE1";
#[allow(dead_code)]
pub const FILE1_CONTENT: &str = "FILE1 line 1\n";

/// Ten distinct lines of filler text.
#[allow(dead_code)]
pub fn long_content() -> String {
    (1..=10)
        .map(|n| format!("line {} of a file long enough to track\n", n))
        .collect()
}

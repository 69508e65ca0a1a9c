//! Git repository adapter.
//!
//! Simplistic interface over the git binary geared towards getting commit
//! data and branching for running code stats against a source tree. It
//! only wraps the subset of git needed for that, always by shelling out,
//! never by touching the object database.

use std::path::{Path, PathBuf};

use fs_err as fs;

use crate::Commit;
use crate::consts::{DEFAULT_GIT_BINARY, GIT_METADATA_DIR_NAME, SHA1_HEX_LENGTH};
use crate::git::{GitError, parser};
use crate::shell::ShellExecutor;

pub struct GitRepository {
    repository_path: PathBuf,
    binary_path: PathBuf,
    /// Convenience prefix for all the gymnastics required to call git
    /// from inside the repository: `cd '<repo>' && '<binary>'`
    cmd_prefix: String,
    executor: Box<dyn ShellExecutor>,
}

impl std::fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepository")
            .field("repository_path", &self.repository_path)
            .field("binary_path", &self.binary_path)
            .field("cmd_prefix", &self.cmd_prefix)
            .finish_non_exhaustive()
    }
}

impl GitRepository {
    /// Open a repository using the default git binary location.
    pub fn open(
        repository_path: impl AsRef<Path>,
        executor: impl ShellExecutor + 'static,
    ) -> Result<Self, GitError> {
        Self::open_with_binary(repository_path, DEFAULT_GIT_BINARY, executor)
    }

    /// Open a repository, locating git on `$PATH` instead of using a
    /// fixed binary path.
    pub fn discover(
        repository_path: impl AsRef<Path>,
        executor: impl ShellExecutor + 'static,
    ) -> Result<Self, GitError> {
        let binary_path =
            which::which("git").map_err(|_| GitError::GitNotFound(PathBuf::from("git")))?;
        Self::open_with_binary(repository_path, binary_path, executor)
    }

    /// Open a repository with an explicit git binary path.
    ///
    /// Fails when the binary is not an executable file, when the
    /// repository path is empty, and when the path is not a directory
    /// holding a `.git` metadata directory.
    pub fn open_with_binary(
        repository_path: impl AsRef<Path>,
        binary_path: impl AsRef<Path>,
        executor: impl ShellExecutor + 'static,
    ) -> Result<Self, GitError> {
        let binary_path = binary_path.as_ref();
        if !is_executable_file(binary_path) {
            return Err(GitError::GitNotFound(binary_path.to_path_buf()));
        }

        let repository_path = repository_path.as_ref();
        if repository_path.as_os_str().is_empty() {
            return Err(GitError::InvalidRepositoryPath);
        }
        if !repository_path.is_dir() || !repository_path.join(GIT_METADATA_DIR_NAME).is_dir() {
            return Err(GitError::NotARepository(repository_path.to_path_buf()));
        }

        log::debug!("Opening git repository at {}", repository_path.display());
        let cmd_prefix = format!("cd {} && {}", quoted(repository_path), quoted(binary_path));
        Ok(Self {
            repository_path: repository_path.to_path_buf(),
            binary_path: binary_path.to_path_buf(),
            cmd_prefix,
            executor: Box::new(executor),
        })
    }

    pub fn repository_path(&self) -> &Path {
        &self.repository_path
    }

    pub fn vcs_name(&self) -> &'static str {
        "git"
    }

    /// Version of the git binary, e.g. `2.43.0`
    pub fn vcs_version(&self) -> Result<String, GitError> {
        let output = self.run(
            "get git version",
            &format!("{} --version", quoted(&self.binary_path)),
        )?;
        // the output reads `git version X.Y.Z`
        Ok(output
            .stdout
            .split_whitespace()
            .nth(2)
            .unwrap_or(output.stdout.as_str())
            .to_string())
    }

    /// Name of the currently checked out branch
    pub fn current_branch(&self) -> Result<String, GitError> {
        let operation = "get current branch";
        let output = self.run(
            operation,
            &format!("{} branch --show-current", self.cmd_prefix),
        )?;
        if output.stdout.is_empty() {
            // detached HEAD prints nothing
            return Err(GitError::CommandFailed {
                operation: operation.to_string(),
                stderr: output.stderr,
            });
        }
        Ok(output.stdout)
    }

    /// Create a new branch pointing at the given commit
    pub fn create_branch(&self, branch: &str, commit_id: &str) -> Result<(), GitError> {
        self.run(
            &format!("create branch {branch}"),
            &format!("{} branch {branch} {commit_id}", self.cmd_prefix),
        )?;
        Ok(())
    }

    /// Delete a branch. Git refuses to delete the branch that is
    /// currently checked out, which surfaces as a command failure.
    pub fn delete_branch(&self, branch: &str) -> Result<(), GitError> {
        self.run(
            &format!("delete branch {branch}"),
            &format!("{} branch -D {branch}", self.cmd_prefix),
        )?;
        Ok(())
    }

    /// Switch the working tree to an existing branch
    pub fn switch_branch(&self, branch: &str) -> Result<(), GitError> {
        self.run(
            &format!("switch to branch {branch}"),
            &format!("{} checkout {branch}", self.cmd_prefix),
        )?;
        Ok(())
    }

    /// The most recent commit reachable from the current branch
    pub fn head_commit(&self) -> Result<Commit, GitError> {
        let output = self.run("get HEAD commit", &format!("{} log -n 1", self.cmd_prefix))?;
        parser::parse_log_entry(&output.stdout)
    }

    /// The first older commit of the given commit.
    ///
    /// The root commit has no parent and this surfaces as the same
    /// generic command failure as any other error, callers wanting to
    /// distinguish the two have to check the commit count.
    pub fn parent_of_commit(&self, commit_id: &str) -> Result<Commit, GitError> {
        let output = self.run(
            &format!("get parent of commit {commit_id}"),
            &format!("{} log -n 1 {commit_id}^", self.cmd_prefix),
        )?;
        parser::parse_log_entry(&output.stdout)
    }

    /// Total number of commits in the currently active branch
    pub fn commit_count(&self) -> Result<u64, GitError> {
        let operation = "get commit count";
        let output = self.run(
            operation,
            &format!("{} log --oneline | wc -l", self.cmd_prefix),
        )?;
        output
            .stdout
            .parse()
            .map_err(|_| GitError::CommandFailed {
                operation: operation.to_string(),
                stderr: format!("expected a number, got `{}`", output.stdout),
            })
    }

    /// Look up one commit by its full SHA-1 hash.
    ///
    /// The id is validated before anything runs, no subprocess is
    /// spawned for a malformed one.
    pub fn commit(&self, commit_id: &str) -> Result<Commit, GitError> {
        if commit_id.len() != SHA1_HEX_LENGTH {
            return Err(GitError::NotASha1(commit_id.to_string()));
        }
        let output = self.run(
            &format!("get commit {commit_id}"),
            &format!("{} log -n 1 {commit_id}", self.cmd_prefix),
        )?;
        parser::parse_log_entry(&output.stdout)
    }

    /// Runs one command through the executor and translates a nonzero
    /// exit status into a command failure carrying the captured stderr.
    fn run(
        &self,
        operation: &str,
        command: &str,
    ) -> Result<crate::shell::ShellOutput, GitError> {
        log::debug!("{operation}: running `{command}`");
        let output = self.executor.execute(command)?;
        if output.status != 0 {
            return Err(GitError::CommandFailed {
                operation: operation.to_string(),
                stderr: output.stderr,
            });
        }
        Ok(output)
    }
}

fn quoted(path: impl AsRef<Path>) -> String {
    // paths containing single quotes are not supported
    format!("'{}'", path.as_ref().display())
}

fn is_executable_file(path: &Path) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

use std::path::PathBuf;

use thiserror::Error;

use crate::shell::ShellError;

mod local;
mod parser;

pub use local::GitRepository;

/// Error types for git operations
#[derive(Debug, Error)]
pub enum GitError {
    /// The configured binary path does not point at an executable file
    #[error("could not find git at {}", .0.display())]
    GitNotFound(PathBuf),

    /// Invalid or no repository path given at construction
    #[error("invalid or no repository path")]
    InvalidRepositoryPath,

    /// The path exists but carries no git metadata directory
    #[error("{} is not a git repository", .0.display())]
    NotARepository(PathBuf),

    /// Commit id rejected before any subprocess was run
    #[error("commit id is not a SHA-1 hash: {0}")]
    NotASha1(String),

    /// The subprocess exited nonzero or its output failed a post-condition
    #[error("could not {operation}: {stderr}")]
    CommandFailed { operation: String, stderr: String },

    /// The log parser was handed an empty block
    #[error("cannot parse a commit out of an empty log entry")]
    EmptyLogEntry,

    #[error(transparent)]
    Shell(#[from] ShellError),
}

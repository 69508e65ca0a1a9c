mod commit;
mod git;
mod shell;

pub mod consts;

pub use commit::Commit;
pub use git::{GitError, GitRepository};
pub use shell::{Shell, ShellError, ShellExecutor, ShellOutput};

//! Runs fully-formed command lines through `sh` and hands back the three
//! output channels separately.

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Error types for shell execution itself.
///
/// A command exiting nonzero is NOT an error at this layer, it is normal
/// output for the caller to interpret. These variants mean the execution
/// environment is broken or the command never got to finish.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to run `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` was killed by a signal before exiting")]
    NoExitStatus { command: String },

    #[error("`{command}` did not finish within {timeout:?} and was killed")]
    Timeout { command: String, timeout: Duration },
}

/// What one command invocation produced, all three channels trimmed of
/// surrounding whitespace. Not retained anywhere, callers consume it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    pub stdout: String,
    pub status: i32,
    pub stderr: String,
}

pub trait ShellExecutor {
    /// Execute a fully interpolated command line in a subshell.
    ///
    /// No escaping is done here, the caller is responsible for quoting.
    fn execute(&self, command: &str) -> Result<ShellOutput, ShellError>;
}

/// Live executor running commands via `sh -c`.
///
/// By default it waits for the command indefinitely. A hung binary hangs
/// the caller, so callers that cannot tolerate that opt into a timeout
/// with [`Shell::with_timeout`].
#[derive(Debug, Clone, Default)]
pub struct Shell {
    timeout: Option<Duration>,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

impl ShellExecutor for Shell {
    fn execute(&self, command: &str) -> Result<ShellOutput, ShellError> {
        log::debug!("Running `{command}` through sh");
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = match self.timeout {
            None => cmd.output().map_err(|source| ShellError::Io {
                command: command.to_string(),
                source,
            })?,
            Some(timeout) => {
                let child = cmd.spawn().map_err(|source| ShellError::Io {
                    command: command.to_string(),
                    source,
                })?;
                wait_with_timeout(child, command, timeout)?
            }
        };

        let status = output
            .status
            .code()
            .ok_or_else(|| ShellError::NoExitStatus {
                command: command.to_string(),
            })?;

        Ok(ShellOutput {
            stdout: trimmed(&output.stdout),
            status,
            stderr: trimmed(&output.stderr),
        })
    }
}

/// Polls the child until it exits or the deadline passes, in which case it
/// is killed. The pipes are drained on separate threads so a command
/// filling one of them cannot deadlock the wait.
fn wait_with_timeout(
    mut child: Child,
    command: &str,
    timeout: Duration,
) -> Result<std::process::Output, ShellError> {
    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();
    let stdout_reader = thread::spawn(move || drain(stdout_pipe));
    let stderr_reader = thread::spawn(move || drain(stderr_pipe));

    let deadline = Instant::now() + timeout;
    let status = loop {
        let waited = child.try_wait().map_err(|source| ShellError::Io {
            command: command.to_string(),
            source,
        })?;
        if let Some(status) = waited {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ShellError::Timeout {
                command: command.to_string(),
                timeout,
            });
        }
        thread::sleep(WAIT_POLL_INTERVAL);
    };

    Ok(std::process::Output {
        status,
        stdout: stdout_reader.join().unwrap_or_default(),
        stderr: stderr_reader.join().unwrap_or_default(),
    })
}

fn drain(pipe: Option<impl Read>) -> Vec<u8> {
    let mut buffer = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buffer);
    }
    buffer
}

fn trimmed(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

//! Parses the log output for a single commit into a [`Commit`] record.

use crate::Commit;
use crate::git::GitError;

/// Convert one single-entry `git log` text block into a [`Commit`].
///
/// Header lines are `<label> <value>` pairs split on the first space;
/// lines without a space are skipped and unknown labels are ignored, so
/// merge headers and the like pass through harmlessly. Labels are matched
/// case-sensitively, exactly as git emits them.
pub(crate) fn parse_log_entry(entry: &str) -> Result<Commit, GitError> {
    if entry.trim().is_empty() {
        return Err(GitError::EmptyLogEntry);
    }

    let mut revision = None;
    let mut author = None;
    let mut commit_date = None;

    for line in entry.lines() {
        let Some((label, value)) = line.split_once(' ') else {
            continue;
        };
        match label {
            "commit" => revision = Some(value.trim().to_string()),
            "Author:" => author = Some(value.trim().to_string()),
            "Date:" => commit_date = Some(value.trim().to_string()),
            _ => {}
        }
    }

    Ok(Commit {
        revision,
        author,
        commit_date,
        message: extract_message(entry),
    })
}

/// The message is the trimmed last line of the block.
///
/// This is coupled to the default single-entry `git log` layout, which puts
/// the subject last with no trailing blank line. Multi-line bodies are not
/// supported and would need a different extraction here.
fn extract_message(entry: &str) -> String {
    entry.lines().next_back().unwrap_or("").trim().to_string()
}

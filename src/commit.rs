/// A single commit as recovered from the log output of the VCS tool.
///
/// Everything is kept as the tool printed it: the author is the raw
/// `Name <email>` string and the date is not normalized to a timestamp,
/// downstream consumers that need one parse it themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Revision id, expected to be a 40 character SHA-1 hash.
    /// Only `None` when the log block had no `commit` header line.
    pub revision: Option<String>,
    /// Raw `Name <email>` author string
    pub author: Option<String>,
    /// Verbatim date string from the log output
    pub commit_date: Option<String>,
    /// First line of the commit message, trimmed
    pub message: String,
}

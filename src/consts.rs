pub const DEFAULT_GIT_BINARY: &str = "/usr/bin/git";

pub(crate) const GIT_METADATA_DIR_NAME: &str = ".git";

// Revisions are SHA-1 hashes in hexadecimal form
pub(crate) const SHA1_HEX_LENGTH: usize = 40;

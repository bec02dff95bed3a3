//! Error taxonomy and process exit codes.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that terminate a cleaning run.
///
/// Input and pattern errors surface before any filesystem mutation. Removal
/// errors abort mid-run; removals completed before the failure are not rolled
/// back.
#[derive(Debug, Error)]
pub enum CleanError {
    /// Permission or I/O failure removing a directory subtree.
    #[error("failed to remove directory {}: {source}", .path.display())]
    RemoveDir { path: PathBuf, source: io::Error },

    /// Permission or I/O failure unlinking a symbolic link.
    #[error("failed to unlink {}: {source}", .path.display())]
    RemoveLink { path: PathBuf, source: io::Error },

    /// Permission or I/O failure removing a regular file.
    #[error("failed to remove file {}: {source}", .path.display())]
    RemoveFile { path: PathBuf, source: io::Error },

    /// The document marks the captured root itself for deletion.
    #[error("cleaning document prescribes deleting the entire target directory")]
    DeletesTargetRoot,

    /// The cleaning document could not be read.
    #[error("could not read cleaning document {}: {source}", .path.display())]
    DocumentRead { path: PathBuf, source: io::Error },

    /// The cleaning document is not valid JSON.
    #[error("could not parse cleaning document {}: {source}", .path.display())]
    DocumentParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The document parsed but violates the tree shape contract.
    #[error("malformed tree in cleaning document: {reason}")]
    MalformedTree { reason: String },

    /// A pattern failed validation or compilation.
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl CleanError {
    /// Process exit status for this error. Each removal category gets its own
    /// code so callers can tell directory, link, and file failures apart.
    pub fn exit_code(&self) -> u8 {
        match self {
            CleanError::RemoveDir { .. } => 1,
            CleanError::RemoveLink { .. } => 2,
            CleanError::RemoveFile { .. } => 3,
            CleanError::DeletesTargetRoot => 4,
            CleanError::DocumentRead { .. }
            | CleanError::DocumentParse { .. }
            | CleanError::MalformedTree { .. } => 5,
            CleanError::InvalidPattern { .. } => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_category() {
        let dir = CleanError::RemoveDir {
            path: PathBuf::from("/tmp/a"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        let link = CleanError::RemoveLink {
            path: PathBuf::from("/tmp/b"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        let file = CleanError::RemoveFile {
            path: PathBuf::from("/tmp/c"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        let codes = [dir.exit_code(), link.exit_code(), file.exit_code()];
        assert_eq!(codes, [1, 2, 3]);
    }

    #[test]
    fn test_error_message_carries_path_and_os_error() {
        let err = CleanError::RemoveFile {
            path: PathBuf::from("/data/run01/junk.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/data/run01/junk.txt"));
        assert!(msg.contains("permission denied"));
    }
}

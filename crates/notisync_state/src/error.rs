//! Error types for state storage.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for state storage operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur while reading or writing client state.
#[derive(Debug, Error)]
pub enum StateError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The state file could not be decoded.
    #[error("state file corrupted: {0}")]
    Corrupted(String),

    /// The state could not be encoded.
    #[error("state encoding failed: {0}")]
    Encoding(String),

    /// Another process holds the state file.
    #[error("state file is locked by another process: {}", .0.display())]
    Locked(PathBuf),

    /// The state file was written by an unknown format version.
    #[error("unsupported state format version {found} (supported: {supported})")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u16,
        /// Version this build reads and writes.
        supported: u16,
    },

    /// The store is temporarily unable to serve the request.
    #[error("state store unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StateError::UnsupportedVersion {
            found: 9,
            supported: 1,
        };
        assert!(err.to_string().contains('9'));
        assert!(err.to_string().contains('1'));

        let err = StateError::Locked(PathBuf::from("/tmp/state.lock"));
        assert!(err.to_string().contains("/tmp/state.lock"));
    }

    #[test]
    fn io_conversion() {
        let err: StateError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, StateError::Io(_)));
    }
}

//! Domain error types for server operations.
//!
//! Errors are plain enums wrapped in `rootcause::Report` at the call site.

use std::fmt;
use std::path::PathBuf;

/// Session store errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The session to update does not exist.
    NotFound { session_id: String },
    /// The backing store could not be reached.
    Unavailable { details: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { session_id } => write!(f, "session '{}' not found", session_id),
            Self::Unavailable { details } => write!(f, "session store unavailable: {}", details),
        }
    }
}

impl std::error::Error for StoreError {}

/// Failures inside the role gate that are not access decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// Reading or writing the session failed.
    Session { details: String },
    /// Looking up the session's principal failed.
    Directory { details: String },
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session { details } => write!(f, "session error: {}", details),
            Self::Directory { details } => write!(f, "directory error: {}", details),
        }
    }
}

impl std::error::Error for GateError {}

/// Errors loading the directory seed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedError {
    /// The file could not be read.
    Read { path: PathBuf, reason: String },
    /// The file is not a valid seed document.
    Parse { path: PathBuf, reason: String },
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, reason } => {
                write!(f, "failed to read seed '{}': {}", path.display(), reason)
            }
            Self::Parse { path, reason } => {
                write!(f, "invalid seed '{}': {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for SeedError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_resource() {
        let err = StoreError::NotFound {
            session_id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "session 'abc' not found");

        let err = SeedError::Parse {
            path: PathBuf::from("/tmp/seed.json"),
            reason: "expected value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid seed '/tmp/seed.json': expected value"
        );
    }
}

//! Index Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An index error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of an index failure.
///
/// ### Fatal Errors
/// - [`ErrorKind::ListApks`]
/// - [`ErrorKind::Io`]
/// - [`ErrorKind::Serialize`]
///
/// ### Per-package Errors (logged and skipped)
/// - [`ErrorKind::Archive`]
/// - [`ErrorKind::IconNotFound`]
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The APK directory exists but could not be read.
    #[display("failed to list APKs in {}", _0.display())]
    ListApks(#[error(not(source))] PathBuf),
    /// Reading or writing a file failed.
    #[display("I/O error")]
    Io,
    /// The manifest could not be serialized.
    #[display("failed to serialize manifest")]
    Serialize,
    /// The APK is not a readable zip container.
    #[display("invalid APK archive")]
    Archive,
    /// The icon named by the badging dump is not inside the APK.
    #[display("icon not found in APK: {_0}")]
    IconNotFound(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::ListApks(PathBuf::from("repo/apk")).to_string(), "failed to list APKs in repo/apk");
        assert_eq!(ErrorKind::IconNotFound("res/icon.png".to_string()).to_string(), "icon not found in APK: res/icon.png");
        assert!(ErrorKind::Io.is_retryable());
        assert!(!ErrorKind::Archive.is_retryable());
    }
}

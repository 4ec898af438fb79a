//! Badging Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A badging error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for badging operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Neither an Android SDK build-tools `aapt` nor one on `PATH` was found.
    #[display("aapt not detected on your system")]
    AaptNotFound,
    /// `aapt` exited with a non-zero exit code.
    /// A code of `-1` means it was killed by a signal.
    #[display("aapt exited with code: {_0}")]
    AaptFailed(#[error(not(source))] i32),
    /// `aapt` printed something that is not UTF-8.
    #[display("aapt output is not valid UTF-8")]
    InvalidOutput,
    /// A required field could not be found in the badging dump.
    #[display("missing required field: {_0}")]
    MissingField(#[error(not(source))] &'static str),
    /// A field was found but could not be parsed.
    #[display("failed to parse field '{field}', found value: {value}")]
    ParseError {
        /// The field that failed to parse.
        field: &'static str,
        /// The raw value found in the dump.
        value: String,
    },
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }

    /// Returns `true` if the dump simply lacks a field the manifest needs.
    ///
    /// Such packages are omitted from the index without complaint.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, ErrorKind::MissingField(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exn::ResultExt;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::AaptFailed(1).to_string(), "aapt exited with code: 1");
        assert_eq!(ErrorKind::MissingField("label").to_string(), "missing required field: label");
        assert_eq!(
            ErrorKind::ParseError { field: "versionCode", value: "abc".to_string() }.to_string(),
            "failed to parse field 'versionCode', found value: abc"
        );
    }

    #[test]
    fn error_kind_classification() {
        assert!(ErrorKind::Io.is_retryable());
        assert!(!ErrorKind::AaptNotFound.is_retryable());
        assert!(ErrorKind::MissingField("package").is_incomplete());
        assert!(!ErrorKind::InvalidOutput.is_incomplete());
    }

    #[test]
    fn error_from_result() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "aapt"));
        let err: Result<()> = result.or_raise(|| ErrorKind::Io);
        assert_eq!(*err.unwrap_err(), ErrorKind::Io);
    }
}

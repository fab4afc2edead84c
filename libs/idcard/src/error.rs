//! Error types for ID number parsing, validation, and generation.

use thiserror::Error;

/// Errors that can occur when parsing, validating, or generating ID numbers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdCardError {
    /// The input string is empty.
    #[error("ID number cannot be empty")]
    Empty,

    /// The input does not have the shape of a 15- or 18-digit ID number.
    #[error("invalid ID number format: {message}")]
    InvalidFormat { message: String },

    /// The embedded birth date is not a real calendar date.
    #[error("invalid birth date: {date}")]
    InvalidBirthDate { date: String },

    /// The checksum character does not match the first 17 digits.
    #[error("checksum mismatch: expected '{expected}', got '{actual}'")]
    ChecksumMismatch { expected: char, actual: char },

    /// No known region matches the requested area code or prefix.
    #[error("unknown area code: {0}")]
    UnknownArea(String),
}

impl IdCardError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Returns true if the input failed the shape check.
    pub fn is_format_error(&self) -> bool {
        matches!(self, IdCardError::Empty | IdCardError::InvalidFormat { .. })
    }

    /// Returns true if the checksum character was wrong.
    pub fn is_checksum_error(&self) -> bool {
        matches!(self, IdCardError::ChecksumMismatch { .. })
    }
}

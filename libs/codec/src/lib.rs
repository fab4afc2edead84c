//! String encodings, digests, HMAC, and password generation.
//!
//! Every tool is an enum with an exhaustive `match`, so adding a variant is a
//! compile error until each operation handles it.

use thiserror::Error;

pub mod digest;
pub mod encoding;
pub mod password;

pub use digest::{digest, digest_all, hmac, DigestAlgorithm, StreamingDigest};
pub use encoding::Encoding;
pub use password::{strength, PasswordPolicy, Strength, StrengthLevel};

/// Codec errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The input is not valid for the chosen encoding.
    #[error("invalid {encoding} input: {reason}")]
    InvalidInput {
        encoding: &'static str,
        reason: String,
    },

    /// Decoding produced bytes that are not UTF-8 text.
    #[error("decoded bytes are not valid UTF-8")]
    InvalidUtf8,

    /// An encoding or algorithm name was not recognized.
    #[error("unknown {kind} '{name}'")]
    Unknown { kind: &'static str, name: String },

    /// The HMAC key was rejected.
    #[error("invalid HMAC key: {0}")]
    InvalidKey(String),

    /// The password length is outside the supported range.
    #[error("password length {length} must be between {min} and {max}")]
    InvalidLength {
        length: usize,
        min: usize,
        max: usize,
    },

    /// Every character class is disabled.
    #[error("no character classes enabled")]
    EmptyCharset,
}

impl CodecError {
    pub(crate) fn input(encoding: &'static str, reason: impl ToString) -> Self {
        Self::InvalidInput {
            encoding,
            reason: reason.to_string(),
        }
    }
}

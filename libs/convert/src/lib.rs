//! # devbox-convert
//!
//! Pure conversions used by the devbox toolbox:
//!
//! - [`color`]: parse CSS-style colors and render every notation.
//! - [`timestamp`]: Unix timestamps and textual dates in a fixed offset.
//! - [`units`]: data sizes and CSS lengths.
//! - [`json`]: format, minify, and validate JSON documents.
//! - [`regex`]: test and replace with a library of common patterns.
//! - [`qr`]: render QR codes to the terminal, SVG, or PNG and scan images.

use thiserror::Error;

pub mod color;
pub mod json;
pub mod qr;
pub mod regex;
pub mod timestamp;
pub mod units;

pub use self::color::{Cmyk, Color, ColorFormat, ColorReport, Hsl, Hsv, Rgb};
pub use self::json::{JsonError, JsonStats};
pub use self::qr::{EcLevel, QrOptions, QrPayload};
pub use self::regex::{MatchReport, RegexFlags, RegexMatch, RegexTemplate};
pub use self::timestamp::{TimestampReport, TimestampUnit};
pub use self::units::{CssContext, CssUnit, DataUnit, UnitValue};

/// Conversion errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConvertError {
    #[error("invalid color '{0}'")]
    InvalidColor(String),

    #[error("invalid timestamp '{input}': {reason}")]
    InvalidTimestamp { input: String, reason: String },

    #[error("unknown {kind} '{name}'")]
    UnknownUnit { kind: &'static str, name: String },

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error(transparent)]
    Json(#[from] JsonError),

    #[error("invalid regex: {0}")]
    InvalidRegex(String),

    #[error("QR encoding failed: {0}")]
    QrEncode(String),

    #[error("image error: {0}")]
    Image(String),

    #[error("no QR code found in image")]
    NoQrCode,
}

//! # devbox-idcard
//!
//! Generation, parsing, and validation of national ID numbers (GB 11643).
//!
//! ## Number Format
//!
//! An 18-character ID number is laid out as:
//!
//! ```text
//! 110101 19900101 001 5
//! ^^^^^^ ^^^^^^^^ ^^^ ^
//! area   birth    seq checksum
//! ```
//!
//! - The area code is a 6-digit administrative region.
//! - The birth date is `YYYYMMDD` and must be a real calendar date.
//! - The parity of the last sequence digit encodes gender (odd = male).
//! - The checksum is a weighted modulus-11 digest of the first 17 digits,
//!   rendered as `0`-`9` or `X`.
//!
//! The legacy 15-digit form (`YYMMDD` birth date, no checksum) is accepted by
//! [`validate`] and can be upgraded with [`LegacyIdNumber::upgrade`].
//!
//! ## Usage
//!
//! ```
//! use devbox_idcard::{generate, validate, GenerateOptions};
//!
//! let mut rng = rand::rng();
//! let id = generate(&GenerateOptions::default(), &mut rng).unwrap();
//! assert!(validate(id.as_str()).valid);
//! ```

mod calendar;
mod error;
mod generate;
mod number;
mod region;
mod validate;

pub use calendar::{age_at, days_in_month, is_leap_year, Gender, StarSign, Zodiac};
pub use error::IdCardError;
pub use generate::{
    generate, generate_batch, GenerateOptions, DEFAULT_END_YEAR, DEFAULT_START_YEAR,
    MAX_BATCH_SIZE, MAX_YEAR, MIN_YEAR,
};
pub use number::{checksum, checksum_of, IdNumber, LegacyIdNumber, ParsedId, CHECK_CHARS, WEIGHTS};
pub use region::{find_region, find_regions, province_name, regions, Region};
pub use validate::{validate, validate_at, IdCardInfo, Validation};

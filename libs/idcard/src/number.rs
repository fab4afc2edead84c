//! ID number types, shape checks, and the checksum.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::Deserialize;

use crate::calendar::Gender;
use crate::error::IdCardError;

/// Positional weights applied to the first 17 digits.
pub const WEIGHTS: [u32; 17] = [7, 9, 10, 5, 8, 4, 2, 1, 6, 3, 7, 9, 10, 5, 8, 4, 2];

/// Checksum character for each weighted-sum remainder mod 11.
pub const CHECK_CHARS: [char; 11] = ['1', '0', 'X', '9', '8', '7', '6', '5', '4', '3', '2'];

const LENGTH: usize = 18;
const LEGACY_LENGTH: usize = 15;

fn standard_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| {
        Regex::new(r"^[1-9]\d{5}(18|19|20)\d{2}(0[1-9]|1[0-2])(0[1-9]|[12]\d|3[01])\d{3}[0-9Xx]$")
            .expect("standard id regex")
    })
}

fn legacy_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| {
        Regex::new(r"^[1-9]\d{7}(0[1-9]|1[0-2])(0[1-9]|[12]\d|3[01])\d{3}$").expect("legacy id regex")
    })
}

/// Checksum character for 17 digit values (each 0-9).
pub fn checksum_of(digits: &[u32; 17]) -> char {
    let sum: u32 = digits.iter().zip(WEIGHTS).map(|(d, w)| d * w).sum();
    CHECK_CHARS[(sum % 11) as usize]
}

/// Checksum character for the first 17 characters of an ID number.
pub fn checksum(body: &str) -> Result<char, IdCardError> {
    let digits = body_digits(body)?;
    Ok(checksum_of(&digits))
}

fn body_digits(body: &str) -> Result<[u32; 17], IdCardError> {
    if body.len() != 17 {
        return Err(IdCardError::format(format!(
            "checksum body must be 17 digits, got {} characters",
            body.len()
        )));
    }
    let mut digits = [0u32; 17];
    for (slot, c) in digits.iter_mut().zip(body.chars()) {
        *slot = c
            .to_digit(10)
            .ok_or_else(|| IdCardError::format(format!("invalid character '{}'", c)))?;
    }
    Ok(digits)
}

/// Parses an 8-digit `YYYYMMDD` birth date.
fn parse_birth(text: &str) -> Result<NaiveDate, IdCardError> {
    let invalid = || IdCardError::InvalidBirthDate {
        date: text.to_string(),
    };
    if text.len() != 8 {
        return Err(invalid());
    }
    let year: i32 = text[..4].parse().map_err(|_| invalid())?;
    let month: u32 = text[4..6].parse().map_err(|_| invalid())?;
    let day: u32 = text[6..].parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// A validated 18-digit ID number.
///
/// The stored form is canonical: an `x` checksum is upper-cased on parse.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdNumber {
    value: String,
    birth: NaiveDate,
}

impl IdNumber {
    /// Parses and fully validates an 18-digit ID number.
    pub fn parse(s: &str) -> Result<Self, IdCardError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdCardError::Empty);
        }
        if s.len() != LENGTH {
            return Err(IdCardError::format(format!(
                "expected {} characters, got {}",
                LENGTH,
                s.chars().count()
            )));
        }
        if !standard_shape().is_match(s) {
            return Err(IdCardError::format("does not match the 18-digit layout"));
        }

        let value = s.to_ascii_uppercase();
        let birth = parse_birth(&value[6..14])?;

        let expected = checksum(&value[..17])?;
        let actual = value.as_bytes()[17] as char;
        if expected != actual {
            return Err(IdCardError::ChecksumMismatch { expected, actual });
        }

        Ok(Self { value, birth })
    }

    /// Builds an ID number from its parts and appends the checksum.
    pub fn from_parts(area: &str, birth: NaiveDate, sequence: u16) -> Result<Self, IdCardError> {
        if area.len() != 6 || !area.bytes().all(|b| b.is_ascii_digit()) || area.starts_with('0') {
            return Err(IdCardError::format(format!("invalid area code '{}'", area)));
        }
        if !(1800..=2099).contains(&birth.year()) {
            return Err(IdCardError::InvalidBirthDate {
                date: birth.format("%Y%m%d").to_string(),
            });
        }
        if sequence > 999 {
            return Err(IdCardError::format(format!(
                "sequence {} exceeds 3 digits",
                sequence
            )));
        }

        let body = format!("{}{}{:03}", area, birth.format("%Y%m%d"), sequence);
        let check = checksum(&body)?;
        Ok(Self {
            value: format!("{}{}", body, check),
            birth,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn area_code(&self) -> &str {
        &self.value[..6]
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth
    }

    pub fn sequence(&self) -> &str {
        &self.value[14..17]
    }

    pub fn check_char(&self) -> char {
        self.value.as_bytes()[17] as char
    }

    pub fn gender(&self) -> Gender {
        Gender::from_digit(u32::from(self.value.as_bytes()[16] - b'0'))
    }
}

impl fmt::Display for IdNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for IdNumber {
    type Err = IdCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for IdNumber {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl serde::Serialize for IdNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.value)
    }
}

impl<'de> serde::Deserialize<'de> for IdNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A 15-digit legacy ID number (two-digit year, no checksum).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LegacyIdNumber {
    value: String,
}

impl LegacyIdNumber {
    /// Parses a 15-digit number. Only the shape is checked.
    pub fn parse(s: &str) -> Result<Self, IdCardError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdCardError::Empty);
        }
        if s.len() != LEGACY_LENGTH {
            return Err(IdCardError::format(format!(
                "expected {} characters, got {}",
                LEGACY_LENGTH,
                s.chars().count()
            )));
        }
        if !legacy_shape().is_match(s) {
            return Err(IdCardError::format("does not match the 15-digit layout"));
        }
        Ok(Self {
            value: s.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn area_code(&self) -> &str {
        &self.value[..6]
    }

    pub fn sequence(&self) -> &str {
        &self.value[12..15]
    }

    /// Birth date with the implied `19` century, if it is a real date.
    pub fn birth_date(&self) -> Option<NaiveDate> {
        parse_birth(&format!("19{}", &self.value[6..12])).ok()
    }

    pub fn gender(&self) -> Gender {
        Gender::from_digit(u32::from(self.value.as_bytes()[14] - b'0'))
    }

    /// Converts to the 18-digit form by inserting the century and a checksum.
    pub fn upgrade(&self) -> Result<IdNumber, IdCardError> {
        let birth = self.birth_date().ok_or_else(|| IdCardError::InvalidBirthDate {
            date: format!("19{}", &self.value[6..12]),
        })?;
        let sequence: u16 = self
            .sequence()
            .parse()
            .map_err(|_| IdCardError::format("invalid sequence code"))?;
        IdNumber::from_parts(self.area_code(), birth, sequence)
    }
}

impl fmt::Display for LegacyIdNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Either form of ID number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedId {
    Standard(IdNumber),
    Legacy(LegacyIdNumber),
}

impl ParsedId {
    /// Parses a 15- or 18-character ID number, dispatching on length.
    pub fn parse(s: &str) -> Result<Self, IdCardError> {
        let s = s.trim();
        match s.len() {
            0 => Err(IdCardError::Empty),
            LENGTH => IdNumber::parse(s).map(ParsedId::Standard),
            LEGACY_LENGTH => LegacyIdNumber::parse(s).map(ParsedId::Legacy),
            _ => Err(IdCardError::format(format!(
                "expected 15 or 18 characters, got {}",
                s.chars().count()
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ParsedId::Standard(id) => id.as_str(),
            ParsedId::Legacy(id) => id.as_str(),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, ParsedId::Legacy(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_known_vectors() {
        assert_eq!(checksum("11010119900101001").unwrap(), '5');
        assert_eq!(checksum("11010519491231002").unwrap(), 'X');
        assert_eq!(checksum("44030519900307123").unwrap(), '6');
    }

    #[test]
    fn test_checksum_rejects_bad_body() {
        assert!(checksum("1101011990010100").is_err());
        assert!(checksum("1101011990010100A").is_err());
    }

    #[test]
    fn test_parse_standard() {
        let id = IdNumber::parse("110101199001010015").unwrap();
        assert_eq!(id.area_code(), "110101");
        assert_eq!(id.birth_date(), NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
        assert_eq!(id.sequence(), "001");
        assert_eq!(id.gender(), Gender::Male);
        assert_eq!(id.check_char(), '5');
    }

    #[test]
    fn test_parse_lowercase_x_is_canonicalized() {
        let id = IdNumber::parse(" 11010519491231002x ").unwrap();
        assert_eq!(id.as_str(), "11010519491231002X");
        assert_eq!(id.gender(), Gender::Female);
    }

    #[test]
    fn test_parse_checksum_mismatch() {
        let err = IdNumber::parse("110101199001010016").unwrap_err();
        assert_eq!(
            err,
            IdCardError::ChecksumMismatch {
                expected: '5',
                actual: '6'
            }
        );
        assert!(err.is_checksum_error());
    }

    #[test]
    fn test_parse_calendar_invalid_date() {
        // 1990-02-30 passes the shape check but is not a real date
        let body = "11010119900230001";
        let check = checksum(body).unwrap();
        let err = IdNumber::parse(&format!("{}{}", body, check)).unwrap_err();
        assert!(matches!(err, IdCardError::InvalidBirthDate { .. }));
    }

    #[test]
    fn test_parse_leap_day() {
        let leap = IdNumber::from_parts("110101", NaiveDate::from_ymd_opt(2000, 2, 29).unwrap(), 12);
        assert!(leap.is_ok());

        let body = "11010119000229001";
        let check = checksum(body).unwrap();
        assert!(IdNumber::parse(&format!("{}{}", body, check)).is_err());
    }

    #[test]
    fn test_parse_format_errors() {
        assert_eq!(IdNumber::parse("").unwrap_err(), IdCardError::Empty);
        assert!(IdNumber::parse("12345").unwrap_err().is_format_error());
        assert!(IdNumber::parse("010101199001010015").unwrap_err().is_format_error());
        assert!(IdNumber::parse("110101179001010015").unwrap_err().is_format_error());
        assert!(IdNumber::parse("11010119901301001X").unwrap_err().is_format_error());
    }

    #[test]
    fn test_from_parts_matches_parse() {
        let birth = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        let id = IdNumber::from_parts("110101", birth, 1).unwrap();
        assert_eq!(id.as_str(), "110101199001010015");
        assert_eq!(IdNumber::parse(id.as_str()).unwrap(), id);
    }

    #[test]
    fn test_from_parts_rejects_bad_input() {
        let birth = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        assert!(IdNumber::from_parts("11010", birth, 1).is_err());
        assert!(IdNumber::from_parts("011010", birth, 1).is_err());
        assert!(IdNumber::from_parts("110101", birth, 1000).is_err());
        let old = NaiveDate::from_ymd_opt(1700, 1, 1).unwrap();
        assert!(IdNumber::from_parts("110101", old, 1).is_err());
    }

    #[test]
    fn test_legacy_parse_and_upgrade() {
        let legacy = LegacyIdNumber::parse("110101900101001").unwrap();
        assert_eq!(legacy.birth_date(), NaiveDate::from_ymd_opt(1990, 1, 1));
        assert_eq!(legacy.gender(), Gender::Male);
        assert_eq!(legacy.upgrade().unwrap().as_str(), "110101199001010015");
    }

    #[test]
    fn test_legacy_calendar_invalid_date_cannot_upgrade() {
        let legacy = LegacyIdNumber::parse("110101900231002").unwrap();
        assert!(legacy.birth_date().is_none());
        assert!(matches!(
            legacy.upgrade(),
            Err(IdCardError::InvalidBirthDate { .. })
        ));
    }

    #[test]
    fn test_parsed_id_dispatch() {
        assert!(!ParsedId::parse("110101199001010015").unwrap().is_legacy());
        assert!(ParsedId::parse("110101900101001").unwrap().is_legacy());
        assert!(ParsedId::parse("1101011990").unwrap_err().is_format_error());
        assert_eq!(ParsedId::parse("   ").unwrap_err(), IdCardError::Empty);
    }

    #[test]
    fn test_id_number_json_roundtrip() {
        let id = IdNumber::parse("11010519491231002X").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"11010519491231002X\"");
        let parsed: IdNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
        assert!(serde_json::from_str::<IdNumber>("\"110101199001010016\"").is_err());
    }
}

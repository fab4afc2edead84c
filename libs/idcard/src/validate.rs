//! Validation and field extraction.
//!
//! [`validate`] never fails: problems are reported in [`Validation::reason`].

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;

use crate::calendar::{age_at, Gender, StarSign, Zodiac};
use crate::number::ParsedId;
use crate::region::{find_region, province_name};

/// Outcome of validating a candidate ID number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub valid: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<IdCardInfo>,
}

/// Fields derived from a valid ID number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdCardInfo {
    /// Normalized input (trimmed, upper-case checksum).
    pub number: String,
    pub legacy: bool,
    /// 18-digit form of a legacy number, when its birth date is real.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgraded: Option<String>,
    pub area_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zodiac: Option<Zodiac>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub star_sign: Option<StarSign>,
    pub sequence: String,
}

/// Validates `input` and derives its fields, computing age as of today.
pub fn validate(input: &str) -> Validation {
    validate_at(input, Local::now().date_naive())
}

/// Validates `input`, computing age as of `today`.
pub fn validate_at(input: &str, today: NaiveDate) -> Validation {
    match ParsedId::parse(input) {
        Ok(parsed) => Validation {
            valid: true,
            reason: None,
            info: Some(describe(&parsed, today)),
        },
        Err(err) => Validation {
            valid: false,
            reason: Some(err.to_string()),
            info: None,
        },
    }
}

fn describe(parsed: &ParsedId, today: NaiveDate) -> IdCardInfo {
    let (area_code, birth_date, gender, sequence, upgraded) = match parsed {
        ParsedId::Standard(id) => (
            id.area_code(),
            Some(id.birth_date()),
            id.gender(),
            id.sequence(),
            None,
        ),
        ParsedId::Legacy(id) => (
            id.area_code(),
            id.birth_date(),
            id.gender(),
            id.sequence(),
            id.upgrade().ok().map(|u| u.to_string()),
        ),
    };

    IdCardInfo {
        number: parsed.as_str().to_string(),
        legacy: parsed.is_legacy(),
        upgraded,
        area_code: area_code.to_string(),
        province: province_name(area_code).map(str::to_string),
        region: find_region(area_code).map(|r| r.full_name()),
        birth_date,
        age: birth_date.and_then(|b| age_at(b, today)),
        gender,
        zodiac: birth_date.map(|b| Zodiac::from_year(b.year())),
        star_sign: birth_date.map(StarSign::from_date),
        sequence: sequence.to_string(),
    }
}

//! Random ID number generation.

use chrono::NaiveDate;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::calendar::{days_in_month, Gender};
use crate::error::IdCardError;
use crate::number::IdNumber;
use crate::region::{find_regions, regions, Region};

/// Birth-year range used when the requested range is invalid.
pub const DEFAULT_START_YEAR: i32 = 1970;
pub const DEFAULT_END_YEAR: i32 = 2005;

/// Years representable in an 18-digit number (centuries 18, 19, 20).
pub const MIN_YEAR: i32 = 1800;
pub const MAX_YEAR: i32 = 2099;

/// Upper bound for a single batch.
pub const MAX_BATCH_SIZE: usize = 100;

/// Parameters for [`generate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Region code or prefix (2, 4 or 6 digits). Random region when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,

    #[serde(default = "default_start_year")]
    pub start_year: i32,

    #[serde(default = "default_end_year")]
    pub end_year: i32,

    /// Random gender when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

fn default_start_year() -> i32 {
    DEFAULT_START_YEAR
}

fn default_end_year() -> i32 {
    DEFAULT_END_YEAR
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            area: None,
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            gender: None,
        }
    }
}

impl GenerateOptions {
    /// Effective inclusive year range.
    ///
    /// A reversed range or one outside `MIN_YEAR..=MAX_YEAR` falls back to
    /// the defaults instead of failing.
    pub fn year_range(&self) -> (i32, i32) {
        let (start, end) = (self.start_year, self.end_year);
        if start > end || start < MIN_YEAR || end > MAX_YEAR {
            (DEFAULT_START_YEAR, DEFAULT_END_YEAR)
        } else {
            (start, end)
        }
    }
}

/// Generates a random, valid ID number.
///
/// The only error is an `area` that matches no known region.
pub fn generate<R: Rng + ?Sized>(
    options: &GenerateOptions,
    rng: &mut R,
) -> Result<IdNumber, IdCardError> {
    let region = pick_region(options.area.as_deref(), rng)?;
    let (start, end) = options.year_range();
    let birth = random_birth_date(start, end, rng)?;
    let gender = match options.gender {
        Some(gender) => gender,
        None if rng.random_bool(0.5) => Gender::Male,
        None => Gender::Female,
    };
    let sequence = random_sequence(gender, rng);

    IdNumber::from_parts(region.code, birth, sequence)
}

/// Generates `count` numbers (clamped to `1..=MAX_BATCH_SIZE`).
pub fn generate_batch<R: Rng + ?Sized>(
    options: &GenerateOptions,
    count: usize,
    rng: &mut R,
) -> Result<Vec<IdNumber>, IdCardError> {
    let count = count.clamp(1, MAX_BATCH_SIZE);
    (0..count).map(|_| generate(options, rng)).collect()
}

fn pick_region<R: Rng + ?Sized>(
    area: Option<&str>,
    rng: &mut R,
) -> Result<&'static Region, IdCardError> {
    let unknown = || IdCardError::UnknownArea(area.unwrap_or_default().to_string());
    let candidates = match area.map(str::trim) {
        Some(prefix) if !prefix.is_empty() => {
            if !is_area_prefix(prefix) {
                return Err(unknown());
            }
            find_regions(prefix)
        }
        _ => regions().iter().collect(),
    };
    candidates.choose(rng).copied().ok_or_else(unknown)
}

/// Province, city or county prefix: 2, 4 or 6 ASCII digits.
fn is_area_prefix(prefix: &str) -> bool {
    matches!(prefix.len(), 2 | 4 | 6) && prefix.bytes().all(|b| b.is_ascii_digit())
}

fn random_birth_date<R: Rng + ?Sized>(
    start_year: i32,
    end_year: i32,
    rng: &mut R,
) -> Result<NaiveDate, IdCardError> {
    let year = rng.random_range(start_year..=end_year);
    let month = rng.random_range(1..=12);
    let day = rng.random_range(1..=days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| IdCardError::InvalidBirthDate {
        date: format!("{:04}{:02}{:02}", year, month, day),
    })
}

/// Random sequence in `1..=999` whose last digit has the gender's parity.
fn random_sequence<R: Rng + ?Sized>(gender: Gender, rng: &mut R) -> u16 {
    let parity = match gender {
        Gender::Male => 1,
        Gender::Female => 0,
    };
    let last = rng.random_range(0..5u16) * 2 + parity;
    // 000 is not issued
    let prefix = if last == 0 {
        rng.random_range(1..100u16)
    } else {
        rng.random_range(0..100u16)
    };
    prefix * 10 + last
}

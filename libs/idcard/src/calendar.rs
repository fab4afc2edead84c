//! Calendar arithmetic derived from the birth date and sequence code.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::IdCardError;

/// Gender encoded in the parity of the last sequence digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Gender for a sequence digit (odd = male, even = female).
    pub fn from_digit(digit: u32) -> Self {
        if digit % 2 == 1 {
            Gender::Male
        } else {
            Gender::Female
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn label_zh(self) -> &'static str {
        match self {
            Gender::Male => "男",
            Gender::Female => "女",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = IdCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" | "男" => Ok(Gender::Male),
            "female" | "f" | "女" => Ok(Gender::Female),
            other => Err(IdCardError::format(format!("unknown gender '{}'", other))),
        }
    }
}

/// Chinese zodiac animal for a birth year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zodiac {
    Rat,
    Ox,
    Tiger,
    Rabbit,
    Dragon,
    Snake,
    Horse,
    Goat,
    Monkey,
    Rooster,
    Dog,
    Pig,
}

impl Zodiac {
    const CYCLE: [Zodiac; 12] = [
        Zodiac::Rat,
        Zodiac::Ox,
        Zodiac::Tiger,
        Zodiac::Rabbit,
        Zodiac::Dragon,
        Zodiac::Snake,
        Zodiac::Horse,
        Zodiac::Goat,
        Zodiac::Monkey,
        Zodiac::Rooster,
        Zodiac::Dog,
        Zodiac::Pig,
    ];

    /// `(year - 4) mod 12` indexed into the cycle starting at the Rat.
    pub fn from_year(year: i32) -> Self {
        Self::CYCLE[(year - 4).rem_euclid(12) as usize]
    }

    pub fn label_zh(self) -> &'static str {
        match self {
            Zodiac::Rat => "鼠",
            Zodiac::Ox => "牛",
            Zodiac::Tiger => "虎",
            Zodiac::Rabbit => "兔",
            Zodiac::Dragon => "龙",
            Zodiac::Snake => "蛇",
            Zodiac::Horse => "马",
            Zodiac::Goat => "羊",
            Zodiac::Monkey => "猴",
            Zodiac::Rooster => "鸡",
            Zodiac::Dog => "狗",
            Zodiac::Pig => "猪",
        }
    }
}

impl fmt::Display for Zodiac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Western star sign (constellation) for a birth month and day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StarSign {
    Capricorn,
    Aquarius,
    Pisces,
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
}

impl StarSign {
    /// Sign in effect on the first day of each month.
    const BY_MONTH: [StarSign; 12] = [
        StarSign::Capricorn,
        StarSign::Aquarius,
        StarSign::Pisces,
        StarSign::Aries,
        StarSign::Taurus,
        StarSign::Gemini,
        StarSign::Cancer,
        StarSign::Leo,
        StarSign::Virgo,
        StarSign::Libra,
        StarSign::Scorpio,
        StarSign::Sagittarius,
    ];

    /// Day of month on which the next sign begins.
    const CUTOFFS: [u32; 12] = [20, 19, 21, 20, 21, 22, 23, 23, 23, 24, 23, 22];

    pub fn from_date(date: NaiveDate) -> Self {
        let idx = date.month0() as usize;
        if date.day() < Self::CUTOFFS[idx] {
            Self::BY_MONTH[idx]
        } else {
            Self::BY_MONTH[(idx + 1) % 12]
        }
    }

    pub fn label_zh(self) -> &'static str {
        match self {
            StarSign::Capricorn => "摩羯座",
            StarSign::Aquarius => "水瓶座",
            StarSign::Pisces => "双鱼座",
            StarSign::Aries => "白羊座",
            StarSign::Taurus => "金牛座",
            StarSign::Gemini => "双子座",
            StarSign::Cancer => "巨蟹座",
            StarSign::Leo => "狮子座",
            StarSign::Virgo => "处女座",
            StarSign::Libra => "天秤座",
            StarSign::Scorpio => "天蝎座",
            StarSign::Sagittarius => "射手座",
        }
    }
}

impl fmt::Display for StarSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`; 0 for an out-of-range month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Completed years between `birth` and `today`.
///
/// Returns `None` when `birth` is after `today`.
pub fn age_at(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    if birth > today {
        return None;
    }
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    u32::try_from(age).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_gender_parity() {
        assert_eq!(Gender::from_digit(1), Gender::Male);
        assert_eq!(Gender::from_digit(9), Gender::Male);
        assert_eq!(Gender::from_digit(0), Gender::Female);
        assert_eq!(Gender::from_digit(8), Gender::Female);
        assert_ne!(Gender::from_digit(3), Gender::Female);
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("F".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("女".parse::<Gender>().unwrap(), Gender::Female);
        assert!("other".parse::<Gender>().unwrap_err().is_format_error());
    }

    #[test]
    fn test_zodiac_from_year() {
        assert_eq!(Zodiac::from_year(1900), Zodiac::Rat);
        assert_eq!(Zodiac::from_year(1990), Zodiac::Horse);
        assert_eq!(Zodiac::from_year(2000), Zodiac::Dragon);
        assert_eq!(Zodiac::from_year(2024), Zodiac::Dragon);
        assert_eq!(Zodiac::from_year(2019), Zodiac::Pig);
        assert_eq!(Zodiac::from_year(1), Zodiac::Rooster);
    }

    #[test]
    fn test_star_sign_boundaries() {
        assert_eq!(StarSign::from_date(date(1990, 1, 1)), StarSign::Capricorn);
        assert_eq!(StarSign::from_date(date(1990, 1, 19)), StarSign::Capricorn);
        assert_eq!(StarSign::from_date(date(1990, 1, 20)), StarSign::Aquarius);
        assert_eq!(StarSign::from_date(date(1990, 3, 20)), StarSign::Pisces);
        assert_eq!(StarSign::from_date(date(1990, 3, 21)), StarSign::Aries);
        assert_eq!(StarSign::from_date(date(1990, 10, 23)), StarSign::Libra);
        assert_eq!(StarSign::from_date(date(1990, 10, 24)), StarSign::Scorpio);
        assert_eq!(StarSign::from_date(date(1990, 12, 21)), StarSign::Sagittarius);
        assert_eq!(StarSign::from_date(date(1990, 12, 22)), StarSign::Capricorn);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 12), 31);
        assert_eq!(days_in_month(2023, 13), 0);
    }

    #[test]
    fn test_age_at() {
        let birth = date(1990, 6, 15);
        assert_eq!(age_at(birth, date(2020, 6, 14)), Some(29));
        assert_eq!(age_at(birth, date(2020, 6, 15)), Some(30));
        assert_eq!(age_at(birth, date(1990, 6, 15)), Some(0));
        assert_eq!(age_at(birth, date(1990, 6, 14)), None);
    }

    #[test]
    fn test_age_for_leap_day_birth() {
        let birth = date(2000, 2, 29);
        assert_eq!(age_at(birth, date(2001, 2, 28)), Some(0));
        assert_eq!(age_at(birth, date(2001, 3, 1)), Some(1));
    }
}

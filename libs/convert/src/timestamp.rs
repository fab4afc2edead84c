//! Unix timestamp and date conversions.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Offset, SecondsFormat, TimeZone,
    Utc,
};
use serde::{Deserialize, Serialize};

use crate::ConvertError;

const SQL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const RFC2822_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Scale of a numeric timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampUnit {
    /// Pick by digit count: up to 10 seconds, 13 millis, 16 micros, else nanos.
    #[default]
    Auto,
    Seconds,
    Millis,
    Micros,
    Nanos,
}

impl TimestampUnit {
    fn detect(digits: usize) -> Self {
        match digits {
            0..=10 => TimestampUnit::Seconds,
            11..=13 => TimestampUnit::Millis,
            14..=16 => TimestampUnit::Micros,
            _ => TimestampUnit::Nanos,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimestampUnit::Auto => "auto",
            TimestampUnit::Seconds => "s",
            TimestampUnit::Millis => "ms",
            TimestampUnit::Micros => "us",
            TimestampUnit::Nanos => "ns",
        }
    }
}

impl fmt::Display for TimestampUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimestampUnit {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(TimestampUnit::Auto),
            "s" | "sec" | "secs" | "seconds" => Ok(TimestampUnit::Seconds),
            "ms" | "millis" | "milliseconds" => Ok(TimestampUnit::Millis),
            "us" | "µs" | "micros" | "microseconds" => Ok(TimestampUnit::Micros),
            "ns" | "nanos" | "nanoseconds" => Ok(TimestampUnit::Nanos),
            _ => Err(ConvertError::UnknownUnit {
                kind: "timestamp unit",
                name: s.to_string(),
            }),
        }
    }
}

/// One instant rendered in every supported notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimestampReport {
    pub unix_seconds: i64,
    pub unix_millis: i64,
    pub iso_utc: String,
    pub rfc3339: String,
    pub rfc2822: String,
    pub sql: String,
    pub weekday: String,
    pub day_of_year: u32,
    pub relative: String,
}

/// Parses a numeric timestamp or a textual date.
///
/// Textual forms without an explicit zone (`YYYY-MM-DD HH:MM:SS`,
/// `YYYY-MM-DD`) are read in `offset`. Instants outside the UTC years
/// 0000 to 9999 are rejected.
pub fn parse_instant(
    text: &str,
    unit: TimestampUnit,
    offset: FixedOffset,
) -> Result<DateTime<Utc>, ConvertError> {
    let instant = parse_unbounded(text, unit, offset)?;
    if !(0..=9999).contains(&instant.year()) {
        return Err(ConvertError::InvalidTimestamp {
            input: text.trim().to_string(),
            reason: "instant out of range".to_string(),
        });
    }
    Ok(instant)
}

fn parse_unbounded(
    text: &str,
    unit: TimestampUnit,
    offset: FixedOffset,
) -> Result<DateTime<Utc>, ConvertError> {
    let input = text.trim();
    let invalid = |reason: &str| ConvertError::InvalidTimestamp {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    if input.is_empty() {
        return Err(invalid("empty input"));
    }

    let digits = input.strip_prefix('-').unwrap_or(input);
    if digits.chars().all(|c| c.is_ascii_digit()) {
        let value: i64 = input.parse().map_err(|_| invalid("number out of range"))?;
        let unit = match unit {
            TimestampUnit::Auto => TimestampUnit::detect(digits.len()),
            other => other,
        };
        return from_number(value, unit).ok_or_else(|| invalid("instant out of range"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(input, SQL_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| invalid("unrecognized date format"))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| invalid("instant out of range"))
}

fn from_number(value: i64, unit: TimestampUnit) -> Option<DateTime<Utc>> {
    match unit {
        TimestampUnit::Seconds | TimestampUnit::Auto => DateTime::from_timestamp(value, 0),
        TimestampUnit::Millis => DateTime::from_timestamp_millis(value),
        TimestampUnit::Micros => DateTime::from_timestamp_micros(value),
        TimestampUnit::Nanos => Some(DateTime::from_timestamp_nanos(value)),
    }
}

/// Renders `instant` relative to the current time.
pub fn convert(instant: DateTime<Utc>, offset: FixedOffset) -> TimestampReport {
    convert_at(instant, offset, Utc::now())
}

/// Renders `instant`, describing it relative to `now`.
pub fn convert_at(
    instant: DateTime<Utc>,
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> TimestampReport {
    let local = instant.with_timezone(&offset);
    TimestampReport {
        unix_seconds: instant.timestamp(),
        unix_millis: instant.timestamp_millis(),
        iso_utc: instant.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        rfc3339: local.to_rfc3339_opts(SecondsFormat::AutoSi, false),
        // to_rfc2822 panics outside years 0..=9999, which a local offset can reach
        rfc2822: local.format(RFC2822_FORMAT).to_string(),
        sql: local.format(SQL_FORMAT).to_string(),
        weekday: local.format("%A").to_string(),
        day_of_year: local.ordinal(),
        relative: relative(instant, now),
    }
}

/// Offset east of UTC in minutes, clamped to ±18 hours.
pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    let seconds = minutes.clamp(-18 * 60, 18 * 60) * 60;
    FixedOffset::east_opt(seconds).unwrap_or_else(|| Utc.fix())
}

fn relative(instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(instant).num_seconds();
    let secs = delta.unsigned_abs();
    if secs < 45 {
        return "just now".to_string();
    }

    let (amount, unit) = match secs {
        0..=3_599 => ((secs + 30) / 60, "minute"),
        3_600..=86_399 => ((secs + 1_800) / 3_600, "hour"),
        86_400..=2_591_999 => (secs / 86_400, "day"),
        2_592_000..=31_535_999 => (secs / 2_592_000, "month"),
        _ => (secs / 31_536_000, "year"),
    };
    let plural = if amount == 1 { "" } else { "s" };

    if delta > 0 {
        format!("{} {}{} ago", amount, unit, plural)
    } else {
        format!("in {} {}{}", amount, unit, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn utc() -> FixedOffset {
        offset_from_minutes(0)
    }

    fn beijing() -> FixedOffset {
        offset_from_minutes(8 * 60)
    }

    #[rstest]
    #[case("1700000000", 1_700_000_000_000)]
    #[case("1700000000123", 1_700_000_000_123)]
    #[case("1700000000123456", 1_700_000_000_123)]
    #[case("1700000000123456789", 1_700_000_000_123)]
    #[case("0", 0)]
    #[case("-86400", -86_400_000)]
    fn test_auto_unit_by_digit_count(#[case] input: &str, #[case] millis: i64) {
        let instant = parse_instant(input, TimestampUnit::Auto, utc()).unwrap();
        assert_eq!(instant.timestamp_millis(), millis);
    }

    #[test]
    fn test_explicit_unit_overrides_detection() {
        let instant = parse_instant("1700000000", TimestampUnit::Millis, utc()).unwrap();
        assert_eq!(instant.timestamp(), 1_700_000);
    }

    #[test]
    fn test_textual_forms() {
        let expected = 1_700_000_000;
        for input in [
            "2023-11-14T22:13:20Z",
            "2023-11-15T06:13:20+08:00",
            "Tue, 14 Nov 2023 22:13:20 +0000",
        ] {
            let instant = parse_instant(input, TimestampUnit::Auto, beijing()).unwrap();
            assert_eq!(instant.timestamp(), expected, "{}", input);
        }

        // Zone-less forms read in the configured offset
        let sql = parse_instant("2023-11-15 06:13:20", TimestampUnit::Auto, beijing()).unwrap();
        assert_eq!(sql.timestamp(), expected);

        let date = parse_instant("2024-01-01", TimestampUnit::Auto, utc()).unwrap();
        assert_eq!(date.timestamp(), 1_704_067_200);
    }

    #[test]
    fn test_rejects_garbage() {
        for input in ["", "yesterday", "2024-13-01", "12:00"] {
            assert!(
                matches!(
                    parse_instant(input, TimestampUnit::Auto, utc()),
                    Err(ConvertError::InvalidTimestamp { .. })
                ),
                "{}",
                input
            );
        }
    }

    #[test]
    fn test_out_of_range_instants_are_rejected() {
        for (input, unit) in [
            ("253402300800", TimestampUnit::Seconds),
            ("0000-01-01T00:00:00+08:00", TimestampUnit::Auto),
        ] {
            match parse_instant(input, unit, utc()) {
                Err(ConvertError::InvalidTimestamp { reason, .. }) => {
                    assert_eq!(reason, "instant out of range", "{}", input)
                }
                other => panic!("{} parsed as {:?}", input, other),
            }
        }

        let last = parse_instant("253402300799", TimestampUnit::Seconds, utc()).unwrap();
        assert_eq!(last.year(), 9999);
    }

    #[test]
    fn test_report_at_year_edges_does_not_panic() {
        let start = NaiveDate::from_ymd_opt(0, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();
        let report = convert_at(start, offset_from_minutes(-60), start);
        assert!(report.rfc2822.contains("31 Dec"), "{}", report.rfc2822);
        assert!(report.rfc2822.ends_with("23:00:00 -0100"), "{}", report.rfc2822);

        let end = DateTime::from_timestamp(253_402_300_799, 0).unwrap();
        let report = convert_at(end, beijing(), end);
        assert!(report.rfc2822.contains("01 Jan"), "{}", report.rfc2822);
    }

    #[test]
    fn test_report_fields() {
        let instant = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let now = DateTime::from_timestamp(1_700_000_000 + 3 * 86_400, 0).unwrap();
        let report = convert_at(instant, beijing(), now);

        assert_eq!(report.unix_seconds, 1_700_000_000);
        assert_eq!(report.unix_millis, 1_700_000_000_000);
        assert_eq!(report.iso_utc, "2023-11-14T22:13:20Z");
        assert_eq!(report.rfc3339, "2023-11-15T06:13:20+08:00");
        assert_eq!(report.rfc2822, "Wed, 15 Nov 2023 06:13:20 +0800");
        assert_eq!(report.sql, "2023-11-15 06:13:20");
        assert_eq!(report.weekday, "Wednesday");
        assert_eq!(report.day_of_year, 319);
        assert_eq!(report.relative, "3 days ago");
    }

    #[rstest]
    #[case(10, "just now")]
    #[case(-10, "just now")]
    #[case(60, "1 minute ago")]
    #[case(-7_200, "in 2 hours")]
    #[case(86_400 * 45, "1 month ago")]
    #[case(86_400 * 800, "2 years ago")]
    fn test_relative_descriptions(#[case] seconds_ago: i64, #[case] expected: &str) {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let instant = DateTime::from_timestamp(1_700_000_000 - seconds_ago, 0).unwrap();
        assert_eq!(relative(instant, now), expected);
    }

    #[test]
    fn test_unit_names() {
        assert_eq!("ms".parse::<TimestampUnit>().unwrap(), TimestampUnit::Millis);
        assert_eq!("Seconds".parse::<TimestampUnit>().unwrap(), TimestampUnit::Seconds);
        assert!("fortnights".parse::<TimestampUnit>().is_err());
    }
}

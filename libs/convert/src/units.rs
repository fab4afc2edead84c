//! Data size and CSS length conversions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConvertError;

/// A converted value tagged with its unit symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitValue {
    pub unit: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataUnit {
    Bit,
    Byte,
    Kilobyte,
    Megabyte,
    Gigabyte,
    Terabyte,
    Kibibyte,
    Mebibyte,
    Gibibyte,
    Tebibyte,
}

impl DataUnit {
    pub const ALL: [DataUnit; 10] = [
        DataUnit::Bit,
        DataUnit::Byte,
        DataUnit::Kilobyte,
        DataUnit::Megabyte,
        DataUnit::Gigabyte,
        DataUnit::Terabyte,
        DataUnit::Kibibyte,
        DataUnit::Mebibyte,
        DataUnit::Gibibyte,
        DataUnit::Tebibyte,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            DataUnit::Bit => "bit",
            DataUnit::Byte => "B",
            DataUnit::Kilobyte => "KB",
            DataUnit::Megabyte => "MB",
            DataUnit::Gigabyte => "GB",
            DataUnit::Terabyte => "TB",
            DataUnit::Kibibyte => "KiB",
            DataUnit::Mebibyte => "MiB",
            DataUnit::Gibibyte => "GiB",
            DataUnit::Tebibyte => "TiB",
        }
    }

    /// Size of one unit in bits.
    pub fn bits(self) -> f64 {
        const KB: f64 = 1_000.0;
        const KIB: f64 = 1_024.0;
        match self {
            DataUnit::Bit => 1.0,
            DataUnit::Byte => 8.0,
            DataUnit::Kilobyte => 8.0 * KB,
            DataUnit::Megabyte => 8.0 * KB * KB,
            DataUnit::Gigabyte => 8.0 * KB * KB * KB,
            DataUnit::Terabyte => 8.0 * KB * KB * KB * KB,
            DataUnit::Kibibyte => 8.0 * KIB,
            DataUnit::Mebibyte => 8.0 * KIB * KIB,
            DataUnit::Gibibyte => 8.0 * KIB * KIB * KIB,
            DataUnit::Tebibyte => 8.0 * KIB * KIB * KIB * KIB,
        }
    }

    pub fn convert(self, value: f64, to: DataUnit) -> f64 {
        value * self.bits() / to.bits()
    }
}

impl fmt::Display for DataUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for DataUnit {
    type Err = ConvertError;

    /// `b` is a bit and `B` a byte; every other name is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "b" => return Ok(DataUnit::Bit),
            "B" => return Ok(DataUnit::Byte),
            _ => {}
        }
        match s.to_ascii_lowercase().as_str() {
            "bit" | "bits" => Ok(DataUnit::Bit),
            "byte" | "bytes" => Ok(DataUnit::Byte),
            "kb" | "k" => Ok(DataUnit::Kilobyte),
            "mb" | "m" => Ok(DataUnit::Megabyte),
            "gb" | "g" => Ok(DataUnit::Gigabyte),
            "tb" | "t" => Ok(DataUnit::Terabyte),
            "kib" => Ok(DataUnit::Kibibyte),
            "mib" => Ok(DataUnit::Mebibyte),
            "gib" => Ok(DataUnit::Gibibyte),
            "tib" => Ok(DataUnit::Tebibyte),
            _ => Err(ConvertError::UnknownUnit {
                kind: "data unit",
                name: s.to_string(),
            }),
        }
    }
}

/// `value` expressed in every data unit.
pub fn convert_size(value: f64, from: DataUnit) -> Vec<UnitValue> {
    DataUnit::ALL
        .iter()
        .map(|to| UnitValue {
            unit: to.symbol(),
            value: round(from.convert(value, *to), 6),
        })
        .collect()
}

/// Splits `"1.5GiB"` or `"20 MB"` into a value and unit.
pub fn parse_size(text: &str) -> Result<(f64, DataUnit), ConvertError> {
    let (value, unit) = split_quantity(text)?;
    let unit = if unit.is_empty() { "B" } else { unit };
    Ok((value, unit.parse()?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CssUnit {
    Px,
    Rem,
    Em,
    Pt,
    Pc,
    In,
    Cm,
    Mm,
    Vw,
    Vh,
}

/// Reference sizes that relative CSS units resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CssContext {
    pub root_font_px: f64,
    pub parent_font_px: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for CssContext {
    fn default() -> Self {
        Self {
            root_font_px: 16.0,
            parent_font_px: 16.0,
            viewport_width: 1920.0,
            viewport_height: 1080.0,
        }
    }
}

impl CssUnit {
    pub const ALL: [CssUnit; 10] = [
        CssUnit::Px,
        CssUnit::Rem,
        CssUnit::Em,
        CssUnit::Pt,
        CssUnit::Pc,
        CssUnit::In,
        CssUnit::Cm,
        CssUnit::Mm,
        CssUnit::Vw,
        CssUnit::Vh,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            CssUnit::Px => "px",
            CssUnit::Rem => "rem",
            CssUnit::Em => "em",
            CssUnit::Pt => "pt",
            CssUnit::Pc => "pc",
            CssUnit::In => "in",
            CssUnit::Cm => "cm",
            CssUnit::Mm => "mm",
            CssUnit::Vw => "vw",
            CssUnit::Vh => "vh",
        }
    }

    /// Pixels in one unit under `ctx`.
    pub fn px(self, ctx: &CssContext) -> f64 {
        match self {
            CssUnit::Px => 1.0,
            CssUnit::Rem => ctx.root_font_px,
            CssUnit::Em => ctx.parent_font_px,
            CssUnit::Pt => 96.0 / 72.0,
            CssUnit::Pc => 16.0,
            CssUnit::In => 96.0,
            CssUnit::Cm => 96.0 / 2.54,
            CssUnit::Mm => 96.0 / 25.4,
            CssUnit::Vw => ctx.viewport_width / 100.0,
            CssUnit::Vh => ctx.viewport_height / 100.0,
        }
    }

    /// Converts `value` of this unit to `to`; `None` when `to` resolves to
    /// zero pixels under `ctx`.
    pub fn convert(self, value: f64, to: CssUnit, ctx: &CssContext) -> Option<f64> {
        let target = to.px(ctx);
        (target != 0.0).then(|| value * self.px(ctx) / target)
    }
}

impl fmt::Display for CssUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for CssUnit {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CssUnit::ALL
            .into_iter()
            .find(|u| u.symbol().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConvertError::UnknownUnit {
                kind: "CSS unit",
                name: s.to_string(),
            })
    }
}

/// `value` expressed in every CSS unit that resolves under `ctx`.
pub fn convert_css(value: f64, from: CssUnit, ctx: &CssContext) -> Vec<UnitValue> {
    CssUnit::ALL
        .iter()
        .filter_map(|to| {
            from.convert(value, *to, ctx).map(|v| UnitValue {
                unit: to.symbol(),
                value: round(v, 4),
            })
        })
        .collect()
}

/// Splits `"1.5rem"` into a value and unit; a bare number is pixels.
pub fn parse_length(text: &str) -> Result<(f64, CssUnit), ConvertError> {
    let (value, unit) = split_quantity(text)?;
    let unit = if unit.is_empty() { "px" } else { unit };
    Ok((value, unit.parse()?))
}

fn split_quantity(text: &str) -> Result<(f64, &str), ConvertError> {
    let text = text.trim();
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(split);
    let value = number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConvertError::InvalidNumber(text.to_string()))?;
    Ok((value, unit.trim()))
}

fn round(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn find(values: &[UnitValue], unit: &str) -> f64 {
        values
            .iter()
            .find(|v| v.unit == unit)
            .map(|v| v.value)
            .unwrap()
    }

    #[test]
    fn test_decimal_and_binary_sizes() {
        let out = convert_size(1.0, DataUnit::Gibibyte);
        assert_eq!(find(&out, "MiB"), 1024.0);
        assert_eq!(find(&out, "B"), 1_073_741_824.0);
        assert_eq!(find(&out, "MB"), 1073.741824);
        assert_eq!(find(&out, "bit"), 8_589_934_592.0);

        assert_eq!(DataUnit::Kilobyte.convert(1.0, DataUnit::Byte), 1000.0);
        assert_eq!(DataUnit::Kibibyte.convert(1.0, DataUnit::Byte), 1024.0);
    }

    #[rstest]
    #[case("b", DataUnit::Bit)]
    #[case("B", DataUnit::Byte)]
    #[case("kb", DataUnit::Kilobyte)]
    #[case("MiB", DataUnit::Mebibyte)]
    #[case("bytes", DataUnit::Byte)]
    fn test_data_unit_names(#[case] name: &str, #[case] unit: DataUnit) {
        assert_eq!(name.parse::<DataUnit>().unwrap(), unit);
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1.5GiB").unwrap(), (1.5, DataUnit::Gibibyte));
        assert_eq!(parse_size("20 MB").unwrap(), (20.0, DataUnit::Megabyte));
        assert_eq!(parse_size("512").unwrap(), (512.0, DataUnit::Byte));
        assert!(matches!(parse_size("lots"), Err(ConvertError::InvalidNumber(_))));
        assert!(matches!(parse_size("3 parsecs"), Err(ConvertError::UnknownUnit { .. })));
    }

    #[test]
    fn test_css_lengths_under_default_context() {
        let ctx = CssContext::default();
        let out = convert_css(24.0, CssUnit::Px, &ctx);
        assert_eq!(find(&out, "rem"), 1.5);
        assert_eq!(find(&out, "pt"), 18.0);
        assert_eq!(find(&out, "in"), 0.25);
        assert_eq!(find(&out, "vw"), 1.25);
        assert_eq!(find(&out, "mm"), 6.35);
    }

    #[test]
    fn test_css_context_changes_relative_units() {
        let ctx = CssContext {
            root_font_px: 10.0,
            parent_font_px: 20.0,
            ..Default::default()
        };
        assert_eq!(CssUnit::Rem.convert(2.0, CssUnit::Px, &ctx), Some(20.0));
        assert_eq!(CssUnit::Em.convert(2.0, CssUnit::Rem, &ctx), Some(4.0));
    }

    #[test]
    fn test_zero_viewport_skips_viewport_units() {
        let ctx = CssContext {
            viewport_width: 0.0,
            ..Default::default()
        };
        let out = convert_css(10.0, CssUnit::Px, &ctx);
        assert!(out.iter().all(|v| v.unit != "vw"));
        assert!(out.iter().any(|v| v.unit == "vh"));
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length("1.5rem").unwrap(), (1.5, CssUnit::Rem));
        assert_eq!(parse_length("12").unwrap(), (12.0, CssUnit::Px));
        assert_eq!(parse_length("-2.54CM").unwrap(), (-2.54, CssUnit::Cm));
    }
}

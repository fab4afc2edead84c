//! Color parsing and conversion between RGB, HSL, HSV and CMYK.
//!
//! Channel values are stored as integers: RGB in `0..=255`, hue in degrees
//! `0..360`, and saturation, lightness, value and CMYK components as whole
//! percentages. Conversions go through `f64` and round once at the end.

use std::fmt;

use serde::Serialize;

use crate::ConvertError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `0.0..=1.0`.
    pub alpha: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hsv {
    pub h: u16,
    pub s: u8,
    pub v: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cmyk {
    pub c: u8,
    pub m: u8,
    pub y: u8,
    pub k: u8,
}

/// Notation a color was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    Hex,
    Rgb,
    Hsl,
    Hsv,
    Cmyk,
    Named,
}

/// A parsed color and the notation it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub rgb: Rgb,
    pub format: ColorFormat,
}

/// Every notation of one color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorReport {
    pub input_format: ColorFormat,
    pub hex: String,
    pub rgb: String,
    pub hsl: String,
    pub hsv: String,
    pub cmyk: String,
    pub alpha: f32,
}

const NAMED: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("lime", [0, 255, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("orange", [255, 165, 0]),
    ("purple", [128, 0, 128]),
];

impl Color {
    /// Parses `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()`,
    /// `hsl()`/`hsla()`, `hsv()`, `cmyk()` and a handful of CSS names.
    pub fn parse(text: &str) -> Result<Self, ConvertError> {
        let s = text.trim().to_ascii_lowercase();
        let invalid = || ConvertError::InvalidColor(text.trim().to_string());

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex)
                .map(|rgb| Color::new(rgb, ColorFormat::Hex))
                .ok_or_else(invalid);
        }
        if let Some((_, [r, g, b])) = NAMED.iter().find(|(name, _)| *name == s) {
            return Ok(Color::new(Rgb::new(*r, *g, *b), ColorFormat::Named));
        }

        let parsed = split_function(&s).and_then(|(name, args)| match name {
            "rgb" | "rgba" => parse_rgb_args(&args).map(|rgb| (rgb, ColorFormat::Rgb)),
            "hsl" | "hsla" => parse_hsl_args(&args).map(|rgb| (rgb, ColorFormat::Hsl)),
            "hsv" | "hsb" => parse_hsv_args(&args).map(|rgb| (rgb, ColorFormat::Hsv)),
            "cmyk" => parse_cmyk_args(&args).map(|rgb| (rgb, ColorFormat::Cmyk)),
            _ => None,
        });
        // Bare hex digits without '#'
        let parsed = parsed.or_else(|| parse_hex(&s).map(|rgb| (rgb, ColorFormat::Hex)));

        parsed
            .map(|(rgb, format)| Color::new(rgb, format))
            .ok_or_else(invalid)
    }

    fn new(rgb: Rgb, format: ColorFormat) -> Self {
        Self { rgb, format }
    }

    pub fn report(&self) -> ColorReport {
        let rgb = self.rgb;
        ColorReport {
            input_format: self.format,
            hex: rgb.to_hex(),
            rgb: rgb.to_string(),
            hsl: rgb.to_hsl().to_string(),
            hsv: rgb.to_hsv().to_string(),
            cmyk: rgb.to_cmyk().to_string(),
            alpha: rgb.alpha,
        }
    }
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: (alpha.clamp(0.0, 1.0) * 100.0).round() / 100.0,
            ..self
        }
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.alpha < 1.0 {
            let a = (self.alpha * 255.0).round() as u8;
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, a)
        } else {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        }
    }

    fn unit(&self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }

    fn hue(&self) -> f64 {
        let (r, g, b) = self.unit();
        let max = r.max(g).max(b);
        let d = max - r.min(g).min(b);
        if d == 0.0 {
            return 0.0;
        }
        let h = if max == r {
            ((g - b) / d).rem_euclid(6.0)
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        h * 60.0
    }

    pub fn to_hsl(&self) -> Hsl {
        let (r, g, b) = self.unit();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let d = max - min;
        let s = if d == 0.0 {
            0.0
        } else {
            d / (1.0 - (2.0 * l - 1.0).abs())
        };
        Hsl {
            h: degrees(self.hue()),
            s: percent(s),
            l: percent(l),
        }
    }

    pub fn to_hsv(&self) -> Hsv {
        let (r, g, b) = self.unit();
        let max = r.max(g).max(b);
        let d = max - r.min(g).min(b);
        let s = if max == 0.0 { 0.0 } else { d / max };
        Hsv {
            h: degrees(self.hue()),
            s: percent(s),
            v: percent(max),
        }
    }

    pub fn to_cmyk(&self) -> Cmyk {
        let (r, g, b) = self.unit();
        let k = 1.0 - r.max(g).max(b);
        if k >= 1.0 {
            return Cmyk {
                c: 0,
                m: 0,
                y: 0,
                k: 100,
            };
        }
        let channel = |v: f64| percent((1.0 - v - k) / (1.0 - k));
        Cmyk {
            c: channel(r),
            m: channel(g),
            y: channel(b),
            k: percent(k),
        }
    }
}

impl Hsl {
    pub fn to_rgb(&self) -> Rgb {
        hsl_to_rgb(
            f64::from(self.h),
            f64::from(self.s) / 100.0,
            f64::from(self.l) / 100.0,
        )
    }
}

impl Hsv {
    pub fn to_rgb(&self) -> Rgb {
        hsv_to_rgb(
            f64::from(self.h),
            f64::from(self.s) / 100.0,
            f64::from(self.v) / 100.0,
        )
    }
}

impl Cmyk {
    pub fn to_rgb(&self) -> Rgb {
        cmyk_to_rgb([self.c, self.m, self.y, self.k].map(|v| f64::from(v) / 100.0))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alpha < 1.0 {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.alpha)
        } else {
            write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
        }
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }
}

impl fmt::Display for Hsv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsv({}, {}%, {}%)", self.h, self.s, self.v)
    }
}

impl fmt::Display for Cmyk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cmyk({}%, {}%, {}%, {}%)", self.c, self.m, self.y, self.k)
    }
}

fn degrees(h: f64) -> u16 {
    (h.round() as u16) % 360
}

fn percent(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 100.0).round() as u8
}

fn byte(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn from_chroma(h: f64, c: f64, m: f64) -> Rgb {
    let hp = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (hp.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match hp as u8 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    Rgb::new(byte(r + m), byte(g + m), byte(b + m))
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    from_chroma(h, c, l - c / 2.0)
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let c = v * s;
    from_chroma(h, c, v - c)
}

fn cmyk_to_rgb([c, m, y, k]: [f64; 4]) -> Rgb {
    Rgb::new(
        byte((1.0 - c) * (1.0 - k)),
        byte((1.0 - m) * (1.0 - k)),
        byte((1.0 - y) * (1.0 - k)),
    )
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match hex.len() {
        3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => hex.to_string(),
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    let rgb = Rgb::new(channel(0)?, channel(2)?, channel(4)?);
    match expanded.len() {
        8 => Some(rgb.with_alpha(f32::from(channel(6)?) / 255.0)),
        _ => Some(rgb),
    }
}

fn split_function(s: &str) -> Option<(&str, Vec<&str>)> {
    let open = s.find('(')?;
    let inner = s[open + 1..].strip_suffix(')')?;
    let args = inner
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|a| !a.is_empty())
        .collect();
    Some((s[..open].trim(), args))
}

/// A plain number, or a percentage scaled to `scale`.
fn number(arg: &str, scale: f64) -> Option<f64> {
    match arg.strip_suffix('%') {
        Some(pct) => pct.parse::<f64>().ok().map(|v| v / 100.0 * scale),
        None => arg.parse::<f64>().ok(),
    }
    .filter(|v| v.is_finite())
}

fn unit_percent(arg: &str) -> Option<f64> {
    let v = arg.strip_suffix('%').unwrap_or(arg).parse::<f64>().ok()?;
    (0.0..=100.0).contains(&v).then_some(v / 100.0)
}

fn hue(arg: &str) -> Option<f64> {
    arg.strip_suffix("deg")
        .unwrap_or(arg)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn alpha(args: &[&str], index: usize) -> Option<f32> {
    match args.get(index) {
        None => Some(1.0),
        Some(arg) => number(arg, 1.0)
            .filter(|v| (0.0..=1.0).contains(v))
            .map(|v| v as f32),
    }
}

fn parse_rgb_args(args: &[&str]) -> Option<Rgb> {
    if !(3..=4).contains(&args.len()) {
        return None;
    }
    let channel = |arg: &str| {
        number(arg, 255.0)
            .filter(|v| (0.0..=255.0).contains(v))
            .map(|v| v.round() as u8)
    };
    let rgb = Rgb::new(channel(args[0])?, channel(args[1])?, channel(args[2])?);
    Some(rgb.with_alpha(alpha(args, 3)?))
}

fn parse_hsl_args(args: &[&str]) -> Option<Rgb> {
    if !(3..=4).contains(&args.len()) {
        return None;
    }
    let rgb = hsl_to_rgb(hue(args[0])?, unit_percent(args[1])?, unit_percent(args[2])?);
    Some(rgb.with_alpha(alpha(args, 3)?))
}

fn parse_hsv_args(args: &[&str]) -> Option<Rgb> {
    if args.len() != 3 {
        return None;
    }
    Some(hsv_to_rgb(
        hue(args[0])?,
        unit_percent(args[1])?,
        unit_percent(args[2])?,
    ))
}

fn parse_cmyk_args(args: &[&str]) -> Option<Rgb> {
    if args.len() != 4 {
        return None;
    }
    Some(cmyk_to_rgb([
        unit_percent(args[0])?,
        unit_percent(args[1])?,
        unit_percent(args[2])?,
        unit_percent(args[3])?,
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_red_reference_values() {
        let red = Color::parse("#ff0000").unwrap();
        assert_eq!(red.format, ColorFormat::Hex);
        assert_eq!(red.rgb.to_hsl().to_string(), "hsl(0, 100%, 50%)");
        assert_eq!(red.rgb.to_hsv().to_string(), "hsv(0, 100%, 100%)");
        assert_eq!(red.rgb.to_cmyk().to_string(), "cmyk(0%, 100%, 100%, 0%)");
    }

    #[test]
    fn test_report_for_steel_blue() {
        let report = Color::parse("#336699").unwrap().report();
        assert_eq!(report.hex, "#336699");
        assert_eq!(report.rgb, "rgb(51, 102, 153)");
        assert_eq!(report.hsl, "hsl(210, 50%, 40%)");
        assert_eq!(report.hsv, "hsv(210, 67%, 60%)");
        assert_eq!(report.cmyk, "cmyk(67%, 33%, 0%, 40%)");
    }

    #[rstest]
    #[case("#f00", ColorFormat::Hex)]
    #[case("FF0000", ColorFormat::Hex)]
    #[case("rgb(255, 0, 0)", ColorFormat::Rgb)]
    #[case("rgb(100% 0% 0%)", ColorFormat::Rgb)]
    #[case("hsl(0, 100%, 50%)", ColorFormat::Hsl)]
    #[case("hsl(360deg 100% 50%)", ColorFormat::Hsl)]
    #[case("hsv(0, 100%, 100%)", ColorFormat::Hsv)]
    #[case("cmyk(0%, 100%, 100%, 0%)", ColorFormat::Cmyk)]
    #[case("Red", ColorFormat::Named)]
    fn test_notations_of_red(#[case] input: &str, #[case] format: ColorFormat) {
        let color = Color::parse(input).unwrap();
        assert_eq!(color.rgb, Rgb::new(255, 0, 0), "{}", input);
        assert_eq!(color.format, format);
    }

    #[test]
    fn test_alpha_forms() {
        let c = Color::parse("rgba(0, 0, 0, 0.5)").unwrap();
        assert_eq!(c.rgb.alpha, 0.5);
        assert_eq!(c.rgb.to_string(), "rgba(0, 0, 0, 0.5)");
        assert_eq!(c.rgb.to_hex(), "#00000080");

        let c = Color::parse("#00000080").unwrap();
        assert_eq!(c.rgb.alpha, 0.5);

        let c = Color::parse("hsla(120, 100%, 25%, 25%)").unwrap();
        assert_eq!(c.rgb.alpha, 0.25);
        assert_eq!((c.rgb.r, c.rgb.g, c.rgb.b), (0, 128, 0));
    }

    #[rstest]
    #[case("")]
    #[case("#12")]
    #[case("#ggg")]
    #[case("rgb(256, 0, 0)")]
    #[case("rgb(1, 2)")]
    #[case("hsl(0, 120%, 50%)")]
    #[case("cmyk(0, 0, 0)")]
    #[case("rgba(0, 0, 0, 2)")]
    #[case("lab(50 0 0)")]
    fn test_rejects_malformed(#[case] input: &str) {
        assert!(matches!(
            Color::parse(input),
            Err(ConvertError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_model_round_trips_stay_close() {
        for hex in ["#336699", "#ff8800", "#123456", "#fafafa", "#000000"] {
            let rgb = Color::parse(hex).unwrap().rgb;
            for back in [rgb.to_hsl().to_rgb(), rgb.to_hsv().to_rgb(), rgb.to_cmyk().to_rgb()] {
                for (a, b) in [(rgb.r, back.r), (rgb.g, back.g), (rgb.b, back.b)] {
                    assert!(a.abs_diff(b) <= 3, "{} drifted to {}", hex, back.to_hex());
                }
            }
        }
    }

    #[test]
    fn test_black_cmyk() {
        assert_eq!(
            Rgb::new(0, 0, 0).to_cmyk(),
            Cmyk {
                c: 0,
                m: 0,
                y: 0,
                k: 100
            }
        );
    }
}

//! Regex testing, replacement and a library of common patterns.

use std::fmt;
use std::str::FromStr;

use ::regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::ConvertError;

/// Matches beyond this many are counted but not reported.
pub const MAX_MATCHES: usize = 1_000;

const SIZE_LIMIT: usize = 1 << 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegexFlags {
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
    pub ignore_whitespace: bool,
}

impl RegexFlags {
    /// Parses flag letters in the style of `/pattern/imsx`.
    pub fn from_letters(letters: &str) -> Result<Self, ConvertError> {
        let mut flags = RegexFlags::default();
        for c in letters.chars() {
            match c {
                'i' => flags.case_insensitive = true,
                'm' => flags.multi_line = true,
                's' => flags.dot_matches_new_line = true,
                'x' => flags.ignore_whitespace = true,
                'g' => {}
                other => {
                    return Err(ConvertError::InvalidRegex(format!("unknown flag '{}'", other)))
                }
            }
        }
        Ok(flags)
    }

    pub fn compile(&self, pattern: &str) -> Result<Regex, ConvertError> {
        RegexBuilder::new(pattern)
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_matches_new_line)
            .ignore_whitespace(self.ignore_whitespace)
            .size_limit(SIZE_LIMIT)
            .build()
            .map_err(|e| ConvertError::InvalidRegex(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegexMatch {
    /// Byte offsets into the tested text.
    pub start: usize,
    pub end: usize,
    pub text: String,
    /// Capture groups 1.., `None` where a group did not participate.
    pub groups: Vec<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub is_match: bool,
    pub count: usize,
    pub truncated: bool,
    pub group_names: Vec<Option<String>>,
    pub matches: Vec<RegexMatch>,
}

/// Finds every match of `pattern` in `text`.
pub fn test(pattern: &str, flags: RegexFlags, text: &str) -> Result<MatchReport, ConvertError> {
    let re = flags.compile(pattern)?;

    let mut matches = Vec::new();
    let mut count = 0;
    for caps in re.captures_iter(text) {
        count += 1;
        if matches.len() == MAX_MATCHES {
            continue;
        }
        let Some(whole) = caps.get(0) else {
            continue;
        };
        matches.push(RegexMatch {
            start: whole.start(),
            end: whole.end(),
            text: whole.as_str().to_string(),
            groups: caps
                .iter()
                .skip(1)
                .map(|g| g.map(|m| m.as_str().to_string()))
                .collect(),
        });
    }

    Ok(MatchReport {
        is_match: count > 0,
        count,
        truncated: count > matches.len(),
        group_names: re
            .capture_names()
            .skip(1)
            .map(|n| n.map(str::to_string))
            .collect(),
        matches,
    })
}

/// Replaces every match; `$1` and `${name}` refer to capture groups.
pub fn replace(
    pattern: &str,
    flags: RegexFlags,
    text: &str,
    replacement: &str,
) -> Result<String, ConvertError> {
    let re = flags.compile(pattern)?;
    Ok(re.replace_all(text, replacement).into_owned())
}

/// Ready-made patterns for common formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegexTemplate {
    Email,
    CnMobile,
    IdCard,
    Url,
    Ipv4,
    Date,
    HexColor,
    PostalCode,
    Chinese,
    Username,
    StrongPassword,
}

impl RegexTemplate {
    pub const ALL: [RegexTemplate; 11] = [
        RegexTemplate::Email,
        RegexTemplate::CnMobile,
        RegexTemplate::IdCard,
        RegexTemplate::Url,
        RegexTemplate::Ipv4,
        RegexTemplate::Date,
        RegexTemplate::HexColor,
        RegexTemplate::PostalCode,
        RegexTemplate::Chinese,
        RegexTemplate::Username,
        RegexTemplate::StrongPassword,
    ];

    pub fn all() -> &'static [RegexTemplate] {
        &Self::ALL
    }

    pub fn name(self) -> &'static str {
        match self {
            RegexTemplate::Email => "email",
            RegexTemplate::CnMobile => "cn-mobile",
            RegexTemplate::IdCard => "id-card",
            RegexTemplate::Url => "url",
            RegexTemplate::Ipv4 => "ipv4",
            RegexTemplate::Date => "date",
            RegexTemplate::HexColor => "hex-color",
            RegexTemplate::PostalCode => "postal-code",
            RegexTemplate::Chinese => "chinese",
            RegexTemplate::Username => "username",
            RegexTemplate::StrongPassword => "strong-password",
        }
    }

    pub fn pattern(self) -> &'static str {
        match self {
            RegexTemplate::Email => r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$",
            RegexTemplate::CnMobile => r"^1[3-9]\d{9}$",
            RegexTemplate::IdCard => {
                r"^[1-9]\d{5}(18|19|20)\d{2}(0[1-9]|1[0-2])(0[1-9]|[12]\d|3[01])\d{3}[0-9Xx]$"
            }
            RegexTemplate::Url => r"^https?://[A-Za-z0-9.-]+(:\d+)?(/[^\s]*)?$",
            RegexTemplate::Ipv4 => {
                r"^((25[0-5]|2[0-4]\d|1\d{2}|[1-9]?\d)\.){3}(25[0-5]|2[0-4]\d|1\d{2}|[1-9]?\d)$"
            }
            RegexTemplate::Date => r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$",
            RegexTemplate::HexColor => r"^#([0-9A-Fa-f]{3}|[0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})$",
            RegexTemplate::PostalCode => r"^[1-9]\d{5}$",
            RegexTemplate::Chinese => r"^\p{Han}+$",
            RegexTemplate::Username => r"^[A-Za-z][A-Za-z0-9_]{3,15}$",
            // Class mix cannot be asserted without look-around; length and
            // alphabet only
            RegexTemplate::StrongPassword => r"^[A-Za-z0-9!@#$%^&*()_+=\[\]{};:,.<>?/-]{8,64}$",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RegexTemplate::Email => "Email address",
            RegexTemplate::CnMobile => "Mainland China mobile number",
            RegexTemplate::IdCard => "18-digit national ID number",
            RegexTemplate::Url => "HTTP or HTTPS URL",
            RegexTemplate::Ipv4 => "IPv4 address",
            RegexTemplate::Date => "Date as YYYY-MM-DD",
            RegexTemplate::HexColor => "Hex color (#rgb, #rrggbb, #rrggbbaa)",
            RegexTemplate::PostalCode => "Mainland China postal code",
            RegexTemplate::Chinese => "Chinese characters only",
            RegexTemplate::Username => "Letter first, then 3-15 letters, digits or underscores",
            RegexTemplate::StrongPassword => "8-64 letters, digits and symbols",
        }
    }

    /// A string the pattern accepts.
    pub fn example(self) -> &'static str {
        match self {
            RegexTemplate::Email => "dev@example.com",
            RegexTemplate::CnMobile => "13812345678",
            RegexTemplate::IdCard => "110101199001010015",
            RegexTemplate::Url => "https://example.com:8080/path?q=1",
            RegexTemplate::Ipv4 => "192.168.0.1",
            RegexTemplate::Date => "2024-02-29",
            RegexTemplate::HexColor => "#1e90ff",
            RegexTemplate::PostalCode => "100101",
            RegexTemplate::Chinese => "开发工具",
            RegexTemplate::Username => "dev_box",
            RegexTemplate::StrongPassword => "S3cure!Pass",
        }
    }
}

impl fmt::Display for RegexTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RegexTemplate {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        RegexTemplate::ALL
            .into_iter()
            .find(|t| t.name() == normalized)
            .ok_or_else(|| ConvertError::UnknownUnit {
                kind: "regex template",
                name: s.to_string(),
            })
    }
}

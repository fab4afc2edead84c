//! Reversible text encodings.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::CodecError;

/// Supported text encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    /// Standard Base64 with padding.
    Base64,
    /// URL-safe Base64 without padding.
    Base64Url,
    /// Lower-case hexadecimal of the UTF-8 bytes.
    Hex,
    /// Form URL encoding (space as `+`).
    Url,
    /// `\uXXXX` escapes for every non-ASCII UTF-16 unit.
    Unicode,
    /// HTML entity escaping.
    Html,
}

impl Encoding {
    pub const ALL: [Encoding; 6] = [
        Encoding::Base64,
        Encoding::Base64Url,
        Encoding::Hex,
        Encoding::Url,
        Encoding::Unicode,
        Encoding::Html,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::Base64 => "base64",
            Encoding::Base64Url => "base64-url",
            Encoding::Hex => "hex",
            Encoding::Url => "url",
            Encoding::Unicode => "unicode",
            Encoding::Html => "html",
        }
    }

    pub fn encode(self, input: &str) -> String {
        match self {
            Encoding::Base64 => STANDARD.encode(input),
            Encoding::Base64Url => URL_SAFE_NO_PAD.encode(input),
            Encoding::Hex => hex::encode(input),
            Encoding::Url => urlencoding::encode(input).replace("%20", "+"),
            Encoding::Unicode => unicode_escape(input),
            Encoding::Html => html_escape(input),
        }
    }

    pub fn decode(self, input: &str) -> Result<String, CodecError> {
        let trimmed = input.trim();
        match self {
            Encoding::Base64 => {
                let compact: String = trimmed.split_whitespace().collect();
                let bytes = STANDARD
                    .decode(&compact)
                    .or_else(|_| STANDARD_NO_PAD.decode(&compact))
                    .map_err(|e| CodecError::input(self.as_str(), e))?;
                utf8(bytes)
            }
            Encoding::Base64Url => {
                let bytes = URL_SAFE_NO_PAD
                    .decode(trimmed)
                    .or_else(|_| URL_SAFE.decode(trimmed))
                    .map_err(|e| CodecError::input(self.as_str(), e))?;
                utf8(bytes)
            }
            Encoding::Hex => {
                let compact: String = trimmed.split_whitespace().collect();
                let digits = compact
                    .strip_prefix("0x")
                    .or_else(|| compact.strip_prefix("0X"))
                    .unwrap_or(&compact);
                let bytes = hex::decode(digits).map_err(|e| CodecError::input(self.as_str(), e))?;
                utf8(bytes)
            }
            Encoding::Url => {
                let normalized = input.replace('+', " ");
                urlencoding::decode(&normalized)
                    .map(|cow| cow.into_owned())
                    .map_err(|_| CodecError::InvalidUtf8)
            }
            Encoding::Unicode => unicode_unescape(input),
            Encoding::Html => Ok(html_unescape(input)),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "base64" | "b64" => Ok(Encoding::Base64),
            "base64-url" | "base64url" | "b64url" => Ok(Encoding::Base64Url),
            "hex" | "base16" => Ok(Encoding::Hex),
            "url" | "percent" => Ok(Encoding::Url),
            "unicode" | "escape" => Ok(Encoding::Unicode),
            "html" | "entity" => Ok(Encoding::Html),
            _ => Err(CodecError::Unknown {
                kind: "encoding",
                name: s.to_string(),
            }),
        }
    }
}

fn utf8(bytes: Vec<u8>) -> Result<String, CodecError> {
    String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)
}

fn unicode_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if c.is_ascii() {
            out.push(c);
            continue;
        }
        let mut units = [0u16; 2];
        for unit in c.encode_utf16(&mut units) {
            out.push_str(&format!("\\u{:04x}", unit));
        }
    }
    out
}

fn unicode_unescape(input: &str) -> Result<String, CodecError> {
    let mut units: Vec<u16> = Vec::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&'u') {
            chars.next();
            let hex: String = chars.by_ref().take(4).collect();
            let unit = (hex.len() == 4)
                .then(|| u16::from_str_radix(&hex, 16).ok())
                .flatten()
                .ok_or_else(|| {
                    CodecError::input("unicode", format!("bad escape '\\u{}'", hex))
                })?;
            units.push(unit);
        } else {
            let mut buf = [0u16; 2];
            units.extend_from_slice(c.encode_utf16(&mut buf));
        }
    }

    String::from_utf16(&units).map_err(|_| CodecError::input("unicode", "unpaired surrogate"))
}

fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Unknown or malformed entities are kept verbatim.
fn html_unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix(&['x', 'X'][..]) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "hello world",
        "a+b=c&d",
        "日本語 テキスト",
        "emoji 🦀!",
        "<a href=\"x\">'q'</a>",
    ];

    #[test]
    fn test_every_encoding_reverses() {
        for encoding in Encoding::ALL {
            for sample in SAMPLES {
                let encoded = encoding.encode(sample);
                assert_eq!(
                    encoding.decode(&encoded).unwrap(),
                    *sample,
                    "{} failed for {:?}",
                    encoding,
                    sample
                );
            }
        }
    }

    #[test]
    fn test_known_outputs() {
        assert_eq!(Encoding::Base64.encode("hello"), "aGVsbG8=");
        assert_eq!(Encoding::Base64Url.encode("??>"), "Pz8-");
        assert_eq!(Encoding::Hex.encode("Hi"), "4869");
        assert_eq!(Encoding::Url.encode("a b&c"), "a+b%26c");
        assert_eq!(Encoding::Unicode.encode("中a"), "\\u4e2da");
        assert_eq!(Encoding::Unicode.encode("🦀"), "\\ud83e\\udd80");
        assert_eq!(Encoding::Html.encode("<b>&"), "&lt;b&gt;&amp;");
    }

    #[test]
    fn test_lenient_decoding() {
        assert_eq!(Encoding::Base64.decode("aGVsbG8").unwrap(), "hello");
        assert_eq!(Encoding::Base64.decode("aGVs\nbG8=").unwrap(), "hello");
        assert_eq!(Encoding::Hex.decode("0x48 69").unwrap(), "Hi");
        assert_eq!(Encoding::Html.decode("&#20013;&#x6587; &copy;").unwrap(), "中文 &copy;");
        assert_eq!(Encoding::Html.decode("AT&T").unwrap(), "AT&T");
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            Encoding::Base64.decode("***"),
            Err(CodecError::InvalidInput { .. })
        ));
        assert_eq!(Encoding::Hex.decode("ff"), Err(CodecError::InvalidUtf8));
        assert!(Encoding::Unicode.decode("\\u12").is_err());
        assert!(Encoding::Unicode.decode("\\ud83e").is_err());
    }

    #[test]
    fn test_parse_encoding_name() {
        assert_eq!("BASE64".parse::<Encoding>().unwrap(), Encoding::Base64);
        assert_eq!("base64_url".parse::<Encoding>().unwrap(), Encoding::Base64Url);
        assert!(matches!(
            "rot13".parse::<Encoding>(),
            Err(CodecError::Unknown { .. })
        ));
    }
}

//! JSON formatting, minification and validation.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::ConvertError;

pub const MAX_INDENT: usize = 8;

/// A parse failure with its 1-based position.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[error("invalid JSON at line {line}, column {column}: {message}")]
pub struct JsonError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl From<serde_json::Error> for JsonError {
    fn from(err: serde_json::Error) -> Self {
        let full = err.to_string();
        // serde_json appends " at line X column Y" to the message
        let message = full
            .rsplit_once(" at line ")
            .map(|(msg, _)| msg.to_string())
            .unwrap_or(full);
        Self {
            line: err.line(),
            column: err.column(),
            message,
        }
    }
}

/// Shape of a valid document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonStats {
    pub root: &'static str,
    pub depth: usize,
    pub values: usize,
}

/// Pretty-prints `input` with `indent` spaces (clamped to `MAX_INDENT`,
/// zero minifies). Key order is kept unless `sort_keys` is set.
pub fn format(input: &str, indent: usize, sort_keys: bool) -> Result<String, ConvertError> {
    let mut value = parse(input)?;
    if sort_keys {
        value = sort_value(value);
    }
    if indent == 0 {
        return Ok(value.to_string());
    }

    let pad = " ".repeat(indent.min(MAX_INDENT));
    let mut out = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(pad.as_bytes()));
    value
        .serialize(&mut ser)
        .map_err(|e| ConvertError::Json(e.into()))?;
    String::from_utf8(out).map_err(|e| {
        ConvertError::Json(JsonError {
            line: 0,
            column: 0,
            message: e.to_string(),
        })
    })
}

/// Removes all insignificant whitespace.
pub fn minify(input: &str) -> Result<String, ConvertError> {
    Ok(parse(input)?.to_string())
}

/// Checks `input` and describes its shape.
pub fn validate(input: &str) -> Result<JsonStats, JsonError> {
    let value: Value = serde_json::from_str(input)?;
    Ok(JsonStats {
        root: kind(&value),
        depth: depth(&value),
        values: count(&value),
    })
}

/// Recursively orders object keys.
pub fn sort_value(value: Value) -> Value {
    match value {
        Value::Array(values) => Value::Array(values.into_iter().map(sort_value).collect()),
        Value::Object(entries) => {
            let mut pairs: Vec<_> = entries.into_iter().collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (key, value) in pairs {
                sorted.insert(key, sort_value(value));
            }
            Value::Object(sorted)
        }
        other => other,
    }
}

fn parse(input: &str) -> Result<Value, ConvertError> {
    serde_json::from_str(input).map_err(|e| ConvertError::Json(e.into()))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn depth(value: &Value) -> usize {
    match value {
        Value::Array(values) => 1 + values.iter().map(depth).max().unwrap_or(0),
        Value::Object(entries) => 1 + entries.values().map(depth).max().unwrap_or(0),
        _ => 0,
    }
}

fn count(value: &Value) -> usize {
    match value {
        Value::Array(values) => 1 + values.iter().map(count).sum::<usize>(),
        Value::Object(entries) => 1 + entries.values().map(count).sum::<usize>(),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{"b": [1, {"z": true, "a": null}], "a": "x"}"#;

    #[test]
    fn test_format_keeps_key_order() {
        let out = format(DOC, 2, false).unwrap();
        assert!(out.find("\"b\"").unwrap() < out.find("\"a\": \"x\"").unwrap());
        assert!(out.contains("\n  \"b\": [\n    1,"));
    }

    #[test]
    fn test_format_sorts_recursively() {
        let out = format(DOC, 0, true).unwrap();
        assert_eq!(out, r#"{"a":"x","b":[1,{"a":null,"z":true}]}"#);
    }

    #[test]
    fn test_indent_width() {
        let out = format(r#"{"k":1}"#, 4, false).unwrap();
        assert_eq!(out, "{\n    \"k\": 1\n}");
        let clamped = format(r#"{"k":1}"#, 40, false).unwrap();
        assert_eq!(clamped, format!("{{\n{}\"k\": 1\n}}", " ".repeat(MAX_INDENT)));
    }

    #[test]
    fn test_minify() {
        let out = minify("{\n  \"a\" : [ 1 , 2 ]\n}").unwrap();
        assert_eq!(out, r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_validate_reports_shape() {
        let stats = validate(DOC).unwrap();
        assert_eq!(
            stats,
            JsonStats {
                root: "object",
                depth: 3,
                values: 7,
            }
        );
        assert_eq!(validate("42").unwrap().root, "number");
    }

    #[test]
    fn test_validate_reports_position() {
        let err = validate("{\n  \"a\": 1,\n  \"b\" 2\n}").unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.column >= 6);
        assert_eq!(err.message, "expected `:`");
    }

    #[test]
    fn test_format_error_is_json_variant() {
        assert!(matches!(format("[1,", 2, false), Err(ConvertError::Json(_))));
    }
}

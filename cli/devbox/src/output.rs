//! Output formatting for CLI commands.

use clap::ValueEnum;
use colored::Colorize;
use devbox_convert::json::sort_value;
use serde::{Deserialize, Serialize};
use tabled::settings::Style;
use tabled::{Table, Tabled};

const CLI_SCHEMA_VERSION: &str = "devbox.cli.v1";

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables and plain text.
    #[default]
    Table,
    /// JSON wrapped in a versioned envelope.
    Json,
}

/// One row of a two-column field/value table.
#[derive(Debug, Clone, Tabled)]
pub struct Field {
    #[tabled(rename = "Field")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl ToString) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
        }
    }

    /// A field shown as `-` when absent.
    pub fn optional<T: ToString>(name: impl Into<String>, value: Option<T>) -> Self {
        Self::new(
            name,
            value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string()),
        )
    }
}

/// Print a list in the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                println!("{}", "No items found.".dimmed());
            } else {
                println!("{}", Table::new(data).with(Style::rounded()));
            }
        }
        OutputFormat::Json => println!("{}", format_json(data)),
    }
}

/// Print any value as JSON regardless of the selected format.
pub fn print_json<T: Serialize + ?Sized>(data: &T) {
    println!("{}", format_json(data));
}

/// Print a record: a field table, or the serialized value as JSON.
pub fn print_fields<T: Serialize + ?Sized>(data: &T, fields: Vec<Field>, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{}", Table::new(fields).with(Style::rounded())),
        OutputFormat::Json => println!("{}", format_json(data)),
    }
}

/// Print bare text, or the serialized value as JSON.
pub fn print_text<T: Serialize + ?Sized>(text: &str, data: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{}", text),
        OutputFormat::Json => println!("{}", format_json(data)),
    }
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "Success:".green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "Info:".blue().bold(), message);
}

fn format_json<T: Serialize + ?Sized>(data: &T) -> String {
    let value = serde_json::to_value(data).unwrap_or_else(|_| serde_json::json!({}));
    let sorted = sort_value(wrap_with_schema(value));
    serde_json::to_string_pretty(&sorted).unwrap_or_else(|_| "{}".to_string())
}

fn wrap_with_schema(value: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "schemaVersion": CLI_SCHEMA_VERSION,
        "data": value
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        zeta: u32,
        alpha: Vec<Inner>,
    }

    #[derive(Serialize)]
    struct Inner {
        y: bool,
        b: &'static str,
    }

    #[test]
    fn json_output_is_wrapped_and_sorted() {
        let sample = Sample {
            zeta: 1,
            alpha: vec![Inner { y: true, b: "x" }],
        };
        let out = format_json(&sample);
        let expected = "{\n  \"data\": {\n    \"alpha\": [\n      {\n        \"b\": \"x\",\n        \"y\": true\n      }\n    ],\n    \"zeta\": 1\n  },\n  \"schemaVersion\": \"devbox.cli.v1\"\n}";
        assert_eq!(out, expected);
    }

    #[test]
    fn optional_field_uses_dash() {
        let field = Field::optional::<u32>("Age", None);
        assert_eq!(field.value, "-");
        assert_eq!(Field::optional("Age", Some(30)).value, "30");
    }
}

//! Unit conversion commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use devbox_convert::units::{convert_css, convert_size, parse_length, parse_size};
use devbox_convert::UnitValue;
use devbox_store::Tool;
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliError;
use crate::output::{print_json, print_output, OutputFormat};

use super::CommandContext;

/// Unit commands.
#[derive(Debug, Args)]
pub struct UnitsCommand {
    #[command(subcommand)]
    command: UnitsSubcommand,
}

#[derive(Debug, Subcommand)]
enum UnitsSubcommand {
    /// Convert a data size, e.g. `1.5GiB` or `"20 MB"`.
    Size(QuantityArgs),

    /// Convert a CSS length, e.g. `24px` or `1.5rem`.
    Css(CssArgs),
}

#[derive(Debug, Args)]
struct QuantityArgs {
    /// Value with unit.
    quantity: String,
}

#[derive(Debug, Args)]
struct CssArgs {
    /// Value with unit.
    quantity: String,

    /// Root font size in px. Defaults to the configured value.
    #[arg(long)]
    root_font: Option<f64>,

    /// Parent font size in px for `em`. Defaults to the root font size.
    #[arg(long)]
    parent_font: Option<f64>,
}

impl UnitsCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            UnitsSubcommand::Size(args) => size(ctx, args),
            UnitsSubcommand::Css(args) => css(ctx, args),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct UnitRow {
    #[tabled(rename = "Unit")]
    unit: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn rows(values: &[UnitValue]) -> Vec<UnitRow> {
    values
        .iter()
        .map(|v| UnitRow {
            unit: v.unit,
            value: trim_float(v.value),
        })
        .collect()
}

fn trim_float(value: f64) -> String {
    let text = format!("{:.6}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn size(ctx: CommandContext, args: QuantityArgs) -> Result<()> {
    let (value, unit) = parse_size(&args.quantity).map_err(CliError::from)?;
    let values = convert_size(value, unit);
    record(&ctx, &args.quantity, &values);
    output(&ctx, values);
    Ok(())
}

fn css(ctx: CommandContext, args: CssArgs) -> Result<()> {
    let mut context = ctx.config.css_context();
    if let Some(px) = args.root_font {
        context.root_font_px = px;
        context.parent_font_px = px;
    }
    if let Some(px) = args.parent_font {
        context.parent_font_px = px;
    }
    if context.root_font_px <= 0.0 || context.parent_font_px <= 0.0 {
        return Err(CliError::invalid("font sizes must be positive").into());
    }

    let (value, unit) = parse_length(&args.quantity).map_err(CliError::from)?;
    let values = convert_css(value, unit, &context);
    record(&ctx, &args.quantity, &values);
    output(&ctx, values);
    Ok(())
}

fn record(ctx: &CommandContext, input: &str, values: &[UnitValue]) {
    let summary = values
        .iter()
        .map(|v| format!("{}{}", trim_float(v.value), v.unit))
        .collect::<Vec<_>>()
        .join(", ");
    ctx.record(Tool::Units, input.trim(), &summary);
}

fn output(ctx: &CommandContext, values: Vec<UnitValue>) {
    match ctx.format {
        OutputFormat::Table => print_output(&rows(&values), ctx.format),
        OutputFormat::Json => print_json(&values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_drop_trailing_zeros() {
        assert_eq!(trim_float(1.5), "1.5");
        assert_eq!(trim_float(1024.0), "1024");
        assert_eq!(trim_float(0.000_000_1), "0");
        assert_eq!(trim_float(0.333_333_3), "0.333333");
    }
}

//! Color conversion command.

use anyhow::Result;
use clap::Args;
use devbox_convert::Color;
use devbox_store::Tool;

use crate::error::CliError;
use crate::output::{print_fields, Field};

use super::{read_input, CommandContext};

/// Convert a color between notations.
#[derive(Debug, Args)]
pub struct ColorCommand {
    /// Color such as `#ff8800`, `rgb(255, 136, 0)`, `hsl(32, 100%, 50%)`,
    /// `cmyk(0%, 47%, 100%, 0%)` or `orange` (reads stdin when omitted or `-`).
    color: Option<String>,
}

impl ColorCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let input = read_input(self.color).await?;
        let report = Color::parse(&input).map_err(CliError::from)?.report();

        ctx.record(Tool::Color, input.trim(), &report.hex);

        let fields = vec![
            Field::new("Input", format!("{:?}", report.input_format).to_lowercase()),
            Field::new("HEX", &report.hex),
            Field::new("RGB", &report.rgb),
            Field::new("HSL", &report.hsl),
            Field::new("HSV", &report.hsv),
            Field::new("CMYK", &report.cmyk),
            Field::new("Alpha", report.alpha),
        ];
        print_fields(&report, fields, ctx.format);
        Ok(())
    }
}

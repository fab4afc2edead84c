//! Timestamp conversion command.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use devbox_convert::timestamp::{convert, offset_from_minutes, parse_instant};
use devbox_convert::TimestampUnit;
use devbox_store::Tool;

use crate::error::CliError;
use crate::output::{print_fields, Field};

use super::CommandContext;

/// Convert a timestamp or date.
#[derive(Debug, Args)]
pub struct TimeCommand {
    /// Unix timestamp, RFC 3339, RFC 2822, `YYYY-MM-DD HH:MM:SS` or
    /// `YYYY-MM-DD`. Uses the current time when omitted.
    input: Option<String>,

    /// Unit of a numeric timestamp: auto, s, ms, us, ns.
    #[arg(short, long, default_value = "auto")]
    unit: TimestampUnit,

    /// Offset for zone-less dates and local renderings, in minutes east of
    /// UTC. Defaults to the configured offset.
    #[arg(long, allow_hyphen_values = true)]
    offset: Option<i32>,
}

impl TimeCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let offset = offset_from_minutes(self.offset.unwrap_or(ctx.config.utc_offset_minutes));

        let instant = match self.input.as_deref() {
            Some(text) => parse_instant(text, self.unit, offset).map_err(CliError::from)?,
            None => Utc::now(),
        };
        let report = convert(instant, offset);

        if let Some(text) = &self.input {
            ctx.record(Tool::Time, text.trim(), &report.iso_utc);
        }

        let fields = vec![
            Field::new("Unix (s)", report.unix_seconds),
            Field::new("Unix (ms)", report.unix_millis),
            Field::new("UTC", &report.iso_utc),
            Field::new("RFC 3339", &report.rfc3339),
            Field::new("RFC 2822", &report.rfc2822),
            Field::new("SQL", &report.sql),
            Field::new("Weekday", &report.weekday),
            Field::new("Day of Year", report.day_of_year),
            Field::new("Relative", &report.relative),
        ];
        print_fields(&report, fields, ctx.format);
        Ok(())
    }
}

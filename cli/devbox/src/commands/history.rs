//! History commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use devbox_store::{History, HistoryEntry, Tool};
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliError;
use crate::output::{print_info, print_json, print_output, print_success, OutputFormat};

use super::CommandContext;

/// Preview width for long inputs and outputs in tables.
const PREVIEW_CHARS: usize = 48;

/// History commands.
#[derive(Debug, Args)]
pub struct HistoryCommand {
    #[command(subcommand)]
    command: HistorySubcommand,
}

#[derive(Debug, Subcommand)]
enum HistorySubcommand {
    /// List recent results, newest first.
    List(ToolArgs),

    /// Remove recorded results.
    Clear(ToolArgs),
}

#[derive(Debug, Args)]
struct ToolArgs {
    /// Only this tool (id-card, encode, decode, hash, color, time, units,
    /// json, regex, qr).
    #[arg(short, long)]
    tool: Option<Tool>,
}

impl HistoryCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            HistorySubcommand::List(args) => list(ctx, args),
            HistorySubcommand::Clear(args) => clear(ctx, args),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct EntryRow {
    #[tabled(rename = "When")]
    recorded_at: String,
    #[tabled(rename = "Tool")]
    tool: Tool,
    #[tabled(rename = "Input")]
    input: String,
    #[tabled(rename = "Output")]
    output: String,
}

impl From<&HistoryEntry> for EntryRow {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            recorded_at: entry.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            tool: entry.tool,
            input: preview(&entry.input),
            output: preview(&entry.output),
        }
    }
}

fn preview(text: &str) -> String {
    let flat = text.replace('\n', "⏎");
    match flat.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}…", &flat[..cut]),
        None => flat,
    }
}

fn list(ctx: CommandContext, args: ToolArgs) -> Result<()> {
    let mut store = ctx.history_store()?;
    let history = History::new(&mut store, ctx.config.history_limit);
    let entries = match args.tool {
        Some(tool) => history.list(tool),
        None => history.list_all(),
    }
    .map_err(CliError::from)?;

    match ctx.format {
        OutputFormat::Json => print_json(&entries),
        OutputFormat::Table => {
            if !ctx.history_enabled {
                print_info("History recording is off for this run or in config.");
            }
            let rows: Vec<EntryRow> = entries.iter().map(EntryRow::from).collect();
            print_output(&rows, ctx.format);
        }
    }
    Ok(())
}

fn clear(ctx: CommandContext, args: ToolArgs) -> Result<()> {
    let mut store = ctx.history_store()?;
    let mut history = History::new(&mut store, ctx.config.history_limit);
    let removed = match args.tool {
        Some(tool) => history.clear(tool),
        None => history.clear_all(),
    }
    .map_err(CliError::from)?;

    print_success(&format!(
        "Removed {} entr{}",
        removed,
        if removed == 1 { "y" } else { "ies" }
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_flattens_and_cuts() {
        assert_eq!(preview("a\nb"), "a⏎b");
        let long = "x".repeat(PREVIEW_CHARS + 5);
        let cut = preview(&long);
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + 1);
        assert!(cut.ends_with('…'));
    }
}

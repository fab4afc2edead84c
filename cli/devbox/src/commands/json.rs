//! JSON commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use devbox_convert::json;
use devbox_store::Tool;

use crate::error::CliError;
use crate::output::{print_fields, print_text, Field};

use super::{read_file_or_stdin, CommandContext};

/// JSON commands.
#[derive(Debug, Args)]
pub struct JsonCommand {
    #[command(subcommand)]
    command: JsonSubcommand,
}

#[derive(Debug, Subcommand)]
enum JsonSubcommand {
    /// Pretty-print a document.
    Format(FormatArgs),

    /// Remove insignificant whitespace.
    Minify(DocumentArgs),

    /// Check a document and describe its shape.
    Validate(DocumentArgs),
}

#[derive(Debug, Args)]
struct DocumentArgs {
    /// File to read, or `-` for stdin.
    #[arg(default_value = "-")]
    file: String,
}

#[derive(Debug, Args)]
struct FormatArgs {
    #[command(flatten)]
    document: DocumentArgs,

    /// Spaces per indent level (0 minifies).
    #[arg(short, long, default_value = "2")]
    indent: usize,

    /// Sort object keys.
    #[arg(short, long)]
    sort_keys: bool,
}

impl JsonCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            JsonSubcommand::Format(args) => {
                let input = read_file_or_stdin(&args.document.file).await?;
                let output =
                    json::format(&input, args.indent, args.sort_keys).map_err(CliError::from)?;
                ctx.record(Tool::Json, &input, &output);
                print_text(&output, &output, ctx.format);
                Ok(())
            }
            JsonSubcommand::Minify(args) => {
                let input = read_file_or_stdin(&args.file).await?;
                let output = json::minify(&input).map_err(CliError::from)?;
                ctx.record(Tool::Json, &input, &output);
                print_text(&output, &output, ctx.format);
                Ok(())
            }
            JsonSubcommand::Validate(args) => {
                let input = read_file_or_stdin(&args.file).await?;
                let stats = json::validate(&input)
                    .map_err(|e| CliError::from(devbox_convert::ConvertError::from(e)))?;
                let fields = vec![
                    Field::new("Valid", "yes"),
                    Field::new("Root", stats.root),
                    Field::new("Depth", stats.depth),
                    Field::new("Values", stats.values),
                ];
                print_fields(&stats, fields, ctx.format);
                Ok(())
            }
        }
    }
}

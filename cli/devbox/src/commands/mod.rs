//! CLI commands.

mod codec;
mod color;
mod config;
mod hash;
mod history;
mod idcard;
mod json;
mod password;
mod qr;
mod regex;
mod time;
mod units;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use devbox_store::{FileStore, History, Tool};
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

use crate::config::{history_path, home_dir, Config};
use crate::error::CliError;
use crate::output::OutputFormat;

/// devbox - developer toolbox on the command line.
#[derive(Debug, Parser)]
#[command(name = "devbox")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (table or json). Defaults to the configured format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Do not record this run in the history.
    #[arg(long, global = true)]
    no_history: bool,

    /// Log debug diagnostics to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate, validate, and inspect national ID numbers.
    Idcard(idcard::IdcardCommand),

    /// Encode text (base64, base64url, hex, url, html, unicode).
    Encode(codec::EncodeCommand),

    /// Decode text (base64, base64url, hex, url, html, unicode).
    Decode(codec::DecodeCommand),

    /// Compute digests and HMACs.
    Hash(hash::HashCommand),

    /// Generate passwords and estimate their strength.
    Password(password::PasswordCommand),

    /// Convert a color between notations.
    Color(color::ColorCommand),

    /// Convert timestamps and dates.
    Time(time::TimeCommand),

    /// Convert data sizes and CSS lengths.
    Units(units::UnitsCommand),

    /// Format, minify, and validate JSON.
    Json(json::JsonCommand),

    /// Test and replace with regular expressions.
    Regex(regex::RegexCommand),

    /// Render and scan QR codes.
    Qr(qr::QrCommand),

    /// Show or clear recent results.
    History(history::HistoryCommand),

    /// Show or change configuration.
    Config(config::ConfigCommand),

    /// Show CLI version.
    Version,
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let home = home_dir()?;
        let config = Config::load(&home)?;
        debug!(home = %home.display(), "loaded config");

        let ctx = CommandContext {
            format: self.format.unwrap_or(config.format),
            history_enabled: config.history_enabled && !self.no_history,
            config,
            home,
        };

        match self.command {
            Commands::Idcard(cmd) => cmd.run(ctx).await,
            Commands::Encode(cmd) => cmd.run(ctx).await,
            Commands::Decode(cmd) => cmd.run(ctx).await,
            Commands::Hash(cmd) => cmd.run(ctx).await,
            Commands::Password(cmd) => cmd.run(ctx).await,
            Commands::Color(cmd) => cmd.run(ctx).await,
            Commands::Time(cmd) => cmd.run(ctx).await,
            Commands::Units(cmd) => cmd.run(ctx).await,
            Commands::Json(cmd) => cmd.run(ctx).await,
            Commands::Regex(cmd) => cmd.run(ctx).await,
            Commands::Qr(cmd) => cmd.run(ctx).await,
            Commands::History(cmd) => cmd.run(ctx).await,
            Commands::Config(cmd) => cmd.run(ctx).await,
            Commands::Version => {
                println!("devbox {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
    pub format: OutputFormat,
    pub history_enabled: bool,
    pub home: PathBuf,
}

impl CommandContext {
    /// Open the history file.
    pub fn history_store(&self) -> Result<FileStore> {
        Ok(FileStore::open(history_path(&self.home)).map_err(CliError::from)?)
    }

    /// Remember one result. Failures are logged, never fatal.
    pub fn record(&self, tool: Tool, input: &str, output: &str) {
        if !self.history_enabled {
            return;
        }
        let result = self.history_store().and_then(|mut store| {
            History::new(&mut store, self.config.history_limit)
                .record(tool, input, output)
                .map_err(CliError::from)?;
            Ok(())
        });
        if let Err(e) = result {
            warn!(tool = %tool, error = %e, "failed to record history");
        }
    }
}

/// Resolve text from an argument, or stdin when it is absent or `-`.
pub async fn read_input(arg: Option<String>) -> Result<String> {
    match arg {
        Some(text) if text != "-" => Ok(text),
        _ => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read stdin")?;
            // Drop the newline a shell pipe appends
            if buf.ends_with('\n') {
                buf.pop();
                if buf.ends_with('\r') {
                    buf.pop();
                }
            }
            Ok(buf)
        }
    }
}

/// Read a file argument, or stdin when it is `-`.
pub async fn read_file_or_stdin(path: &str) -> Result<String> {
    if path == "-" {
        return read_input(None).await;
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path))
}

//! QR code commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use devbox_convert::qr::{decode_image, render_png, render_svg, render_terminal, DEFAULT_SIZE};
use devbox_convert::{EcLevel, QrOptions, QrPayload};
use devbox_store::Tool;
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use crate::error::CliError;
use crate::output::{print_output, print_success, print_text};

use super::{read_input, CommandContext};

/// QR code commands.
#[derive(Debug, Args)]
pub struct QrCommand {
    #[command(subcommand)]
    command: QrSubcommand,
}

#[derive(Debug, Subcommand)]
enum QrSubcommand {
    /// Render text as a QR code.
    Generate(GenerateArgs),

    /// Decode the QR codes in a PNG image.
    Scan(ScanArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Content to encode (reads stdin when omitted or `-`).
    text: Option<String>,

    /// Error-correction level: L, M, Q, H.
    #[arg(short, long, default_value = "M")]
    ec_level: EcLevel,

    /// Minimum edge length in pixels for image output.
    #[arg(short, long, default_value_t = DEFAULT_SIZE)]
    size: u32,

    /// Write a PNG image to this path.
    #[arg(long, conflicts_with = "svg")]
    png: Option<PathBuf>,

    /// Write an SVG image to this path.
    #[arg(long)]
    svg: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ScanArgs {
    /// Image file.
    path: PathBuf,
}

impl QrCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            QrSubcommand::Generate(args) => generate(ctx, args).await,
            QrSubcommand::Scan(args) => scan(ctx, args).await,
        }
    }
}

async fn generate(ctx: CommandContext, args: GenerateArgs) -> Result<()> {
    let text = read_input(args.text).await?;
    let opts = QrOptions {
        ec_level: args.ec_level,
        size: args.size,
    };

    let written = match (&args.png, &args.svg) {
        (Some(path), _) => {
            let png = render_png(&text, &opts).map_err(CliError::from)?;
            write(path, &png).await?;
            Some(path)
        }
        (None, Some(path)) => {
            let svg = render_svg(&text, &opts).map_err(CliError::from)?;
            write(path, svg.as_bytes()).await?;
            Some(path)
        }
        (None, None) => None,
    };

    match written {
        Some(path) => {
            ctx.record(Tool::Qr, &text, &path.display().to_string());
            print_success(&format!("Wrote {}", path.display()));
        }
        None => {
            let art = render_terminal(&text, &opts).map_err(CliError::from)?;
            ctx.record(Tool::Qr, &text, "terminal");
            print_text(&art, &art, ctx.format);
        }
    }
    Ok(())
}

async fn write(path: &Path, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote image");
    Ok(())
}

#[derive(Debug, Serialize, Tabled)]
struct PayloadRow {
    #[tabled(rename = "Content")]
    content: String,
    #[tabled(rename = "Version")]
    version: usize,
    #[tabled(rename = "EC")]
    ec_level: u16,
}

impl From<QrPayload> for PayloadRow {
    fn from(p: QrPayload) -> Self {
        Self {
            content: p.content,
            version: p.version,
            ec_level: p.ec_level,
        }
    }
}

async fn scan(ctx: CommandContext, args: ScanArgs) -> Result<()> {
    let bytes = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    let payloads = decode_image(&bytes).map_err(CliError::from)?;

    let contents = payloads
        .iter()
        .map(|p| p.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    ctx.record(Tool::Qr, &args.path.display().to_string(), &contents);

    let rows: Vec<PayloadRow> = payloads.into_iter().map(PayloadRow::from).collect();
    print_output(&rows, ctx.format);
    Ok(())
}

//! Digest and HMAC commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use devbox_codec::{digest, digest_all, hmac, DigestAlgorithm, StreamingDigest};
use devbox_store::Tool;
use serde::Serialize;
use tabled::Tabled;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::error::CliError;
use crate::output::{print_output, print_text};

use super::{read_input, CommandContext};

const CHUNK_SIZE: usize = 64 * 1024;

/// Hash commands.
#[derive(Debug, Args)]
pub struct HashCommand {
    #[command(subcommand)]
    command: HashSubcommand,
}

#[derive(Debug, Subcommand)]
enum HashSubcommand {
    /// Hash text. Shows every algorithm when none is given.
    Text(TextArgs),

    /// Hash a file without loading it into memory.
    File(FileArgs),

    /// Compute a keyed HMAC.
    Hmac(HmacArgs),
}

#[derive(Debug, Args)]
struct TextArgs {
    /// Algorithm: md5, sha1, sha224, sha256, sha384, sha512, sha3-256, sha3-512.
    #[arg(short, long)]
    algorithm: Option<DigestAlgorithm>,

    /// Text to hash (reads stdin when omitted or `-`).
    text: Option<String>,
}

#[derive(Debug, Args)]
struct FileArgs {
    /// Algorithm.
    #[arg(short, long, default_value = "sha256")]
    algorithm: DigestAlgorithm,

    /// File to hash.
    path: PathBuf,
}

#[derive(Debug, Args)]
struct HmacArgs {
    /// Algorithm.
    #[arg(short, long, default_value = "sha256")]
    algorithm: DigestAlgorithm,

    /// Secret key.
    #[arg(short, long, env = "DEVBOX_HMAC_KEY", hide_env_values = true)]
    key: String,

    /// Message (reads stdin when omitted or `-`).
    text: Option<String>,
}

impl HashCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            HashSubcommand::Text(args) => hash_text(ctx, args).await,
            HashSubcommand::File(args) => hash_file(ctx, args).await,
            HashSubcommand::Hmac(args) => hash_hmac(ctx, args).await,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct DigestRow {
    #[tabled(rename = "Algorithm")]
    algorithm: String,
    #[tabled(rename = "Digest")]
    digest: String,
}

#[derive(Debug, Serialize)]
struct DigestOutput {
    algorithm: DigestAlgorithm,
    digest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes: Option<u64>,
}

async fn hash_text(ctx: CommandContext, args: TextArgs) -> Result<()> {
    let input = read_input(args.text).await?;

    let Some(algorithm) = args.algorithm else {
        let rows: Vec<DigestRow> = digest_all(input.as_bytes())
            .into_iter()
            .map(|(algorithm, digest)| DigestRow { algorithm, digest })
            .collect();
        print_output(&rows, ctx.format);
        return Ok(());
    };

    let hex = digest(algorithm, input.as_bytes());
    ctx.record(Tool::Hash, &input, &format!("{}: {}", algorithm, hex));

    let data = DigestOutput {
        algorithm,
        digest: hex,
        bytes: None,
    };
    print_text(&data.digest, &data, ctx.format);
    Ok(())
}

async fn hash_file(ctx: CommandContext, args: FileArgs) -> Result<()> {
    let mut file = tokio::fs::File::open(&args.path)
        .await
        .with_context(|| format!("Failed to open {}", args.path.display()))?;

    let mut hasher = StreamingDigest::new(args.algorithm);
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = file
            .read(&mut buf)
            .await
            .with_context(|| format!("Failed to read {}", args.path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    let bytes = hasher.bytes_processed();
    let hex = hasher.finalize();
    debug!(path = %args.path.display(), bytes, "hashed file");

    let label = args.path.display().to_string();
    ctx.record(Tool::Hash, &label, &format!("{}: {}", args.algorithm, hex));

    let data = DigestOutput {
        algorithm: args.algorithm,
        digest: hex,
        bytes: Some(bytes),
    };
    print_text(&format!("{}  {}", data.digest, label), &data, ctx.format);
    Ok(())
}

async fn hash_hmac(ctx: CommandContext, args: HmacArgs) -> Result<()> {
    let input = read_input(args.text).await?;
    let mac = hmac(args.algorithm, args.key.as_bytes(), input.as_bytes()).map_err(CliError::from)?;

    // The key is never written to history
    ctx.record(Tool::Hash, &input, &format!("hmac-{}: {}", args.algorithm, mac));

    let data = DigestOutput {
        algorithm: args.algorithm,
        digest: mac,
        bytes: None,
    };
    print_text(&data.digest, &data, ctx.format);
    Ok(())
}

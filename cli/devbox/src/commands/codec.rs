//! Encode and decode commands.

use anyhow::Result;
use clap::Args;
use devbox_codec::Encoding;
use devbox_store::Tool;
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliError;
use crate::output::{print_output, print_text};

use super::{read_input, CommandContext};

/// Encode text.
#[derive(Debug, Args)]
pub struct EncodeCommand {
    /// Encoding: base64, base64-url, hex, url, unicode, html.
    /// Shows every encoding when omitted.
    #[arg(short, long)]
    encoding: Option<Encoding>,

    /// Text to encode (reads stdin when omitted or `-`).
    text: Option<String>,
}

/// Decode text.
#[derive(Debug, Args)]
pub struct DecodeCommand {
    /// Encoding: base64, base64-url, hex, url, unicode, html.
    encoding: Encoding,

    /// Text to decode (reads stdin when omitted or `-`).
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct Coded<'a> {
    encoding: Encoding,
    input: &'a str,
    output: &'a str,
}

#[derive(Debug, Serialize, Tabled)]
struct EncodingRow {
    #[tabled(rename = "Encoding")]
    encoding: &'static str,
    #[tabled(rename = "Output")]
    output: String,
}

impl EncodeCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let input = read_input(self.text).await?;

        let Some(encoding) = self.encoding else {
            let rows: Vec<EncodingRow> = Encoding::ALL
                .into_iter()
                .map(|e| EncodingRow {
                    encoding: e.as_str(),
                    output: e.encode(&input),
                })
                .collect();
            print_output(&rows, ctx.format);
            return Ok(());
        };

        let output = encoding.encode(&input);
        ctx.record(Tool::Encode, &input, &output);

        let data = Coded {
            encoding,
            input: &input,
            output: &output,
        };
        print_text(&output, &data, ctx.format);
        Ok(())
    }
}

impl DecodeCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let input = read_input(self.text).await?;
        let output = self.encoding.decode(&input).map_err(CliError::from)?;
        ctx.record(Tool::Decode, &input, &output);

        let data = Coded {
            encoding: self.encoding,
            input: &input,
            output: &output,
        };
        print_text(&output, &data, ctx.format);
        Ok(())
    }
}

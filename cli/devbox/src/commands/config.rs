//! Configuration commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::config::{config_path, history_path, KEYS};
use crate::output::{print_fields, print_success, print_text, Field};

use super::CommandContext;

/// Config commands.
#[derive(Debug, Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
enum ConfigSubcommand {
    /// Show the effective configuration.
    Show,

    /// Set one key, e.g. `password.length 24`.
    Set(SetArgs),

    /// Show where config and history are stored.
    Path,
}

#[derive(Debug, Args)]
struct SetArgs {
    /// Dotted key.
    key: String,

    /// New value.
    #[arg(allow_hyphen_values = true)]
    value: String,
}

impl ConfigCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            ConfigSubcommand::Show => show(ctx),
            ConfigSubcommand::Set(args) => set(ctx, args),
            ConfigSubcommand::Path => path(ctx),
        }
    }
}

fn show(ctx: CommandContext) -> Result<()> {
    let flat = serde_json::to_value(&ctx.config)?;
    let fields = KEYS
        .iter()
        .map(|key| {
            let value = key
                .split('.')
                .try_fold(&flat, |v, part| v.get(part))
                .map(|v| match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_default();
            Field::new(*key, value)
        })
        .collect();
    print_fields(&ctx.config, fields, ctx.format);
    Ok(())
}

fn set(ctx: CommandContext, args: SetArgs) -> Result<()> {
    let mut config = ctx.config;
    config.set(&args.key, &args.value)?;
    config.save(&ctx.home)?;
    print_success(&format!("Set {} = {}", args.key, args.value.trim()));
    Ok(())
}

#[derive(Debug, Serialize)]
struct Paths {
    home: String,
    config: String,
    history: String,
}

fn path(ctx: CommandContext) -> Result<()> {
    let paths = Paths {
        home: ctx.home.display().to_string(),
        config: config_path(&ctx.home).display().to_string(),
        history: history_path(&ctx.home).display().to_string(),
    };
    let text = format!("{}\n{}", paths.config, paths.history);
    print_text(&text, &paths, ctx.format);
    Ok(())
}

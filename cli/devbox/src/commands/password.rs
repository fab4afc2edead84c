//! Password commands. Generated passwords are never written to history.

use anyhow::Result;
use clap::{Args, Subcommand};
use devbox_codec::password::{MAX_COUNT, MAX_LENGTH, MIN_LENGTH};
use devbox_codec::{strength, PasswordPolicy, Strength};
use serde::Serialize;

use crate::error::CliError;
use crate::output::{print_fields, print_text, Field};

use super::{read_input, CommandContext};

/// Password commands.
#[derive(Debug, Args)]
pub struct PasswordCommand {
    #[command(subcommand)]
    command: PasswordSubcommand,
}

#[derive(Debug, Subcommand)]
enum PasswordSubcommand {
    /// Generate random passwords.
    Generate(GenerateArgs),

    /// Estimate the strength of a password.
    Strength(StrengthArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Password length. Defaults to the configured value.
    #[arg(short, long)]
    length: Option<usize>,

    /// How many passwords to generate.
    #[arg(short = 'n', long, default_value = "1")]
    count: usize,

    /// Leave out lower-case letters.
    #[arg(long)]
    no_lowercase: bool,

    /// Leave out upper-case letters.
    #[arg(long)]
    no_uppercase: bool,

    /// Leave out digits.
    #[arg(long)]
    no_digits: bool,

    /// Leave out symbols.
    #[arg(long)]
    no_symbols: bool,

    /// Leave out look-alike characters (il1Lo0O).
    #[arg(long)]
    exclude_ambiguous: bool,
}

#[derive(Debug, Args)]
struct StrengthArgs {
    /// Password (reads stdin when omitted or `-`).
    password: Option<String>,
}

impl PasswordCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            PasswordSubcommand::Generate(args) => generate_passwords(ctx, args),
            PasswordSubcommand::Strength(args) => show_strength(ctx, args).await,
        }
    }
}

#[derive(Debug, Serialize)]
struct GeneratedPassword {
    password: String,
    strength: Strength,
}

fn generate_passwords(ctx: CommandContext, args: GenerateArgs) -> Result<()> {
    if args.count == 0 || args.count > MAX_COUNT {
        return Err(CliError::invalid(format!("count must be between 1 and {}", MAX_COUNT)).into());
    }

    let defaults = ctx.config.password;
    let policy = PasswordPolicy {
        length: args.length.unwrap_or(defaults.length),
        lowercase: !args.no_lowercase,
        uppercase: !args.no_uppercase,
        digits: !args.no_digits,
        symbols: defaults.symbols && !args.no_symbols,
        exclude_ambiguous: defaults.exclude_ambiguous || args.exclude_ambiguous,
    };
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&policy.length) {
        return Err(CliError::invalid(format!(
            "length must be between {} and {}",
            MIN_LENGTH, MAX_LENGTH
        ))
        .into());
    }

    let passwords = policy
        .generate_many(args.count, &mut rand::rng())
        .map_err(CliError::from)?;

    let data: Vec<GeneratedPassword> = passwords
        .into_iter()
        .map(|password| GeneratedPassword {
            strength: strength(&password),
            password,
        })
        .collect();
    let text = data
        .iter()
        .map(|p| p.password.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    print_text(&text, &data, ctx.format);
    Ok(())
}

async fn show_strength(ctx: CommandContext, args: StrengthArgs) -> Result<()> {
    let password = read_input(args.password).await?;
    let report = strength(&password);

    let fields = vec![
        Field::new("Length", password.chars().count()),
        Field::new("Entropy", format!("{:.2} bits", report.entropy_bits)),
        Field::new("Level", report.level.as_str()),
    ];
    print_fields(&report, fields, ctx.format);
    Ok(())
}

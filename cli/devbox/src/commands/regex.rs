//! Regular expression commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use devbox_convert::regex::{replace, test};
use devbox_convert::{MatchReport, RegexFlags, RegexTemplate};
use devbox_store::Tool;
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliError;
use crate::output::{print_json, print_output, print_text, OutputFormat};

use super::{read_input, CommandContext};

/// Regex commands.
#[derive(Debug, Args)]
pub struct RegexCommand {
    #[command(subcommand)]
    command: RegexSubcommand,
}

#[derive(Debug, Subcommand)]
enum RegexSubcommand {
    /// List every match of a pattern.
    Test(TestArgs),

    /// Replace every match of a pattern.
    Replace(ReplaceArgs),

    /// List ready-made patterns.
    Templates,
}

#[derive(Debug, Args)]
struct PatternArgs {
    /// Pattern, or a template name with `--template`.
    pattern: String,

    /// Treat the pattern argument as a template name (see `regex templates`).
    #[arg(short, long)]
    template: bool,

    /// Flag letters: i (case-insensitive), m (multi-line), s (dot matches
    /// newline), x (ignore whitespace).
    #[arg(short, long, default_value = "")]
    flags: String,
}

impl PatternArgs {
    fn resolve(&self) -> Result<(String, RegexFlags), CliError> {
        let pattern = if self.template {
            self.pattern.parse::<RegexTemplate>()?.pattern().to_string()
        } else {
            self.pattern.clone()
        };
        Ok((pattern, RegexFlags::from_letters(&self.flags)?))
    }
}

#[derive(Debug, Args)]
struct TestArgs {
    #[command(flatten)]
    pattern: PatternArgs,

    /// Text to search (reads stdin when omitted or `-`).
    text: Option<String>,
}

#[derive(Debug, Args)]
struct ReplaceArgs {
    #[command(flatten)]
    pattern: PatternArgs,

    /// Replacement; `$1` and `${name}` refer to groups.
    replacement: String,

    /// Text to rewrite (reads stdin when omitted or `-`).
    text: Option<String>,
}

impl RegexCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            RegexSubcommand::Test(args) => test_pattern(ctx, args).await,
            RegexSubcommand::Replace(args) => replace_pattern(ctx, args).await,
            RegexSubcommand::Templates => list_templates(ctx),
        }
    }
}

#[derive(Debug, Tabled)]
struct MatchRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Span")]
    span: String,
    #[tabled(rename = "Match")]
    text: String,
    #[tabled(rename = "Groups")]
    groups: String,
}

async fn test_pattern(ctx: CommandContext, args: TestArgs) -> Result<()> {
    let (pattern, flags) = args.pattern.resolve()?;
    let text = read_input(args.text).await?;
    let report = test(&pattern, flags, &text).map_err(CliError::from)?;

    ctx.record(
        Tool::Regex,
        &format!("/{}/{}", pattern, args.pattern.flags),
        &format!("{} matches", report.count),
    );

    match ctx.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Table => print_matches(&report),
    }
    Ok(())
}

fn print_matches(report: &MatchReport) {
    let rows: Vec<MatchRow> = report
        .matches
        .iter()
        .enumerate()
        .map(|(i, m)| MatchRow {
            index: i + 1,
            span: format!("{}..{}", m.start, m.end),
            text: m.text.clone(),
            groups: m
                .groups
                .iter()
                .map(|g| g.as_deref().unwrap_or("-"))
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();

    println!(
        "{} match{}",
        report.count,
        if report.count == 1 { "" } else { "es" }
    );
    if !rows.is_empty() {
        println!(
            "{}",
            tabled::Table::new(rows).with(tabled::settings::Style::rounded())
        );
    }
    if report.truncated {
        println!("(showing the first {})", report.matches.len());
    }
}

#[derive(Debug, Serialize)]
struct Replaced<'a> {
    pattern: &'a str,
    output: &'a str,
}

async fn replace_pattern(ctx: CommandContext, args: ReplaceArgs) -> Result<()> {
    let (pattern, flags) = args.pattern.resolve()?;
    let text = read_input(args.text).await?;
    let output = replace(&pattern, flags, &text, &args.replacement).map_err(CliError::from)?;

    ctx.record(Tool::Regex, &text, &output);

    let data = Replaced {
        pattern: &pattern,
        output: &output,
    };
    print_text(&output, &data, ctx.format);
    Ok(())
}

#[derive(Debug, Serialize, Tabled)]
struct TemplateRow {
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Description")]
    description: &'static str,
    #[tabled(rename = "Example")]
    example: &'static str,
    #[tabled(rename = "Pattern")]
    pattern: &'static str,
}

fn list_templates(ctx: CommandContext) -> Result<()> {
    let rows: Vec<TemplateRow> = RegexTemplate::all()
        .iter()
        .map(|t| TemplateRow {
            name: t.name(),
            description: t.description(),
            example: t.example(),
            pattern: t.pattern(),
        })
        .collect();
    print_output(&rows, ctx.format);
    Ok(())
}

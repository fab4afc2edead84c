//! National ID number commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use devbox_idcard::{
    find_region, find_regions, generate_batch, regions, validate, Gender, IdCardInfo,
    LegacyIdNumber, MAX_BATCH_SIZE,
};
use devbox_store::Tool;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliError;
use crate::output::{print_fields, print_output, print_text, Field, OutputFormat};

use super::{read_input, CommandContext};

/// ID number commands.
#[derive(Debug, Args)]
pub struct IdcardCommand {
    #[command(subcommand)]
    command: IdcardSubcommand,
}

#[derive(Debug, Subcommand)]
enum IdcardSubcommand {
    /// Generate random valid numbers.
    Generate(GenerateArgs),

    /// Validate a number and show its fields.
    Validate(NumberArgs),

    /// Convert a 15-digit number to the 18-digit form.
    Upgrade(NumberArgs),

    /// List known area codes.
    Regions(RegionsArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// How many numbers to generate (1-100).
    #[arg(short = 'n', long, default_value = "1")]
    count: usize,

    /// Area code or prefix (2, 4 or 6 digits).
    #[arg(long)]
    area: Option<String>,

    /// Gender (male or female).
    #[arg(long)]
    gender: Option<Gender>,

    /// Earliest birth year. Defaults to the configured value.
    #[arg(long)]
    start_year: Option<i32>,

    /// Latest birth year. Defaults to the configured value.
    #[arg(long)]
    end_year: Option<i32>,

    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Args)]
struct NumberArgs {
    /// ID number (reads stdin when omitted or `-`).
    number: Option<String>,
}

#[derive(Debug, Args)]
struct RegionsArgs {
    /// Only show codes starting with this prefix.
    prefix: Option<String>,
}

impl IdcardCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            IdcardSubcommand::Generate(args) => generate_numbers(ctx, args),
            IdcardSubcommand::Validate(args) => validate_number(ctx, args).await,
            IdcardSubcommand::Upgrade(args) => upgrade_number(ctx, args).await,
            IdcardSubcommand::Regions(args) => list_regions(ctx, args),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct GeneratedRow {
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Birth Date")]
    birth_date: String,
    #[tabled(rename = "Gender")]
    gender: String,
    #[tabled(rename = "Region")]
    region: String,
}

fn generate_numbers(ctx: CommandContext, args: GenerateArgs) -> Result<()> {
    if args.count == 0 || args.count > MAX_BATCH_SIZE {
        return Err(CliError::invalid(format!(
            "count must be between 1 and {}",
            MAX_BATCH_SIZE
        ))
        .into());
    }

    let mut options = ctx.config.generate_options();
    options.area = args.area;
    options.gender = args.gender;
    if let Some(year) = args.start_year {
        options.start_year = year;
    }
    if let Some(year) = args.end_year {
        options.end_year = year;
    }

    let numbers = match args.seed {
        Some(seed) => generate_batch(&options, args.count, &mut StdRng::seed_from_u64(seed)),
        None => generate_batch(&options, args.count, &mut rand::rng()),
    }
    .map_err(CliError::from)?;

    let rows: Vec<GeneratedRow> = numbers
        .iter()
        .map(|id| GeneratedRow {
            number: id.to_string(),
            birth_date: id.birth_date().to_string(),
            gender: id.gender().to_string(),
            region: find_region(id.area_code())
                .map(|r| r.full_name())
                .unwrap_or_else(|| id.area_code().to_string()),
        })
        .collect();

    let joined = rows
        .iter()
        .map(|r| r.number.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    ctx.record(Tool::IdCard, "generate", &joined);

    if rows.len() == 1 && ctx.format == OutputFormat::Table {
        println!("{}", rows[0].number);
        return Ok(());
    }
    print_output(&rows, ctx.format);
    Ok(())
}

async fn validate_number(ctx: CommandContext, args: NumberArgs) -> Result<()> {
    let input = read_input(args.number).await?;
    let report = validate(&input);

    let summary = match &report.info {
        Some(info) => format!("valid: {}", info.number),
        None => format!("invalid: {}", report.reason.as_deref().unwrap_or("unknown")),
    };
    ctx.record(Tool::IdCard, input.trim(), &summary);

    let mut fields = vec![Field::new("Valid", if report.valid { "yes" } else { "no" })];
    match &report.info {
        Some(info) => fields.extend(info_fields(info)),
        None => fields.push(Field::optional("Reason", report.reason.as_deref())),
    }
    print_fields(&report, fields, ctx.format);

    if !report.valid {
        std::process::exit(1);
    }
    Ok(())
}

fn info_fields(info: &IdCardInfo) -> Vec<Field> {
    let mut fields = vec![
        Field::new("Number", &info.number),
        Field::new("Format", if info.legacy { "15-digit" } else { "18-digit" }),
    ];
    if info.legacy {
        fields.push(Field::optional("Upgraded", info.upgraded.as_deref()));
    }
    fields.extend([
        Field::new("Area Code", &info.area_code),
        Field::optional("Province", info.province.as_deref()),
        Field::optional("Region", info.region.as_deref()),
        Field::optional("Birth Date", info.birth_date),
        Field::optional("Age", info.age),
        Field::new(
            "Gender",
            format!("{} ({})", info.gender, info.gender.label_zh()),
        ),
        Field::optional("Zodiac", info.zodiac),
        Field::optional("Star Sign", info.star_sign),
        Field::new("Sequence", &info.sequence),
    ]);
    fields
}

#[derive(Debug, Serialize)]
struct Upgraded {
    legacy: String,
    number: String,
}

async fn upgrade_number(ctx: CommandContext, args: NumberArgs) -> Result<()> {
    let input = read_input(args.number).await?;
    let legacy = LegacyIdNumber::parse(&input).map_err(CliError::from)?;
    let upgraded = legacy.upgrade().map_err(CliError::from)?;

    ctx.record(Tool::IdCard, legacy.as_str(), upgraded.as_str());

    let data = Upgraded {
        legacy: legacy.to_string(),
        number: upgraded.to_string(),
    };
    print_text(&data.number, &data, ctx.format);
    Ok(())
}

#[derive(Debug, Serialize, Tabled)]
struct RegionRow {
    #[tabled(rename = "Code")]
    code: &'static str,
    #[tabled(rename = "Province")]
    province: &'static str,
    #[tabled(rename = "City")]
    city: &'static str,
    #[tabled(rename = "District")]
    district: &'static str,
}

fn list_regions(ctx: CommandContext, args: RegionsArgs) -> Result<()> {
    let found = match args.prefix.as_deref().map(str::trim) {
        Some(prefix) if !prefix.is_empty() => find_regions(prefix),
        _ => regions().iter().collect(),
    };

    let rows: Vec<RegionRow> = found
        .into_iter()
        .map(|r| RegionRow {
            code: r.code,
            province: r.province().unwrap_or("-"),
            city: r.city,
            district: r.district,
        })
        .collect();

    print_output(&rows, ctx.format);
    Ok(())
}

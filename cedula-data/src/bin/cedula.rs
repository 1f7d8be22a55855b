use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use cedula_core::calculations::compute;
use cedula_core::store::InMemoryScheduleRepository;
use cedula_core::{ComputationMethod, ScheduleRepository, ScheduleSnapshot, TaxpayerDeclaration};
use cedula_data::{ScheduleLoader, compute_batch, declarations, parse_amount, write_results};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Community tax (cedula) calculator.
///
/// Loads a fee schedule from a TOML settings file and an optional CSV
/// bracket table, then validates it or computes the tax due.
#[derive(Debug, Parser)]
#[command(name = "cedula")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check a fee schedule without computing anything.
    Validate {
        #[command(flatten)]
        schedule: ScheduleArgs,

        /// Also check the schedule is usable with this method.
        #[arg(short, long, value_enum)]
        method: Option<Method>,
    },

    /// Compute the tax due for a single declaration.
    Compute {
        #[command(flatten)]
        schedule: ScheduleArgs,

        #[arg(short, long, value_enum)]
        method: Method,

        /// Gross annual income, e.g. `25000` or `"₱25,000.00"`.
        #[arg(short, long, allow_hyphen_values = true)]
        income: String,

        /// The taxpayer is a senior citizen.
        #[arg(long)]
        senior: bool,

        /// The taxpayer is a person with disability.
        #[arg(long)]
        pwd: bool,

        /// The taxpayer is a student.
        #[arg(long)]
        student: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Compute a CSV file of declarations and write a CSV of results.
    Batch {
        #[command(flatten)]
        schedule: ScheduleArgs,

        #[arg(short, long, value_enum)]
        method: Method,

        /// CSV file with `income` and optional `reference`,
        /// `senior_citizen`, `pwd`, `student` columns.
        #[arg(short, long)]
        declarations: PathBuf,

        /// Where to write the results; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct ScheduleArgs {
    /// Path to the TOML fee schedule settings
    #[arg(short, long)]
    schedule: PathBuf,

    /// Path to a CSV bracket table (`min,max,rate`), replacing any brackets
    /// in the settings file
    #[arg(short, long)]
    brackets: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    /// Basic tax plus stepped tax per ₱1,000 of income
    Basic,
    /// Flat fee from the bracket table
    Bracket,
}

impl From<Method> for ComputationMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Basic => ComputationMethod::BasicPlusMarginal,
            Method::Bracket => ComputationMethod::BracketTable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Toml,
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info` so normal runs are quiet.
/// * Writes to stderr so results on stdout stay machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

// ─── schedule session ────────────────────────────────────────────────────────

/// Loads the schedule files, publishes them to an in-memory store and returns
/// the snapshot computations run against.
async fn load_snapshot(
    repo: &InMemoryScheduleRepository,
    args: &ScheduleArgs,
) -> Result<ScheduleSnapshot> {
    let schedule = ScheduleLoader::load_files(&args.schedule, args.brackets.as_deref())
        .with_context(|| format!("Failed to load fee schedule: {}", args.schedule.display()))?;

    let name = args
        .schedule
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "schedule".to_string());

    repo.publish(&name, schedule)
        .await
        .with_context(|| format!("Failed to publish fee schedule '{name}'"))?;
    Ok(repo.snapshot(&name).await?)
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let repo = InMemoryScheduleRepository::new();

    match cli.command {
        Command::Validate { schedule, method } => {
            let snapshot = load_snapshot(&repo, &schedule).await?;
            if let Some(method) = method {
                snapshot
                    .schedule
                    .validate_for(method.into())
                    .with_context(|| format!("Schedule is not usable with {method:?}"))?;
            }
            if !snapshot.schedule.active {
                info!("schedule is valid but inactive; computations will be refused");
            }
            println!(
                "Fee schedule '{}' is valid ({} brackets).",
                snapshot.name,
                snapshot.schedule.brackets.len()
            );
        }

        Command::Compute {
            schedule,
            method,
            income,
            senior,
            pwd,
            student,
            format,
        } => {
            let snapshot = load_snapshot(&repo, &schedule).await?;
            let declaration = TaxpayerDeclaration {
                gross_annual_income: parse_amount(&income)
                    .with_context(|| format!("Invalid income: {income}"))?,
                is_senior_citizen: senior,
                is_pwd: pwd,
                is_student: student,
            };
            debug!(?declaration, "computing");

            let result = compute(method.into(), &snapshot.schedule, &declaration)
                .context("Failed to compute community tax")?;

            match format {
                OutputFormat::Text => println!("{result}"),
                OutputFormat::Toml => print!(
                    "{}",
                    toml::to_string(&result).context("Failed to serialize result")?
                ),
            }
        }

        Command::Batch {
            schedule,
            method,
            declarations: path,
            output,
        } => {
            let snapshot = load_snapshot(&repo, &schedule).await?;
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to open: {}", path.display()))?;
            let rows = declarations::load_from_str(&contents)
                .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
            if rows.is_empty() {
                bail!("No declarations found in {}", path.display());
            }

            let outcomes = compute_batch(method.into(), &snapshot.schedule, rows)
                .context("Fee schedule cannot be used for this batch")?;

            match output {
                Some(out) => {
                    let file = File::create(&out)
                        .with_context(|| format!("Failed to create: {}", out.display()))?;
                    write_results(file, &outcomes).context("Failed to write results")?;
                    info!(path = %out.display(), rows = outcomes.len(), "results written");
                }
                None => write_results(io::stdout().lock(), &outcomes)
                    .context("Failed to write results")?,
            }
        }
    }

    Ok(())
}

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use sheetcheck_core::{MissingTypePolicy, Schema};
use sheetcheck_validator::{save_annotated, Annotator, Reporter, Table, TableValidator};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sheetcheck")]
#[command(version, about = "Checks .xlsx tables against a JSON column schema", long_about = None)]
struct Cli {
    /// .xlsx file that needs to be checked
    table: PathBuf,

    /// .json structure file
    structure: PathBuf,

    /// Name of the sheet (defaults to the first sheet)
    #[arg(short, long)]
    sheet: Option<String>,

    /// Write an annotated copy of the table to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Don't print skipped columns
    #[arg(long)]
    hide_skipped: bool,

    /// Don't print columns without violations
    #[arg(long)]
    hide_ok: bool,

    /// Treat a missing 'type' key as an error instead of skipping the column
    #[arg(long)]
    strict: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    check_extension(&cli.table, "xlsx", "Table file")?;
    check_extension(&cli.structure, "json", "Structure file")?;
    if let Some(output) = &cli.output {
        check_extension(output, "xlsx", "Output file")?;
        if output == &cli.table {
            bail!(
                "Output path '{}' would overwrite the input table",
                output.display()
            );
        }
    }

    info!("Loading structure file {}", display_name(&cli.structure));
    let raw = fs::read_to_string(&cli.structure).with_context(|| {
        format!(
            "Could not read structure file '{}'",
            cli.structure.display()
        )
    })?;
    let policy = if cli.strict {
        MissingTypePolicy::Strict
    } else {
        MissingTypePolicy::WarnAndSkip
    };
    let schema = Schema::from_json_str(&raw, policy)?;

    info!("Loading excel file {}", display_name(&cli.table));
    let table = Table::load(&cli.table, cli.sheet.as_deref())?;
    info!("Loaded file with {} data rows", table.rows().len());

    let validator = TableValidator::new(schema)?;

    let mut annotator = cli.output.as_ref().map(|_| Annotator::new());
    let outcome = match annotator.as_mut() {
        Some(annotator) => validator.validate_with_annotator(&table, annotator)?,
        None => validator.validate(&table)?,
    };

    let reporter = Reporter::new()
        .hide_skipped(cli.hide_skipped)
        .hide_ok(cli.hide_ok);
    print!("{}", reporter.render(validator.schema(), &outcome));

    if let (Some(output), Some(annotator)) = (&cli.output, &annotator) {
        save_annotated(&table, annotator, output)?;
        println!(
            "{} Annotated copy written to {} ({} cell(s) marked)",
            "✓".green().bold(),
            output.display(),
            annotator.len()
        );
    }

    Ok(())
}

/// Rejects a path whose extension is not `expected`.
fn check_extension(path: &Path, expected: &str, label: &str) -> Result<()> {
    let matches = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case(expected))
        .unwrap_or(false);
    if !matches {
        bail!("{} must be of type '.{}': {}", label, expected, path.display());
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

//! Ingest integrity CLI
//!
//! The `ingest` command runs distributed-object integrity checks over a
//! package manifest and inspects the severity catalogs.
//!
//! ## Commands
//!
//! - `check`: Check every distributed object of a package
//! - `catalog`: List the severe elements of one or all categories

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{info, Level};

use ingest_core::obs::BatchSpan;
use ingest_core::{
    BatchExecutor, BatchReport, IntegrityTaskGenerator, ParallelConfig, SevereCategory,
    SevereElement, METRICS,
};
use ingest_state::fakes::MemoryConflictRecorder;
use ingest_state::{ConflictRecord, ConflictRecorder, PackageManifest};

#[derive(Parser)]
#[command(name = "ingest")]
#[command(author = "Stevedores Org")]
#[command(version = ingest_core::VERSION)]
#[command(about = "Integrity checks for archive ingest packages", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true, env = "INGEST_LOG_JSON")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check preservation-level integrity of every distributed object
    Check {
        /// Package manifest (JSON)
        #[arg(short, long, env = "INGEST_MANIFEST")]
        manifest: PathBuf,

        /// Number of objects checked concurrently
        #[arg(
            short,
            long,
            env = "INGEST_CONCURRENCY",
            default_value = "1",
            value_parser = clap::value_parser!(u16).range(1..)
        )]
        concurrency: u16,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List severe elements
    Catalog {
        /// Only this category
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CategoryArg {
    Anomaly,
    Inhibitor,
    Limitation,
    MetadataConflict,
    PresLevelConflict,
    Quirk,
}

impl From<CategoryArg> for SevereCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Anomaly => SevereCategory::Anomaly,
            CategoryArg::Inhibitor => SevereCategory::Inhibitor,
            CategoryArg::Limitation => SevereCategory::Limitation,
            CategoryArg::MetadataConflict => SevereCategory::MetadataConflict,
            CategoryArg::PresLevelConflict => SevereCategory::PresLevelConflict,
            CategoryArg::Quirk => SevereCategory::Quirk,
        }
    }
}

/// Outcome of `ingest check` for one package.
#[derive(Debug, Serialize)]
struct CheckSummary {
    package_id: String,
    files: usize,
    report: BatchReport,
    conflicts: Vec<ConflictRecord>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    ingest_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Check {
            manifest,
            concurrency,
            format,
        } => cmd_check(&manifest, concurrency, format).await,
        Commands::Catalog { category, format } => {
            cmd_catalog(category.map(SevereCategory::from), format)
        }
    }
}

async fn cmd_check(manifest: &Path, concurrency: u16, format: OutputFormat) -> Result<()> {
    let summary = run_check(manifest, concurrency).await?;
    METRICS.flush();

    let _span = BatchSpan::enter(&summary.report.batch_id);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => print!("{}", render_summary(&summary)),
    }
    info!(
        package_id = %summary.package_id,
        conflicts = summary.conflicts.len(),
        "check complete"
    );
    Ok(())
}

/// Load `manifest`, check every distributed object and collect the
/// conflicts recorded along the way.
async fn run_check(manifest: &Path, concurrency: u16) -> Result<CheckSummary> {
    let manifest = PackageManifest::load(manifest)
        .await
        .with_context(|| format!("Failed to load manifest {}", manifest.display()))?;
    let package_id = manifest.package_id.clone();
    let files = manifest.files.len();

    let store = Arc::new(manifest.into_store());
    let recorder = Arc::new(MemoryConflictRecorder::new());
    let generator = IntegrityTaskGenerator::from_store(store, recorder.clone())
        .await
        .context("Failed to prepare integrity checks")?;

    let executor = BatchExecutor::new();
    let report = if concurrency > 1 {
        executor
            .run_parallel(
                generator,
                ParallelConfig {
                    max_concurrent: usize::from(concurrency),
                },
            )
            .await
    } else {
        executor.run(generator).await
    }
    .with_context(|| format!("Integrity batch aborted for package {}", package_id))?;

    let mut conflicts = recorder.list_conflicts().await?;
    conflicts.sort_by(|a, b| a.file_id.cmp(&b.file_id));

    Ok(CheckSummary {
        package_id,
        files,
        report,
        conflicts,
    })
}

fn render_summary(summary: &CheckSummary) -> String {
    let mut out = format!(
        "Package {}: {} files, {} objects checked, {} flagged ({} ms)\n",
        summary.package_id,
        summary.files,
        summary.report.performed,
        summary.report.flagged,
        summary.report.duration_ms,
    );
    if summary.report.package_errors > 0 {
        out.push_str(&format!(
            "  {} objects skipped after package errors\n",
            summary.report.package_errors
        ));
    }
    for conflict in &summary.conflicts {
        out.push_str(&format!("  {}  {}\n", conflict.file_id, conflict.code));
    }
    out
}

fn cmd_catalog(category: Option<SevereCategory>, format: OutputFormat) -> Result<()> {
    let elements = catalog_entries(category)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&elements)?),
        OutputFormat::Text => {
            for (category, element) in &elements {
                println!(
                    "{:<20} {:<32} {:<7} {}",
                    category.label(),
                    element.name,
                    element.severity,
                    element.description
                );
            }
        }
    }
    Ok(())
}

fn catalog_entries(
    category: Option<SevereCategory>,
) -> Result<Vec<(SevereCategory, SevereElement)>> {
    let categories = match category {
        Some(c) => vec![c],
        None => SevereCategory::ALL.to_vec(),
    };
    let mut entries = Vec::new();
    for category in categories {
        let catalog = category
            .catalog()
            .with_context(|| format!("Failed to build {} catalog", category))?;
        entries.extend(catalog.snapshot().into_iter().map(|e| (category, e)));
    }
    Ok(entries)
}

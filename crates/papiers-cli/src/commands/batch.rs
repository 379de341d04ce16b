//! Batch processing command for multiple documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use papiers_core::models::config::PapiersConfig;
use papiers_core::{ExtractionEngine, ExtractionError, ExtractionResult};

use crate::ocr::SourceKind;
use crate::output::{self, OutputFormat};

use super::{build_engine, extract_file, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of input files
    #[arg(required = true)]
    input: String,

    /// Output directory (default: the configured watch output folder)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "xml")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// What happened to one input file.
enum Outcome {
    Extracted(ExtractionResult),
    Unrecognized,
    Failed(String),
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    outcome: Outcome,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file() && SourceKind::from_path(p).is_some())
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.watch.output_dir.clone());
    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let results = extract_all(files, &config, &args, &pb).await?;
    pb.finish_and_clear();

    for result in &results {
        if let Outcome::Extracted(extraction) = &result.outcome {
            let path = output::output_path(
                &output_dir,
                &result.path,
                extraction.document_type,
                args.format,
            );
            fs::write(&path, output::render(&extraction.record, args.format)?)?;
            debug!("Wrote output to {}", path.display());
        }
    }

    if args.summary {
        let summary_path = output_dir.join("summary.csv");
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let extracted = results
        .iter()
        .filter(|r| matches!(r.outcome, Outcome::Extracted(_)))
        .count();
    let skipped: Vec<_> = results
        .iter()
        .filter(|r| !matches!(r.outcome, Outcome::Extracted(_)))
        .collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} extracted, {} skipped",
        style(extracted).green(),
        style(skipped.len()).red()
    );

    if !skipped.is_empty() {
        println!();
        println!("{}", style("Skipped files:").red());
        for result in &skipped {
            println!("  - {}: {}", result.path.display(), result.status_detail());
        }
    }

    Ok(())
}

/// Extract every file on a bounded pool of blocking workers.
///
/// Results come back in input order.
async fn extract_all(
    files: Vec<PathBuf>,
    config: &PapiersConfig,
    args: &BatchArgs,
    pb: &ProgressBar,
) -> anyhow::Result<Vec<FileResult>> {
    let engine = Arc::new(build_engine(config));
    let config = Arc::new(config.clone());
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.into_iter().enumerate() {
        let permit = semaphore.clone().acquire_owned().await?;
        let engine = engine.clone();
        let config = config.clone();
        tasks.spawn_blocking(move || {
            let result = process_one(path, &engine, &config);
            drop(permit);
            (index, result)
        });
    }

    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined?;
        pb.inc(1);

        if let Outcome::Failed(message) = &result.outcome {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), message);
            } else {
                error!("Failed to process {}: {}", result.path.display(), message);
                tasks.abort_all();
                anyhow::bail!("Processing failed: {}", message);
            }
        }

        results.push((index, result));
    }

    results.sort_by_key(|(index, _)| *index);
    Ok(results.into_iter().map(|(_, r)| r).collect())
}

fn process_one(path: PathBuf, engine: &ExtractionEngine, config: &PapiersConfig) -> FileResult {
    let start = Instant::now();

    let outcome = match extract_file(&path, engine, config) {
        Ok(result) => Outcome::Extracted(result),
        Err(e) if e.downcast_ref::<ExtractionError>() == Some(&ExtractionError::UnrecognizedDocument) => {
            warn!("{}: {}", path.display(), ExtractionError::UnrecognizedDocument);
            Outcome::Unrecognized
        }
        Err(e) => Outcome::Failed(format!("{:#}", e)),
    };

    FileResult {
        path,
        outcome,
        processing_time_ms: start.elapsed().as_millis() as u64,
    }
}

impl FileResult {
    fn status(&self) -> &'static str {
        match self.outcome {
            Outcome::Extracted(_) => "success",
            Outcome::Unrecognized => "unrecognized",
            Outcome::Failed(_) => "error",
        }
    }

    fn status_detail(&self) -> String {
        match &self.outcome {
            Outcome::Extracted(_) => String::new(),
            Outcome::Unrecognized => ExtractionError::UnrecognizedDocument.to_string(),
            Outcome::Failed(message) => message.clone(),
        }
    }
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "document_type",
        "last_name",
        "first_name",
        "missing_fields",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let processing_time = result.processing_time_ms.to_string();

        if let Outcome::Extracted(extraction) = &result.outcome {
            wtr.write_record([
                filename,
                result.status(),
                extraction.document_type.as_str(),
                extraction.record.last_name().unwrap_or(papiers_core::UNKNOWN),
                extraction.record.first_name().unwrap_or(papiers_core::UNKNOWN),
                &extraction.missing_fields.join(";"),
                &processing_time,
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                result.status(),
                "",
                "",
                "",
                "",
                &processing_time,
                &result.status_detail(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

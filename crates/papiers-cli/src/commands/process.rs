//! Process command - extract a record from a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::output::{self, OutputFormat};

use super::{build_engine, extract_file, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (text, PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// List the fields that could not be extracted
    #[arg(long)]
    show_missing: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message("Extracting...");

    let engine = build_engine(&config);
    let result = extract_file(&args.input, &engine, &config);
    pb.finish_and_clear();
    let result = result?;

    let rendered = output::render(&result.record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &rendered)?;
        println!(
            "{} {} written to {}",
            style("✓").green(),
            result.document_type,
            output_path.display()
        );
    } else {
        println!("{}", rendered);
    }

    if args.show_missing {
        eprintln!();
        if result.missing_fields.is_empty() {
            eprintln!("{} All fields extracted", style("ℹ").blue());
        } else {
            eprintln!(
                "{} Missing fields: {}",
                style("ℹ").blue(),
                result.missing_fields.join(", ")
            );
        }
        eprintln!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            result.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

//! Watch command - poll folders and extract every new document.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use console::style;
use tracing::{debug, info, warn};

use papiers_core::models::config::{PapiersConfig, WatchConfig};
use papiers_core::ExtractionError;

use crate::output::{self, OutputFormat};

use super::{build_engine, extract_file, load_config};

/// Arguments for the watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Folders to watch (default: the configured folders)
    folders: Vec<PathBuf>,

    /// Output directory (default: the configured output folder)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "xml")]
    format: OutputFormat,

    /// Seconds between two scans (default: the configured interval)
    #[arg(short, long)]
    interval: Option<u64>,

    /// Scan once and exit
    #[arg(long)]
    once: bool,
}

pub async fn run(args: WatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if !args.folders.is_empty() {
        config.watch.folders = args.folders.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.watch.output_dir = dir.clone();
    }
    if let Some(secs) = args.interval {
        config.watch.poll_interval_secs = secs;
    }

    if config.watch.folders.is_empty() {
        anyhow::bail!("No folder to watch. Pass folders or set watch.folders in the config.");
    }
    fs::create_dir_all(&config.watch.output_dir)?;

    println!(
        "{} Watching {} folder(s), writing to {}",
        style("ℹ").blue(),
        config.watch.folders.len(),
        config.watch.output_dir.display()
    );

    let engine = Arc::new(build_engine(&config));
    let config = Arc::new(config);

    // Owned by this loop only
    let mut processed: HashSet<PathBuf> = HashSet::new();

    let mut ticker =
        tokio::time::interval(Duration::from_secs(config.watch.poll_interval_secs.max(1)));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for path in scan(&config.watch) {
                    if !processed.insert(path.clone()) {
                        continue;
                    }

                    let engine = engine.clone();
                    let task_config = config.clone();
                    let task_path = path.clone();
                    let result = tokio::task::spawn_blocking(move || {
                        extract_file(&task_path, &engine, &task_config)
                    })
                    .await?;

                    handle(&path, result, &config, args.format);
                }

                if args.once {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                info!("Interrupted, stopping watch");
                break;
            }
        }
    }

    println!(
        "{} Processed {} file(s)",
        style("✓").green(),
        processed.len()
    );
    Ok(())
}

/// Accepted files currently in the watched folders, sorted.
fn scan(watch: &WatchConfig) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for folder in &watch.folders {
        let entries = match fs::read_dir(folder) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot read {}: {}", folder.display(), e);
                continue;
            }
        };

        found.extend(
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_file() && watch.accepts(p)),
        );
    }

    found.sort();
    found
}

fn handle(
    path: &Path,
    result: anyhow::Result<papiers_core::ExtractionResult>,
    config: &PapiersConfig,
    format: OutputFormat,
) {
    let extraction = match result {
        Ok(extraction) => extraction,
        Err(e) if e.downcast_ref::<ExtractionError>() == Some(&ExtractionError::UnrecognizedDocument) => {
            println!(
                "{} {}: {}",
                style("✗").yellow(),
                path.display(),
                ExtractionError::UnrecognizedDocument
            );
            return;
        }
        Err(e) => {
            warn!("Failed to process {}: {:#}", path.display(), e);
            return;
        }
    };

    let out = output::output_path(&config.watch.output_dir, path, extraction.document_type, format);
    let written = output::render(&extraction.record, format)
        .and_then(|content| Ok(fs::write(&out, content)?));

    match written {
        Ok(()) => {
            debug!("Wrote output to {}", out.display());
            println!(
                "{} {} -> {}",
                style("✓").green(),
                path.display(),
                out.display()
            );
        }
        Err(e) => warn!("Failed to write {}: {:#}", out.display(), e),
    }
}

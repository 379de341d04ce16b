//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod process;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing::debug;

use papiers_core::models::config::PapiersConfig;
use papiers_core::{ner, ExtractionEngine, ExtractionResult, RecognizerError};

use crate::ner::CommandRecognizer;
use crate::ocr;

/// `<config_dir>/papiers/config.json`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("papiers")
        .join("config.json")
}

/// Load the configuration: the explicit path if given, else the default
/// file when it exists, else built-in defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<PapiersConfig> {
    if let Some(path) = path {
        return PapiersConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path));
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        return Ok(PapiersConfig::from_file(&default_path)?);
    }

    Ok(PapiersConfig::default())
}

/// Build the engine, installing the configured recognizer as the shared one.
pub fn build_engine(config: &PapiersConfig) -> ExtractionEngine {
    if let Some(recognizer) = CommandRecognizer::from_argv(&config.ner.command) {
        match ner::initialize(Arc::new(recognizer)) {
            Ok(()) => debug!("Installed recognizer command {:?}", config.ner.command),
            Err(RecognizerError::AlreadyInitialized) => debug!("Recognizer already installed"),
            Err(e) => debug!("Recognizer not installed: {}", e),
        }
    }

    ExtractionEngine::with_config(config.extraction.clone())
}

/// Acquire the text of one file and extract its record.
pub fn extract_file(
    path: &Path,
    engine: &ExtractionEngine,
    config: &PapiersConfig,
) -> anyhow::Result<ExtractionResult> {
    let text = ocr::acquire_text(path, &config.ocr)?;
    let result = engine
        .extract(&text)
        .with_context(|| format!("{}", path.display()))?;
    Ok(result)
}

//! Text acquisition: plain text, PDF text layer or external OCR.

use std::fs;
use std::path::Path;
use std::process::Command;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use tracing::{debug, info};

use papiers_core::models::config::OcrConfig;

/// How a file's text is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Pre-extracted text, read as-is.
    Text,
    /// PDF with an embedded text layer.
    Pdf,
    /// Scanned image handed to the OCR command.
    Image,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "txt" => Some(Self::Text),
            "pdf" => Some(Self::Pdf),
            "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp" => Some(Self::Image),
            _ => None,
        }
    }
}

/// Wait until `path` can be opened and its size holds still for one poll.
///
/// Files dropped into a watched folder may still be in the middle of a copy.
/// An empty file that stays empty is ready: it is a blank document.
pub fn wait_until_ready(path: &Path, config: &OcrConfig) -> anyhow::Result<()> {
    let timeout = Duration::from_secs(config.ready_timeout_secs);
    let poll = Duration::from_millis(config.ready_poll_ms.max(1));
    let start = Instant::now();
    let mut last_size: Option<u64> = None;

    loop {
        let size = fs::File::open(path)
            .and_then(|f| f.metadata())
            .map(|m| m.len())
            .ok();
        match (size, last_size) {
            (Some(now), Some(before)) if now == before => return Ok(()),
            _ => {}
        }
        // A first successful read always gets one more poll
        if (size.is_none() || last_size.is_some()) && start.elapsed() >= timeout {
            bail!(
                "File not readable after {}s: {}",
                config.ready_timeout_secs,
                path.display()
            );
        }
        last_size = size;
        thread::sleep(poll);
    }
}

/// Read the text of a document, running OCR for images.
pub fn acquire_text(path: &Path, config: &OcrConfig) -> anyhow::Result<String> {
    let Some(kind) = SourceKind::from_path(path) else {
        bail!("Unsupported file format: {}", path.display());
    };

    wait_until_ready(path, config)?;
    info!("Reading {} as {:?}", path.display(), kind);

    let text = match kind {
        SourceKind::Text => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        SourceKind::Pdf => {
            let data = fs::read(path)?;
            pdf_extract::extract_text_from_mem(&data)
                .map_err(|e| anyhow::anyhow!("PDF text extraction failed: {}", e))?
        }
        SourceKind::Image => run_ocr(path, config)?,
    };

    debug!("Acquired {} characters from {}", text.len(), path.display());
    Ok(text)
}

/// `<command> <file> stdout -l <language>`
fn run_ocr(path: &Path, config: &OcrConfig) -> anyhow::Result<String> {
    let output = Command::new(&config.command)
        .arg(path)
        .arg("stdout")
        .arg("-l")
        .arg(&config.language)
        .output()
        .with_context(|| format!("Failed to start OCR command '{}'", config.command))?;

    if !output.status.success() {
        bail!(
            "OCR failed on {} ({}): {}",
            path.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

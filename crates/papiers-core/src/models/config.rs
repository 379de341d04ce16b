//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for papiers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PapiersConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// External OCR configuration.
    pub ocr: OcrConfig,

    /// External entity recognizer configuration.
    pub ner: NerConfig,

    /// Folder watch configuration.
    pub watch: WatchConfig,
}

/// Extraction thresholds and vocabularies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Identity card markers needed to classify a document as an identity card.
    pub identity_threshold: usize,

    /// Résumé markers needed to classify a document as a résumé.
    pub resume_threshold: usize,

    /// Earliest plausible birth year.
    pub birth_year_min: i32,

    /// Latest plausible birth year.
    pub birth_year_max: i32,

    /// Number of leading lines handed to the recognizer on résumés.
    pub name_scan_lines: usize,

    /// Section blocks this short (in characters) are discarded as noise.
    pub min_block_chars: usize,

    /// Skills recognized in addition to the built-in vocabulary.
    pub extra_skills: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            identity_threshold: 3,
            resume_threshold: 3,
            birth_year_min: 1900,
            birth_year_max: 2010,
            name_scan_lines: 5,
            min_block_chars: 3,
            extra_skills: Vec::new(),
        }
    }
}

/// External OCR command configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// OCR executable, invoked as `<command> <file> stdout -l <language>`.
    pub command: String,

    /// OCR language pack.
    pub language: String,

    /// How long to wait for a new file to become readable, in seconds.
    pub ready_timeout_secs: u64,

    /// Delay between readability checks, in milliseconds.
    pub ready_poll_ms: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            language: "fra".to_string(),
            ready_timeout_secs: 10,
            ready_poll_ms: 500,
        }
    }
}

/// External named-entity recognizer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NerConfig {
    /// Command line of a recognizer reading text on stdin and printing a
    /// JSON array of `{"text", "label"}` objects. Empty disables recognition.
    pub command: Vec<String>,
}

/// Polling watch loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Folders scanned on every tick.
    pub folders: Vec<PathBuf>,

    /// Folder receiving the serialized records.
    pub output_dir: PathBuf,

    /// Seconds between two scans.
    pub poll_interval_secs: u64,

    /// Accepted file extensions, lowercase without the dot.
    pub extensions: Vec<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            folders: Vec::new(),
            output_dir: PathBuf::from("xml"),
            poll_interval_secs: 5,
            extensions: ["jpg", "jpeg", "png", "pdf", "txt"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl WatchConfig {
    /// Whether a path has one of the accepted extensions.
    pub fn accepts(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .is_some_and(|e| self.extensions.iter().any(|x| *x == e))
    }
}

impl PapiersConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PapiersConfig =
            serde_json::from_str(r#"{"extraction": {"identity_threshold": 4}}"#).unwrap();
        assert_eq!(config.extraction.identity_threshold, 4);
        assert_eq!(config.extraction.resume_threshold, 3);
        assert_eq!(config.ocr.command, "tesseract");
        assert_eq!(config.watch.poll_interval_secs, 5);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PapiersConfig::default();
        config.extraction.extra_skills.push("rust".to_string());
        config.save(&path).unwrap();

        let loaded = PapiersConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.extra_skills, vec!["rust".to_string()]);
    }

    #[test]
    fn test_watch_accepts_extensions() {
        let watch = WatchConfig::default();
        assert!(watch.accepts(Path::new("scan/CARTE.JPG")));
        assert!(watch.accepts(Path::new("cv.pdf")));
        assert!(!watch.accepts(Path::new("notes.docx")));
        assert!(!watch.accepts(Path::new("README")));
    }
}

//! Extraction engine: normalize, classify, segment, then run the field
//! extractors for the detected document type.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::classify::{DocumentClassifier, DocumentType};
use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::record::{ExtractionRecord, IdentityCardRecord, ResumeRecord};
use crate::ner::{self, EntityRecognizer};
use crate::normalize::{normalize, NormalizedText};
use crate::segment::{Block, Section, SectionSegmenter};

use super::rules::{
    extract_address, extract_birth_place, extract_card_number, extract_email,
    extract_expiration_date, extract_languages, extract_phone, extract_sex, DateExtractor,
    DateLabel, FieldExtractor, NameExtractor, NameLayout, SkillExtractor,
};

/// Result of extracting one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Detected document type, never `Unknown`.
    pub document_type: DocumentType,
    /// Extracted record.
    pub record: ExtractionRecord,
    /// Record fields left at their sentinel or empty value.
    pub missing_fields: Vec<&'static str>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Orchestrates one extraction from raw OCR text.
///
/// Holds no per-document state: the same engine may be shared across
/// threads and called concurrently.
pub struct ExtractionEngine {
    config: ExtractionConfig,
    recognizer: Arc<dyn EntityRecognizer>,
    classifier: DocumentClassifier,
    segmenter: SectionSegmenter,
    skills: SkillExtractor,
}

impl ExtractionEngine {
    /// Engine with default settings and the shared recognizer.
    pub fn new() -> Self {
        Self::with_config(ExtractionConfig::default())
    }

    pub fn with_config(config: ExtractionConfig) -> Self {
        Self {
            classifier: DocumentClassifier::from_config(&config),
            segmenter: SectionSegmenter::from_config(&config),
            skills: SkillExtractor::with_extra(&config.extra_skills),
            recognizer: ner::instance(),
            config,
        }
    }

    /// Use `recognizer` instead of the shared instance.
    pub fn with_recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.recognizer = recognizer;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Classify raw text without extracting fields.
    pub fn classify(&self, raw: &str) -> DocumentType {
        self.classifier.classify(normalize(raw).text())
    }

    /// Extract a record from raw OCR text.
    pub fn extract(&self, raw: &str) -> Result<ExtractionResult, ExtractionError> {
        let start = stopwatch();

        // Blank text reaches the classifier and comes out Unknown
        let doc = normalize(raw);

        let document_type = self.classifier.classify(doc.text());
        let record = match document_type {
            DocumentType::IdentityCard => {
                ExtractionRecord::IdentityCard(self.extract_identity_card(&doc))
            }
            DocumentType::Resume => ExtractionRecord::Resume(self.extract_resume(&doc)),
            DocumentType::Unknown => {
                debug!("No document type reached its marker threshold");
                return Err(ExtractionError::UnrecognizedDocument);
            }
        };

        let missing_fields = record.missing_fields();
        let processing_time_ms = start
            .map(|s| s.elapsed().as_millis() as u64)
            .unwrap_or(0);

        info!(
            "Extracted {} with {} missing fields in {}ms",
            document_type,
            missing_fields.len(),
            processing_time_ms
        );

        Ok(ExtractionResult {
            document_type,
            record,
            missing_fields,
            processing_time_ms,
        })
    }

    fn extract_identity_card(&self, doc: &NormalizedText) -> IdentityCardRecord {
        let mut record = IdentityCardRecord::default();

        let name = NameExtractor::new(self.recognizer.clone(), NameLayout::IdentityCard).extract(doc);
        fill(&mut record.last_name, name.last_name);
        fill(&mut record.first_name, name.first_name);

        fill(&mut record.birth_date, self.birth_date(doc));
        fill(&mut record.card_number, extract_card_number(doc));
        fill(&mut record.birth_place, extract_birth_place(doc));
        record.sex = extract_sex(doc);
        fill(&mut record.address, extract_address(doc));
        fill(&mut record.expiration_date, extract_expiration_date(doc));

        debug!("Identity card record: {:?}", record);
        record
    }

    fn extract_resume(&self, doc: &NormalizedText) -> ResumeRecord {
        let mut record = ResumeRecord::default();

        let layout = NameLayout::Resume {
            scan_lines: self.config.name_scan_lines,
        };
        let name = NameExtractor::new(self.recognizer.clone(), layout).extract(doc);
        fill(&mut record.last_name, name.last_name);
        fill(&mut record.first_name, name.first_name);

        fill(&mut record.birth_date, self.birth_date(doc));
        fill(&mut record.email, extract_email(doc));
        fill(&mut record.phone, extract_phone(doc));
        fill(&mut record.address, extract_address(doc));

        record.skills = self.skills.skills_in(doc.text());

        let blocks = self.segmenter.segment(doc);
        debug!("Segmented {} section blocks", blocks.len());
        record.languages = extract_languages(&blocks);
        record.experiences = block_lines(&blocks, Section::Experience);
        record.educations = block_lines(&blocks, Section::Education);

        debug!("Résumé record: {:?}", record);
        record
    }

    fn birth_date(&self, doc: &NormalizedText) -> Option<chrono::NaiveDate> {
        DateExtractor::new(DateLabel::Birth)
            .with_years(self.config.birth_year_min..=self.config.birth_year_max)
            .extract(doc)
            .map(|m| m.value)
    }
}

impl Default for ExtractionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// std has no clock on wasm32-unknown-unknown.
fn stopwatch() -> Option<Instant> {
    (!cfg!(target_arch = "wasm32")).then(Instant::now)
}

/// Set `slot` only when it is still empty and a value was found.
fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}

/// Lines of every block of `section`, in document order.
fn block_lines(blocks: &[Block], section: Section) -> Vec<String> {
    blocks
        .iter()
        .filter(|b| b.section == section)
        .flat_map(|b| b.lines.iter().cloned())
        .collect()
}

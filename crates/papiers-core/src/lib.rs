//! Core library for French identity card and résumé extraction.
//!
//! This crate provides:
//! - OCR text normalization into a canonical line sequence
//! - Document classification (identity card, résumé, unknown)
//! - Line-oriented section segmentation for résumés
//! - Rule-based field extraction (names, dates, contact data, skills, languages)
//! - A person-name recognizer seam for an external NER model

pub mod classify;
pub mod error;
pub mod extract;
pub mod models;
pub mod ner;
pub mod normalize;
pub mod segment;

pub use classify::{DocumentClassifier, DocumentType};
pub use error::{ExtractionError, PapiersError, RecognizerError, Result};
pub use extract::{ExtractionEngine, ExtractionResult};
pub use models::record::{
    ExtractionRecord, IdentityCardRecord, LanguageProficiency, Proficiency, ResumeRecord, Sex,
    UNKNOWN,
};
pub use ner::{Entity, EntityRecognizer, NoopRecognizer, ScriptedRecognizer};
pub use normalize::{normalize, NormalizedText};
pub use segment::{Block, Section, SectionSegmenter};

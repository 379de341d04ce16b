//! Email and phone extraction.

use super::patterns::{EMAIL, PHONE};
use super::{ExtractionMatch, FieldExtractor};
use crate::normalize::NormalizedText;

/// Email field extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailExtractor;

impl FieldExtractor for EmailExtractor {
    type Output = ExtractionMatch<String>;

    fn extract_all(&self, doc: &NormalizedText) -> Vec<Self::Output> {
        EMAIL
            .find_iter(doc.text())
            .map(|m| {
                ExtractionMatch::new(m.as_str().to_string(), m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// French phone number extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneExtractor;

impl FieldExtractor for PhoneExtractor {
    type Output = ExtractionMatch<String>;

    fn extract_all(&self, doc: &NormalizedText) -> Vec<Self::Output> {
        PHONE
            .find_iter(doc.text())
            .map(|m| {
                ExtractionMatch::new(normalize_phone(m.as_str()), m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// Extract the first email address.
pub fn extract_email(doc: &NormalizedText) -> Option<String> {
    EmailExtractor.extract(doc).map(|m| m.value)
}

/// Extract the first phone number, normalized.
pub fn extract_phone(doc: &NormalizedText) -> Option<String> {
    PhoneExtractor.extract(doc).map(|m| m.value)
}

/// Keep digits only, plus a `+` when it is the first character.
pub fn normalize_phone(raw: &str) -> String {
    let raw = raw.trim();
    let mut phone = String::with_capacity(raw.len());
    if raw.starts_with('+') {
        phone.push('+');
    }
    phone.extend(raw.chars().filter(|c| c.is_ascii_digit()));
    phone
}

//! Rule-based field extractors for identity cards and résumés.

pub mod address;
pub mod contact;
pub mod dates;
pub mod identity;
pub mod languages;
pub mod names;
pub mod patterns;
pub mod skills;

pub use address::{extract_address, AddressExtractor};
pub use contact::{extract_email, extract_phone, normalize_phone, EmailExtractor, PhoneExtractor};
pub use dates::{extract_birth_date, extract_expiration_date, DateExtractor, DateLabel};
pub use identity::{
    extract_birth_place, extract_card_number, extract_sex, BirthPlaceExtractor,
    CardNumberExtractor, SexExtractor,
};
pub use languages::{extract_languages, LanguageExtractor};
pub use names::{NameExtractor, NameLayout, PersonName};
pub use skills::{extract_skills, SkillExtractor};

use crate::normalize::NormalizedText;

/// Trait for field extractors.
///
/// Extractors are pure: the same normalized text always yields the same
/// value, and a missing field is `None`, never an error.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field.
    fn extract(&self, doc: &NormalizedText) -> Option<Self::Output> {
        self.extract_all(doc).into_iter().next()
    }

    /// Extract all occurrences of the field, in document order.
    fn extract_all(&self, doc: &NormalizedText) -> Vec<Self::Output>;
}

/// An extracted value with the text it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Source text that was matched.
    pub source: String,
    /// Byte range in the normalized text, when known.
    pub position: Option<(usize, usize)>,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            source: source.into(),
            position: None,
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

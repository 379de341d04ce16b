//! Identity card specific fields: card number, sex and birth place.

use super::patterns::{BIRTH_PLACE, CARD_NUMBER};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::record::Sex;
use crate::normalize::NormalizedText;

const MALE_TOKENS: [&str; 4] = ["M", "MASCULIN", "HOMME", "H"];
const FEMALE_TOKENS: [&str; 4] = ["F", "FÉMININ", "FEMININ", "FEMME"];

/// Card number extractor (two letters, six digits).
#[derive(Debug, Clone, Copy, Default)]
pub struct CardNumberExtractor;

impl FieldExtractor for CardNumberExtractor {
    type Output = ExtractionMatch<String>;

    fn extract_all(&self, doc: &NormalizedText) -> Vec<Self::Output> {
        CARD_NUMBER
            .captures_iter(doc.text())
            .filter_map(|caps| {
                let full = caps.get(0)?;
                let number = format!("{}{}", caps.get(1)?.as_str(), caps.get(2)?.as_str());
                Some(ExtractionMatch::new(number, full.as_str()).with_position(full.start(), full.end()))
            })
            .collect()
    }
}

/// Sex extractor: the first line holding a sex keyword decides, looking at
/// `Sexe` labeled lines before any other line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SexExtractor;

impl SexExtractor {
    fn line_sex(line: &str) -> Option<Sex> {
        line.split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .find_map(|token| {
                let token = token.to_uppercase();
                if MALE_TOKENS.contains(&token.as_str()) {
                    Some(Sex::Male)
                } else if FEMALE_TOKENS.contains(&token.as_str()) {
                    Some(Sex::Female)
                } else {
                    None
                }
            })
    }
}

impl FieldExtractor for SexExtractor {
    type Output = ExtractionMatch<Sex>;

    fn extract_all(&self, doc: &NormalizedText) -> Vec<Self::Output> {
        let (labeled, other): (Vec<&String>, Vec<&String>) = doc
            .lines()
            .iter()
            .partition(|line| line.to_lowercase().contains("sexe"));

        labeled
            .into_iter()
            .chain(other)
            .filter_map(|line| Self::line_sex(line).map(|sex| ExtractionMatch::new(sex, line.as_str())))
            .collect()
    }
}

/// Birth place extractor ("lieu de naissance", "né(e) à").
#[derive(Debug, Clone, Copy, Default)]
pub struct BirthPlaceExtractor;

impl FieldExtractor for BirthPlaceExtractor {
    type Output = ExtractionMatch<String>;

    fn extract_all(&self, doc: &NormalizedText) -> Vec<Self::Output> {
        // Line by line so the place never runs into the next field
        doc.lines()
            .iter()
            .flat_map(|line| BIRTH_PLACE.captures_iter(line))
            .filter_map(|caps| {
                let full = caps.get(0)?;
                let place = caps.get(1)?.as_str().trim().trim_end_matches(['-', '\'']).trim();
                (place.chars().count() >= 2)
                    .then(|| ExtractionMatch::new(place.to_string(), full.as_str()))
            })
            .collect()
    }
}

/// Extract the card number without its inner space.
pub fn extract_card_number(doc: &NormalizedText) -> Option<String> {
    CardNumberExtractor.extract(doc).map(|m| m.value)
}

/// Extract the sex, [`Sex::Unknown`] when no line mentions it.
pub fn extract_sex(doc: &NormalizedText) -> Sex {
    SexExtractor.extract(doc).map(|m| m.value).unwrap_or_default()
}

/// Extract the birth place.
pub fn extract_birth_place(doc: &NormalizedText) -> Option<String> {
    BirthPlaceExtractor.extract(doc).map(|m| m.value)
}

//! Postal address extraction.

use super::patterns::{POSTAL_CODE, STREET_TYPE};
use super::{ExtractionMatch, FieldExtractor};
use crate::normalize::NormalizedText;

/// Address extractor: a line holding both a postal code and a street type.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressExtractor;

impl FieldExtractor for AddressExtractor {
    type Output = ExtractionMatch<String>;

    fn extract_all(&self, doc: &NormalizedText) -> Vec<Self::Output> {
        doc.lines()
            .iter()
            .filter(|line| POSTAL_CODE.is_match(line) && STREET_TYPE.is_match(line))
            .map(|line| ExtractionMatch::new(line.clone(), line.as_str()))
            .collect()
    }
}

/// Extract the first address line.
pub fn extract_address(doc: &NormalizedText) -> Option<String> {
    AddressExtractor.extract(doc).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    #[test]
    fn test_extract_address() {
        let doc = normalize("Jean DUPONT\n15 rue des Lilas, 75014 Paris\n06 12 34 56 78");
        assert_eq!(extract_address(&doc), Some("15 rue des Lilas, 75014 Paris".to_string()));
    }

    #[test]
    fn test_requires_postal_code_and_street_type() {
        let doc = normalize("Stage rue de la Paix\n75001 Paris\n3 Bd Voltaire 75011 PARIS");
        assert_eq!(extract_address(&doc), Some("3 Bd Voltaire 75011 PARIS".to_string()));
    }

    #[test]
    fn test_first_line_wins() {
        let doc = normalize("12 avenue Foch 75116 Paris\n8 impasse des Roses 69003 Lyon");
        let all = AddressExtractor.extract_all(&doc);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].value, "12 avenue Foch 75116 Paris");
    }

    #[test]
    fn test_no_address() {
        assert_eq!(extract_address(&normalize("Paris 75014")), None);
    }
}

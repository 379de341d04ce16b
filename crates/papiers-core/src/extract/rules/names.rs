//! First and last name extraction.
//!
//! Names are read in tiers: person spans from the entity recognizer first,
//! then layout heuristics. A later tier only fills what the earlier ones
//! left missing. First names are title-cased, surnames uppercased.

use std::sync::Arc;

use tracing::debug;

use super::patterns::{LABELED_FIRST_NAME, LABELED_LAST_NAME, NAME_LABEL, NAME_LINE};
use crate::ner::EntityRecognizer;
use crate::normalize::NormalizedText;
use crate::segment::Section;

/// Words that mark a title line rather than a person's name.
const HEADING_WORDS: [&str; 7] = [
    "république",
    "curriculum",
    "vitae",
    "carte",
    "identité",
    "nationale",
    "passeport",
];

/// A first/last name pair; either part may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonName {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl PersonName {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none()
    }

    /// Build a name from a recognizer span: the last token is the surname,
    /// the tokens before it the first name. A single token is a surname.
    pub fn from_span(span: &str) -> Self {
        let tokens: Vec<&str> = span
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphabetic() && c != '-' && c != '\''))
            .filter(|t| !t.is_empty())
            .collect();

        match tokens.split_last() {
            None => Self::default(),
            Some((last, [])) => Self {
                first_name: None,
                last_name: Some(last.to_uppercase()),
            },
            Some((last, rest)) => Self {
                first_name: Some(title_case(&rest.join(" "))),
                last_name: Some(last.to_uppercase()),
            },
        }
    }

    /// Fill missing parts from `other`, never replacing a found part.
    pub fn fill_from(&mut self, other: PersonName) {
        if self.first_name.is_none() {
            self.first_name = other.first_name;
        }
        if self.last_name.is_none() {
            self.last_name = other.last_name;
        }
    }
}

/// Document layout driving the name tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameLayout {
    /// Recognizer on the first `scan_lines` lines, then the first-line layout.
    Resume { scan_lines: usize },
    /// Recognizer on the whole text, then `NOM:`/`PRÉNOM:` labels, then the
    /// first-line layout.
    IdentityCard,
}

/// Tiered name extractor.
pub struct NameExtractor {
    recognizer: Arc<dyn EntityRecognizer>,
    layout: NameLayout,
}

impl NameExtractor {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>, layout: NameLayout) -> Self {
        Self { recognizer, layout }
    }

    /// Run the tiers in order.
    pub fn extract(&self, doc: &NormalizedText) -> PersonName {
        let mut name = self.from_recognizer(doc);
        if !name.is_empty() {
            debug!("Name from recognizer: {:?}", name);
        }

        if self.layout == NameLayout::IdentityCard {
            name.fill_from(from_labels(doc));
        }

        if name.is_empty() {
            if let Some(from_line) = from_first_line(doc) {
                debug!("Name from first line layout: {:?}", from_line);
                name = from_line;
            }
        }

        name
    }

    fn from_recognizer(&self, doc: &NormalizedText) -> PersonName {
        let text = match self.layout {
            NameLayout::Resume { scan_lines } => doc.first_lines(scan_lines).join(" "),
            NameLayout::IdentityCard => doc.lines().join(" "),
        };
        if text.is_empty() {
            return PersonName::default();
        }

        self.recognizer
            .persons(&text)
            .iter()
            .map(|entity| PersonName::from_span(&entity.text))
            .find(|name| !name.is_empty())
            .unwrap_or_default()
    }
}

/// "Firstname SURNAME" on the first line.
fn from_first_line(doc: &NormalizedText) -> Option<PersonName> {
    let line = doc.lines().first()?;
    if is_heading(line) {
        return None;
    }

    let caps = NAME_LINE.captures(line)?;
    Some(PersonName {
        first_name: Some(title_case(caps.get(1)?.as_str())),
        last_name: Some(caps.get(2)?.as_str().trim().to_uppercase()),
    })
}

/// `NOM:` and `PRÉNOM:` labeled lines, first occurrence of each.
fn from_labels(doc: &NormalizedText) -> PersonName {
    let last_name = doc.lines().iter().find_map(|line| {
        let value = before_label(LABELED_LAST_NAME.captures(line)?.get(1)?.as_str());
        (!value.is_empty()).then(|| value.to_uppercase())
    });

    let first_name = doc.lines().iter().find_map(|line| {
        let value = before_label(LABELED_FIRST_NAME.captures(line)?.get(1)?.as_str());
        let words: Vec<&str> = value
            .split([' ', ','])
            .filter(|w| !w.is_empty())
            .collect();
        (!words.is_empty()).then(|| title_case(&words.join(" ")))
    });

    PersonName {
        first_name,
        last_name,
    }
}

/// Cut a labeled value where the next name label starts.
fn before_label(value: &str) -> &str {
    let end = NAME_LABEL.find(value).map_or(value.len(), |m| m.start());
    value[..end].trim()
}

fn is_heading(line: &str) -> bool {
    let lower = line.to_lowercase();
    HEADING_WORDS.iter().any(|w| lower.contains(w)) || Section::triggered_by(line).is_some()
}

/// `JEAN-PIERRE marie` becomes `Jean-Pierre Marie`.
pub fn title_case(s: &str) -> String {
    s.split(' ')
        .filter(|w| !w.is_empty())
        .map(|word| {
            word.split('-')
                .map(capitalize)
                .collect::<Vec<_>>()
                .join("-")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ner::{Entity, NoopRecognizer, ScriptedRecognizer};
    use crate::normalize::normalize;
    use pretty_assertions::assert_eq;

    fn name(first: Option<&str>, last: Option<&str>) -> PersonName {
        PersonName {
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
        }
    }

    fn resume(recognizer: impl EntityRecognizer + 'static) -> NameExtractor {
        NameExtractor::new(Arc::new(recognizer), NameLayout::Resume { scan_lines: 5 })
    }

    fn identity(recognizer: impl EntityRecognizer + 'static) -> NameExtractor {
        NameExtractor::new(Arc::new(recognizer), NameLayout::IdentityCard)
    }

    #[test]
    fn test_from_span() {
        assert_eq!(PersonName::from_span("Jean Dupont"), name(Some("Jean"), Some("DUPONT")));
        assert_eq!(
            PersonName::from_span("marie claire Durand,"),
            name(Some("Marie Claire"), Some("DURAND"))
        );
        assert_eq!(PersonName::from_span("Dupont"), name(None, Some("DUPONT")));
        assert_eq!(PersonName::from_span("  "), PersonName::default());
    }

    #[test]
    fn test_recognizer_tier_wins() {
        let doc = normalize("Paul MARTIN\nDéveloppeur");
        let extracted = resume(ScriptedRecognizer::person("Jean Dupont")).extract(&doc);
        assert_eq!(extracted, name(Some("Jean"), Some("DUPONT")));
    }

    #[test]
    fn test_non_person_entities_ignored() {
        let doc = normalize("Jean DUPONT\nLyon");
        let recognizer = ScriptedRecognizer::new(vec![Entity::new("Lyon", "LOC")]);
        assert_eq!(resume(recognizer).extract(&doc), name(Some("Jean"), Some("DUPONT")));
    }

    #[test]
    fn test_first_line_layouts() {
        for (line, first, last) in [
            ("Jean DUPONT", "Jean", "DUPONT"),
            ("JEAN DUPONT", "Jean", "DUPONT"),
            ("Jean-Pierre DE LA FONTAINE", "Jean-Pierre", "DE LA FONTAINE"),
        ] {
            let extracted = resume(NoopRecognizer).extract(&normalize(line));
            assert_eq!(extracted, name(Some(first), Some(last)), "{line}");
        }
    }

    #[test]
    fn test_first_line_rejects_headings_and_prose() {
        for line in ["CURRICULUM VITAE", "EXPÉRIENCES PROFESSIONNELLES", "Jean Dupont", "Développeur web"] {
            assert!(resume(NoopRecognizer).extract(&normalize(line)).is_empty(), "{line}");
        }
    }

    #[test]
    fn test_identity_labels() {
        let doc = normalize("CARTE NATIONALE D'IDENTITÉ\nNOM: MARTIN\nPRÉNOM: Sophie\nSexe: F");
        assert_eq!(identity(NoopRecognizer).extract(&doc), name(Some("Sophie"), Some("MARTIN")));
    }

    #[test]
    fn test_identity_labels_on_one_line() {
        for line in [
            "Nom: MARTIN Prénom: Sophie",
            "NOM: MARTIN PRÉNOM: SOPHIE",
            "Prénom: Sophie Nom: MARTIN",
        ] {
            let doc = normalize(&format!("RÉPUBLIQUE FRANÇAISE\nCARTE NATIONALE D'IDENTITÉ\n{line}\nSexe: F"));
            assert_eq!(
                identity(NoopRecognizer).extract(&doc),
                name(Some("Sophie"), Some("MARTIN")),
                "{line}"
            );
        }
    }

    #[test]
    fn test_identity_labels_fill_single_token_span() {
        let doc = normalize("Nom : MARTIN\nPrénoms : SOPHIE, MARIE");
        let extracted = identity(ScriptedRecognizer::person("Martin")).extract(&doc);
        assert_eq!(extracted, name(Some("Sophie Marie"), Some("MARTIN")));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("JEAN-PIERRE"), "Jean-Pierre");
        assert_eq!(title_case("éloïse  marie"), "Éloïse Marie");
    }
}

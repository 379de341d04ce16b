//! Document type classification by keyword counting.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::config::ExtractionConfig;

/// Identity card markers, lowercase.
pub const IDENTITY_MARKERS: [&str; 7] = [
    "république française",
    "carte d'identité",
    "nationalité",
    "nom",
    "prénom",
    "date d'expiration",
    "sexe",
];

/// Résumé markers, lowercase.
pub const RESUME_MARKERS: [&str; 8] = [
    "curriculum vitae",
    "expérience",
    "formation",
    "diplôme",
    "stage",
    "compétences",
    "poste",
    "profil",
];

/// Kind of document recognized from its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    IdentityCard,
    Resume,
    Unknown,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::IdentityCard => "IdentityCard",
            DocumentType::Resume => "Resume",
            DocumentType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword-threshold classifier.
#[derive(Debug, Clone)]
pub struct DocumentClassifier {
    identity_threshold: usize,
    resume_threshold: usize,
}

impl DocumentClassifier {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            identity_threshold: config.identity_threshold,
            resume_threshold: config.resume_threshold,
        }
    }

    /// Classify a document from its full text.
    ///
    /// The identity check runs first, so a document reaching both
    /// thresholds is an identity card.
    pub fn classify(&self, text: &str) -> DocumentType {
        let (identity_hits, resume_hits) = self.scores(text);

        if identity_hits >= self.identity_threshold {
            DocumentType::IdentityCard
        } else if resume_hits >= self.resume_threshold {
            DocumentType::Resume
        } else {
            DocumentType::Unknown
        }
    }

    /// Number of distinct identity and résumé markers found in the text.
    pub fn scores(&self, text: &str) -> (usize, usize) {
        let lower = text.to_lowercase();
        (
            count_markers(&lower, &IDENTITY_MARKERS),
            count_markers(&lower, &RESUME_MARKERS),
        )
    }
}

impl Default for DocumentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn count_markers(lower: &str, markers: &[&str]) -> usize {
    markers.iter().filter(|m| lower.contains(*m)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_card() {
        let text = "RÉPUBLIQUE FRANÇAISE\nCARTE D'IDENTITÉ\nNationalité Française\nSexe: F";
        assert_eq!(DocumentClassifier::new().classify(text), DocumentType::IdentityCard);
    }

    #[test]
    fn test_resume() {
        let text = "Curriculum Vitae\nEXPÉRIENCE PROFESSIONNELLE\nStage chez ACME\nFORMATION";
        assert_eq!(DocumentClassifier::new().classify(text), DocumentType::Resume);
    }

    #[test]
    fn test_unknown_below_thresholds() {
        let classifier = DocumentClassifier::new();
        assert_eq!(classifier.classify("Facture n°42\nMontant: 10,00"), DocumentType::Unknown);
        assert_eq!(classifier.classify("Stage\nProfil"), DocumentType::Unknown);
        assert_eq!(classifier.classify(""), DocumentType::Unknown);
    }

    #[test]
    fn test_identity_wins_when_both_thresholds_met() {
        let text = "République française, nationalité, sexe\nExpérience, formation, stage";
        assert_eq!(DocumentClassifier::new().classify(text), DocumentType::IdentityCard);
    }

    #[test]
    fn test_markers_counted_once() {
        let (identity, resume) = DocumentClassifier::new().scores("stage stage stage sexe sexe");
        assert_eq!(identity, 1);
        assert_eq!(resume, 1);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = ExtractionConfig {
            resume_threshold: 2,
            ..Default::default()
        };
        let classifier = DocumentClassifier::from_config(&config);
        assert_eq!(classifier.classify("Stage\nProfil"), DocumentType::Resume);
    }
}

//! Spoken languages and declared levels, read from `Languages` blocks.

use super::patterns::{LANGUAGE_SEPARATOR, PROFICIENCY_MARKER};
use crate::models::record::{LanguageProficiency, Proficiency};
use crate::segment::{Block, Section};

/// Recognized languages: canonical name and lowercase spellings.
const KNOWN_LANGUAGES: [(&str, &[&str]); 11] = [
    ("Anglais", &["anglais", "english"]),
    ("Français", &["français", "francais", "french"]),
    ("Espagnol", &["espagnol", "spanish"]),
    ("Allemand", &["allemand", "german"]),
    ("Italien", &["italien", "italian"]),
    ("Portugais", &["portugais", "portuguese"]),
    ("Chinois", &["chinois", "mandarin", "chinese"]),
    ("Arabe", &["arabe", "arabic"]),
    ("Russe", &["russe", "russian"]),
    ("Japonais", &["japonais", "japanese"]),
    ("Néerlandais", &["néerlandais", "neerlandais", "dutch"]),
];

/// Splits language blocks on `,` `;` and line breaks and reads one
/// language per piece.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageExtractor;

impl LanguageExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Languages declared in the `Languages` blocks, first mention wins.
    pub fn extract(&self, blocks: &[Block]) -> Vec<LanguageProficiency> {
        let mut found: Vec<LanguageProficiency> = Vec::new();

        let pieces = blocks
            .iter()
            .filter(|b| b.section == Section::Languages)
            .flat_map(|b| b.lines.iter())
            .flat_map(|line| LANGUAGE_SEPARATOR.split(line));

        for piece in pieces {
            let Some(entry) = Self::parse_piece(piece) else {
                continue;
            };
            if !found.iter().any(|l| l.language == entry.language) {
                found.push(entry);
            }
        }

        found
    }

    fn parse_piece(piece: &str) -> Option<LanguageProficiency> {
        let lower = piece.to_lowercase();
        let language = KNOWN_LANGUAGES
            .iter()
            .filter_map(|(name, spellings)| {
                spellings
                    .iter()
                    .filter_map(|s| lower.find(s))
                    .min()
                    .map(|pos| (pos, *name))
            })
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, name)| name)?;

        let level = PROFICIENCY_MARKER
            .captures(piece)
            .and_then(|caps| caps.get(1))
            .and_then(|m| Proficiency::from_marker(m.as_str()))
            .unwrap_or_default();

        Some(LanguageProficiency::new(language, level))
    }
}

pub fn extract_languages(blocks: &[Block]) -> Vec<LanguageProficiency> {
    LanguageExtractor::new().extract(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn block(section: Section, lines: &[&str]) -> Block {
        Block {
            section,
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn test_levels_per_language() {
        let blocks = [block(Section::Languages, &["Anglais B2, Espagnol A2"])];
        assert_eq!(
            extract_languages(&blocks),
            vec![
                LanguageProficiency::new("Anglais", Proficiency::B2),
                LanguageProficiency::new("Espagnol", Proficiency::A2),
            ]
        );
    }

    #[test]
    fn test_qualitative_levels_and_missing_level() {
        let blocks = [block(
            Section::Languages,
            &["ANGLAIS : courant", "allemand (notions); Italien", "Français langue maternelle"],
        )];
        assert_eq!(
            extract_languages(&blocks),
            vec![
                LanguageProficiency::new("Anglais", Proficiency::Courant),
                LanguageProficiency::new("Allemand", Proficiency::Notions),
                LanguageProficiency::new("Italien", Proficiency::Unknown),
                LanguageProficiency::new("Français", Proficiency::Unknown),
            ]
        );
    }

    #[test]
    fn test_first_mention_wins_and_other_sections_ignored() {
        let blocks = [
            block(Section::Skills, &["Anglais technique C1"]),
            block(Section::Languages, &["Anglais B1", "Anglais C2"]),
        ];
        assert_eq!(
            extract_languages(&blocks),
            vec![LanguageProficiency::new("Anglais", Proficiency::B1)]
        );
    }

    #[test]
    fn test_unknown_language_skipped() {
        let blocks = [block(Section::Languages, &["Klingon C2"])];
        assert!(extract_languages(&blocks).is_empty());
    }
}

//! Line-oriented section segmentation.
//!
//! A single pass over the normalized lines with one open section at a time.
//! A trigger line opens its section (closing the previous one), and the
//! open section accumulates lines until a paragraph break, an all-uppercase
//! header line or the end of input.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::normalize::NormalizedText;

lazy_static! {
    static ref SKILLS_TRIGGER: Regex =
        Regex::new(r"(?i)\b(?:comp[ée]tences?|skills)\b").unwrap();

    static ref EXPERIENCE_TRIGGER: Regex =
        Regex::new(r"(?i)\b(?:exp[ée]riences?|stages?|emplois?)\b").unwrap();

    static ref EDUCATION_TRIGGER: Regex =
        Regex::new(r"(?i)\b(?:formations?|dipl[ôo]mes?|[ée]ducation)\b").unwrap();

    static ref LANGUAGES_TRIGGER: Regex =
        Regex::new(r"(?i)\b(?:langues|languages)\b").unwrap();

    /// Uppercase-only line, taken as the header of an unrelated section.
    static ref HEADER_LINE: Regex =
        Regex::new(r"^\p{Lu}[\p{Lu}\s'’&\-]+$").unwrap();
}

/// Résumé section kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Skills,
    Experience,
    Education,
    Languages,
}

impl Section {
    const ALL: [Section; 4] = [
        Section::Skills,
        Section::Experience,
        Section::Education,
        Section::Languages,
    ];

    fn trigger(&self) -> &'static Regex {
        match self {
            Section::Skills => &SKILLS_TRIGGER,
            Section::Experience => &EXPERIENCE_TRIGGER,
            Section::Education => &EDUCATION_TRIGGER,
            Section::Languages => &LANGUAGES_TRIGGER,
        }
    }

    /// Section opened by `line`, if any.
    ///
    /// When a line names several sections, the keyword appearing first wins.
    pub fn triggered_by(line: &str) -> Option<Section> {
        Self::ALL
            .iter()
            .filter_map(|s| s.trigger().find(line).map(|m| (m.start(), *s)))
            .min_by_key(|(start, _)| *start)
            .map(|(_, section)| section)
    }
}

/// Lines collected for one section occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub section: Section,
    pub lines: Vec<String>,
}

impl Block {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Section state machine.
#[derive(Debug, Clone)]
pub struct SectionSegmenter {
    min_block_chars: usize,
}

impl SectionSegmenter {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            min_block_chars: config.min_block_chars,
        }
    }

    /// Group the document lines into section blocks, in document order.
    pub fn segment(&self, doc: &NormalizedText) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut current: Option<Block> = None;

        for (index, line) in doc.lines().iter().enumerate() {
            if let Some(section) = Section::triggered_by(line) {
                self.flush(current.take(), &mut blocks);
                let mut block = Block {
                    section,
                    lines: Vec::new(),
                };
                // "LANGUES : Anglais B2" carries its content on the header line
                if let Some(rest) = inline_content(line) {
                    block.lines.push(rest.to_string());
                }
                current = Some(block);
                continue;
            }

            let Some(block) = current.as_mut() else {
                continue;
            };

            let paragraph_break = doc.starts_paragraph(index) && !block.lines.is_empty();
            if paragraph_break || HEADER_LINE.is_match(line) {
                self.flush(current.take(), &mut blocks);
                continue;
            }

            block.lines.push(line.clone());
        }

        self.flush(current.take(), &mut blocks);
        blocks
    }

    fn flush(&self, block: Option<Block>, blocks: &mut Vec<Block>) {
        let Some(block) = block else {
            return;
        };

        let chars = block.text().chars().count();
        if chars <= self.min_block_chars {
            debug!("Discarding {:?} block of {} chars", block.section, chars);
            return;
        }

        debug!("Flushed {:?} block with {} lines", block.section, block.lines.len());
        blocks.push(block);
    }
}

impl Default for SectionSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

fn inline_content(line: &str) -> Option<&str> {
    let (_, rest) = line.split_once(':')?;
    let rest = rest.trim();
    (!rest.is_empty()).then_some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use pretty_assertions::assert_eq;

    fn segment(raw: &str) -> Vec<Block> {
        SectionSegmenter::new().segment(&normalize(raw))
    }

    #[test]
    fn test_trigger_detection() {
        assert_eq!(Section::triggered_by("COMPÉTENCES"), Some(Section::Skills));
        assert_eq!(Section::triggered_by("Expériences professionnelles"), Some(Section::Experience));
        assert_eq!(Section::triggered_by("DIPLÔMES"), Some(Section::Education));
        assert_eq!(Section::triggered_by("Langues"), Some(Section::Languages));
        assert_eq!(Section::triggered_by("Technologies de l'information"), None);
        assert_eq!(Section::triggered_by("Jean DUPONT"), None);
    }

    #[test]
    fn test_first_keyword_wins() {
        assert_eq!(
            Section::triggered_by("Formation et expérience"),
            Some(Section::Education)
        );
    }

    #[test]
    fn test_sections_in_order() {
        let blocks = segment(
            "Jean DUPONT\n\
             EXPÉRIENCES\n\
             2020-2023 Développeur chez ACME\n\
             2018-2020 Analyste chez Globex\n\
             FORMATION\n\
             Master Informatique, Université de Lyon\n",
        );

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].section, Section::Experience);
        assert_eq!(
            blocks[0].lines,
            vec!["2020-2023 Développeur chez ACME", "2018-2020 Analyste chez Globex"]
        );
        assert_eq!(blocks[1].section, Section::Education);
        assert_eq!(blocks[1].lines, vec!["Master Informatique, Université de Lyon"]);
    }

    #[test]
    fn test_uppercase_header_closes_section() {
        let blocks = segment("LANGUES\nAnglais B2\nCENTRES D'INTÉRÊT\nRandonnée, lecture\n");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines, vec!["Anglais B2"]);
    }

    #[test]
    fn test_blank_line_closes_section() {
        let blocks = segment("Langues\nAnglais courant\n\nPermis B, véhiculé\n");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text(), "Anglais courant");
    }

    #[test]
    fn test_blank_line_after_header_keeps_section_open() {
        let blocks = segment("LANGUES\n\nAnglais B2\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines, vec!["Anglais B2"]);
    }

    #[test]
    fn test_inline_content_on_trigger_line() {
        let blocks = segment("LANGUES : Anglais B2, Espagnol A2\nCOMPÉTENCES: HTML, CSS");

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].section, Section::Languages);
        assert_eq!(blocks[0].lines, vec!["Anglais B2, Espagnol A2"]);
        assert_eq!(blocks[1].section, Section::Skills);
        assert_eq!(blocks[1].lines, vec!["HTML, CSS"]);
    }

    #[test]
    fn test_short_blocks_discarded() {
        let blocks = segment("COMPÉTENCES\nC++\nLANGUES\nAnglais\n");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].section, Section::Languages);
    }

    #[test]
    fn test_lines_outside_sections_ignored() {
        let blocks = segment("Jean DUPONT\n06 12 34 56 78\njean@example.fr\n");
        assert!(blocks.is_empty());
    }
}

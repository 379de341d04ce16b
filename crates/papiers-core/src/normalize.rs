//! OCR text normalization.
//!
//! Turns raw OCR output into a canonical sequence of non-empty, trimmed
//! lines. Line order is kept, and blank lines are remembered as paragraph
//! breaks so that section segmentation can still close a block on them.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Normalized document text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    lines: Vec<String>,
    /// Indices of lines that were preceded by at least one blank line.
    paragraph_starts: Vec<usize>,
    text: String,
}

impl NormalizedText {
    /// Non-empty, trimmed lines in their original order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All lines joined with `\n`.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The first `n` lines (fewer if the document is shorter).
    pub fn first_lines(&self, n: usize) -> &[String] {
        &self.lines[..n.min(self.lines.len())]
    }

    /// Whether a blank line separated line `index` from the previous one.
    pub fn starts_paragraph(&self, index: usize) -> bool {
        self.paragraph_starts.binary_search(&index).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

/// Normalize raw OCR text.
///
/// Line endings are unified (`\r\n`, `\r`, form feed), control characters
/// become spaces, whitespace runs collapse to one space and each line is
/// trimmed. Empty lines are dropped but recorded as paragraph breaks.
pub fn normalize(raw: &str) -> NormalizedText {
    let unified = raw
        .replace("\r\n", "\n")
        .replace(['\r', '\u{000C}', '\u{2028}', '\u{2029}'], "\n");

    let mut lines = Vec::new();
    let mut paragraph_starts = Vec::new();
    let mut pending_break = false;

    for raw_line in unified.split('\n') {
        let cleaned: String = raw_line
            .chars()
            .map(|c| if is_noise(c) { ' ' } else { c })
            .collect();
        let line = WHITESPACE_RUN.replace_all(&cleaned, " ");
        let line = line.trim();

        if line.is_empty() {
            pending_break = !lines.is_empty();
            continue;
        }

        if pending_break {
            paragraph_starts.push(lines.len());
            pending_break = false;
        }
        lines.push(line.to_string());
    }

    let text = lines.join("\n");
    NormalizedText {
        lines,
        paragraph_starts,
        text,
    }
}

fn is_noise(c: char) -> bool {
    (c.is_control() && c != '\t') || matches!(c, '\u{FEFF}' | '\u{200B}' | '\u{00AD}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_collapses_whitespace() {
        let text = normalize("  Jean    DUPONT \t \n\n 15  rue des Lilas  ");
        assert_eq!(text.lines(), &["Jean DUPONT", "15 rue des Lilas"]);
        assert_eq!(text.text(), "Jean DUPONT\n15 rue des Lilas");
    }

    #[test]
    fn test_unifies_line_endings() {
        let text = normalize("un\r\ndeux\rtrois\u{000C}quatre");
        assert_eq!(text.lines(), &["un", "deux", "trois", "quatre"]);
        assert!(!text.starts_paragraph(1));
    }

    #[test]
    fn test_control_characters_become_spaces() {
        let text = normalize("NOM:\u{0007}MARTIN\u{FEFF}");
        assert_eq!(text.lines(), &["NOM: MARTIN"]);
    }

    #[test]
    fn test_records_paragraph_breaks() {
        let text = normalize("\n\nLANGUES\nAnglais B2\n\n   \nCENTRES D'INTERET\n");
        assert_eq!(text.len(), 3);
        assert!(!text.starts_paragraph(0));
        assert!(!text.starts_paragraph(1));
        assert!(text.starts_paragraph(2));
    }

    #[test]
    fn test_first_lines_is_bounded() {
        let text = normalize("a\nb");
        assert_eq!(text.first_lines(5).len(), 2);
        assert_eq!(text.first_lines(1), &["a"]);
    }

    #[test]
    fn test_empty_input() {
        let text = normalize(" \n\t\r\n");
        assert!(text.is_empty());
        assert_eq!(text.text(), "");
    }
}

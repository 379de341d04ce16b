//! Technical skill detection against a keyword vocabulary.

use std::collections::BTreeSet;

use regex::Regex;

use super::FieldExtractor;
use crate::normalize::NormalizedText;

/// Built-in skill vocabulary, lowercase.
pub const DEFAULT_SKILLS: [&str; 22] = [
    "python",
    "java",
    "sql",
    "c++",
    "c#",
    "javascript",
    "typescript",
    "html",
    "css",
    "php",
    "mysql",
    "postgresql",
    "mongodb",
    "docker",
    "kubernetes",
    "linux",
    "react",
    "angular",
    "nodejs",
    "git",
    "bash",
    "rust",
];

/// Matches vocabulary keywords as whole words, case-insensitively.
///
/// Found skills are reported uppercase. `java` does not fire on
/// `javascript` and `c` never fires on `c++`.
pub struct SkillExtractor {
    vocabulary: Vec<(String, Regex)>,
}

impl SkillExtractor {
    pub fn new() -> Self {
        Self::from_keywords(DEFAULT_SKILLS.iter().copied())
    }

    /// Add keywords to the built-in vocabulary.
    pub fn with_extra(extra: &[String]) -> Self {
        Self::from_keywords(DEFAULT_SKILLS.iter().copied().chain(extra.iter().map(String::as_str)))
    }

    fn from_keywords<'a>(keywords: impl Iterator<Item = &'a str>) -> Self {
        let mut seen = BTreeSet::new();
        let vocabulary = keywords
            .map(|kw| kw.trim().to_lowercase())
            .filter(|kw| !kw.is_empty() && seen.insert(kw.clone()))
            .filter_map(|kw| {
                let pattern = format!(
                    r"(?i)(?:^|[^\p{{L}}\p{{N}}_])({})(?:$|[^\p{{L}}\p{{N}}_+#])",
                    regex::escape(&kw)
                );
                Regex::new(&pattern).ok().map(|re| (kw, re))
            })
            .collect();
        Self { vocabulary }
    }

    /// Skills found in `text`, uppercase and deduplicated.
    pub fn skills_in(&self, text: &str) -> BTreeSet<String> {
        self.vocabulary
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(kw, _)| kw.to_uppercase())
            .collect()
    }
}

impl Default for SkillExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for SkillExtractor {
    type Output = String;

    fn extract_all(&self, doc: &NormalizedText) -> Vec<String> {
        self.skills_in(doc.text()).into_iter().collect()
    }
}

/// Skills found anywhere in the document with the built-in vocabulary.
pub fn extract_skills(doc: &NormalizedText) -> BTreeSet<String> {
    SkillExtractor::new().skills_in(doc.text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use pretty_assertions::assert_eq;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_comma_separated_skills() {
        let doc = normalize("COMPÉTENCES\nHTML, CSS, PHP, MySQL, Python");
        assert_eq!(extract_skills(&doc), set(&["CSS", "HTML", "MYSQL", "PHP", "PYTHON"]));
    }

    #[test]
    fn test_whole_words_only() {
        let doc = normalize("JavaScript et TypeScript");
        assert_eq!(extract_skills(&doc), set(&["JAVASCRIPT", "TYPESCRIPT"]));

        let doc = normalize("Outils : gitlab, dockerfile");
        assert!(extract_skills(&doc).is_empty());
    }

    #[test]
    fn test_symbols_in_keywords() {
        let doc = normalize("Langages : C++, C# et Rust");
        assert_eq!(extract_skills(&doc), set(&["C#", "C++", "RUST"]));
    }

    #[test]
    fn test_extra_vocabulary() {
        let extractor = SkillExtractor::with_extra(&["Terraform".to_string(), "python".to_string()]);
        let doc = normalize("Python, Terraform");
        assert_eq!(extractor.extract_all(&doc), vec!["PYTHON", "TERRAFORM"]);
    }
}

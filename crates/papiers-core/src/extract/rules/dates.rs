//! Labeled date extraction (birth and expiration dates).

use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use super::patterns::{BIRTH_DATE, EXPIRATION_DATE};
use super::{ExtractionMatch, FieldExtractor};
use crate::normalize::NormalizedText;

/// Which labeled date to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLabel {
    /// "né(e) le", "date de naissance", "naissance".
    Birth,
    /// "date d'expiration", "valide jusqu'au", "expire le".
    Expiration,
}

impl DateLabel {
    fn pattern(&self) -> &'static Regex {
        match self {
            DateLabel::Birth => &BIRTH_DATE,
            DateLabel::Expiration => &EXPIRATION_DATE,
        }
    }
}

/// Date field extractor.
///
/// Candidates are scanned in text order; a candidate that is not a real
/// calendar date or falls outside the accepted years is skipped.
#[derive(Debug, Clone)]
pub struct DateExtractor {
    label: DateLabel,
    years: Option<RangeInclusive<i32>>,
}

impl DateExtractor {
    pub fn new(label: DateLabel) -> Self {
        Self { label, years: None }
    }

    /// Only accept dates whose year lies in `years`.
    pub fn with_years(mut self, years: RangeInclusive<i32>) -> Self {
        self.years = Some(years);
        self
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract_all(&self, doc: &NormalizedText) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in self.label.pattern().captures_iter(doc.text()) {
            let (Some(full), Some(day), Some(month), Some(year)) =
                (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
            else {
                continue;
            };

            let Some(date) = parse_dmy(day.as_str(), month.as_str(), year.as_str()) else {
                continue;
            };

            if let Some(years) = &self.years {
                if !years.contains(&date.year()) {
                    continue;
                }
            }

            results.push(
                ExtractionMatch::new(date, full.as_str()).with_position(full.start(), full.end()),
            );
        }

        results
    }
}

/// Extract the first plausible labeled birth date.
pub fn extract_birth_date(doc: &NormalizedText, years: RangeInclusive<i32>) -> Option<NaiveDate> {
    DateExtractor::new(DateLabel::Birth)
        .with_years(years)
        .extract(doc)
        .map(|m| m.value)
}

/// Extract the first labeled expiration date.
pub fn extract_expiration_date(doc: &NormalizedText) -> Option<NaiveDate> {
    DateExtractor::new(DateLabel::Expiration)
        .extract(doc)
        .map(|m| m.value)
}

fn parse_dmy(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    let day: u32 = day.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_birth_date_separators() {
        for raw in [
            "Né le 12/05/1980",
            "née le 12-05-1980",
            "Né(e) le : 12.05.1980",
            "Date de naissance 12 05 1980",
            "NAISSANCE: 12051980",
        ] {
            assert_eq!(extract_birth_date(&normalize(raw), 1900..=2010), ymd(1980, 5, 12), "{raw}");
        }
    }

    #[test]
    fn test_birth_date_label_on_previous_line() {
        let doc = normalize("Date de naissance :\n03/11/1975");
        assert_eq!(extract_birth_date(&doc, 1900..=2010), ymd(1975, 11, 3));
    }

    #[test]
    fn test_implausible_birth_year_skipped() {
        let doc = normalize("Né le 01/01/2030\nDate de naissance : 14/07/1989");
        assert_eq!(extract_birth_date(&doc, 1900..=2010), ymd(1989, 7, 14));
    }

    #[test]
    fn test_invalid_calendar_date_skipped() {
        let doc = normalize("Né le 31/02/1980");
        assert_eq!(extract_birth_date(&doc, 1900..=2010), None);
    }

    #[test]
    fn test_unlabeled_date_ignored() {
        let doc = normalize("Paris, le 12/05/1980");
        assert_eq!(extract_birth_date(&doc, 1900..=2010), None);
    }

    #[test]
    fn test_expiration_date() {
        assert_eq!(
            extract_expiration_date(&normalize("Date d'expiration : 02/07/2031")),
            ymd(2031, 7, 2)
        );
        assert_eq!(
            extract_expiration_date(&normalize("Valide jusqu'au 15.09.2029")),
            ymd(2029, 9, 15)
        );
        assert_eq!(extract_expiration_date(&normalize("expire le 01-01-2030")), ymd(2030, 1, 1));
        assert_eq!(extract_expiration_date(&normalize("Délivrée le 01/01/2020")), None);
    }

    #[test]
    fn test_extract_all_in_order() {
        let doc = normalize("né le 01/01/1950\nnée le 02/02/1960");
        let all = DateExtractor::new(DateLabel::Birth).extract_all(&doc);
        assert_eq!(all.len(), 2);
        assert_eq!(Some(all[0].value), ymd(1950, 1, 1));
        assert_eq!(all[1].source, "née le 02/02/1960");
    }
}

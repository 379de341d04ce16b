//! Structured records produced by the extraction engine.
//!
//! Every field exists on every record. A field that could not be extracted
//! holds `None` (or an empty collection) and serializes as [`UNKNOWN`], so
//! consumers can rely on all keys being present.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::classify::DocumentType;

/// Sentinel written for fields that were not found.
pub const UNKNOWN: &str = "Unknown";

/// A structured record for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "documentType")]
pub enum ExtractionRecord {
    /// French national identity card.
    IdentityCard(IdentityCardRecord),
    /// Résumé / curriculum vitae.
    Resume(ResumeRecord),
}

impl ExtractionRecord {
    pub fn document_type(&self) -> DocumentType {
        match self {
            Self::IdentityCard(_) => DocumentType::IdentityCard,
            Self::Resume(_) => DocumentType::Resume,
        }
    }

    pub fn last_name(&self) -> Option<&str> {
        match self {
            Self::IdentityCard(r) => r.last_name.as_deref(),
            Self::Resume(r) => r.last_name.as_deref(),
        }
    }

    pub fn first_name(&self) -> Option<&str> {
        match self {
            Self::IdentityCard(r) => r.first_name.as_deref(),
            Self::Resume(r) => r.first_name.as_deref(),
        }
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        match self {
            Self::IdentityCard(r) => r.birth_date,
            Self::Resume(r) => r.birth_date,
        }
    }

    /// Names of the fields still holding their sentinel or empty value.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        match self {
            Self::IdentityCard(r) => r.missing_fields(),
            Self::Resume(r) => r.missing_fields(),
        }
    }
}

/// Fields extracted from an identity card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityCardRecord {
    #[serde(with = "sentinel")]
    pub last_name: Option<String>,

    #[serde(with = "sentinel")]
    pub first_name: Option<String>,

    #[serde(with = "sentinel_date")]
    pub birth_date: Option<NaiveDate>,

    /// Card number, two letters and six digits without spaces.
    #[serde(with = "sentinel")]
    pub card_number: Option<String>,

    #[serde(with = "sentinel")]
    pub birth_place: Option<String>,

    pub sex: Sex,

    #[serde(with = "sentinel")]
    pub address: Option<String>,

    #[serde(with = "sentinel_date")]
    pub expiration_date: Option<NaiveDate>,
}

impl IdentityCardRecord {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let checks = [
            ("lastName", self.last_name.is_none()),
            ("firstName", self.first_name.is_none()),
            ("birthDate", self.birth_date.is_none()),
            ("cardNumber", self.card_number.is_none()),
            ("birthPlace", self.birth_place.is_none()),
            ("sex", self.sex == Sex::Unknown),
            ("address", self.address.is_none()),
            ("expirationDate", self.expiration_date.is_none()),
        ];
        missing(&checks)
    }
}

/// Fields extracted from a résumé.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    #[serde(with = "sentinel")]
    pub last_name: Option<String>,

    #[serde(with = "sentinel")]
    pub first_name: Option<String>,

    #[serde(with = "sentinel_date")]
    pub birth_date: Option<NaiveDate>,

    #[serde(with = "sentinel")]
    pub email: Option<String>,

    /// Phone number, digits with an optional leading `+`.
    #[serde(with = "sentinel")]
    pub phone: Option<String>,

    #[serde(with = "sentinel")]
    pub address: Option<String>,

    /// Uppercased skill tokens, sorted and unique.
    pub skills: BTreeSet<String>,

    pub languages: Vec<LanguageProficiency>,

    pub experiences: Vec<String>,

    pub educations: Vec<String>,
}

impl ResumeRecord {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let checks = [
            ("lastName", self.last_name.is_none()),
            ("firstName", self.first_name.is_none()),
            ("birthDate", self.birth_date.is_none()),
            ("email", self.email.is_none()),
            ("phone", self.phone.is_none()),
            ("address", self.address.is_none()),
            ("skills", self.skills.is_empty()),
            ("languages", self.languages.is_empty()),
            ("experiences", self.experiences.is_empty()),
            ("educations", self.educations.is_empty()),
        ];
        missing(&checks)
    }
}

fn missing(checks: &[(&'static str, bool)]) -> Vec<&'static str> {
    checks
        .iter()
        .filter(|(_, is_missing)| *is_missing)
        .map(|(name, _)| *name)
        .collect()
}

/// Sex as printed on an identity card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
            Sex::Unknown => UNKNOWN,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A spoken language and the declared level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageProficiency {
    /// Capitalized language name, e.g. `Anglais`.
    pub language: String,
    pub level: Proficiency,
}

impl LanguageProficiency {
    pub fn new(language: impl Into<String>, level: Proficiency) -> Self {
        Self {
            language: language.into(),
            level,
        }
    }
}

/// Language level: a CEFR code or a qualitative French term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Proficiency {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
    Courant,
    Bilingue,
    Notions,
    #[serde(rename = "Débutant")]
    Debutant,
    #[serde(rename = "Intermédiaire")]
    Intermediaire,
    #[default]
    Unknown,
}

impl Proficiency {
    /// Parse a level marker, case-insensitively, with or without accents.
    pub fn from_marker(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();

        match s.as_str() {
            "a1" => Some(Proficiency::A1),
            "a2" => Some(Proficiency::A2),
            "b1" => Some(Proficiency::B1),
            "b2" => Some(Proficiency::B2),
            "c1" => Some(Proficiency::C1),
            "c2" => Some(Proficiency::C2),
            "courant" => Some(Proficiency::Courant),
            "bilingue" => Some(Proficiency::Bilingue),
            "notion" | "notions" => Some(Proficiency::Notions),
            "débutant" | "debutant" => Some(Proficiency::Debutant),
            "intermédiaire" | "intermediaire" => Some(Proficiency::Intermediaire),
            _ => None,
        }
    }

    /// Canonical spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Proficiency::A1 => "A1",
            Proficiency::A2 => "A2",
            Proficiency::B1 => "B1",
            Proficiency::B2 => "B2",
            Proficiency::C1 => "C1",
            Proficiency::C2 => "C2",
            Proficiency::Courant => "Courant",
            Proficiency::Bilingue => "Bilingue",
            Proficiency::Notions => "Notions",
            Proficiency::Debutant => "Débutant",
            Proficiency::Intermediaire => "Intermédiaire",
            Proficiency::Unknown => UNKNOWN,
        }
    }
}

impl fmt::Display for Proficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serde adapter writing `None` as the sentinel string.
mod sentinel {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::UNKNOWN;

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_deref().unwrap_or(UNKNOWN))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let value = String::deserialize(d)?;
        Ok((value != UNKNOWN).then_some(value))
    }
}

/// Serde adapter writing dates as `YYYY-MM-DD` and `None` as the sentinel.
mod sentinel_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::UNKNOWN;

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => s.collect_str(&date.format(FORMAT)),
            None => s.serialize_str(UNKNOWN),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let value = String::deserialize(d)?;
        if value == UNKNOWN {
            return Ok(None);
        }
        NaiveDate::parse_from_str(&value, FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_empty_identity_record_serializes_every_field() {
        let record = ExtractionRecord::IdentityCard(IdentityCardRecord::default());
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(
            value,
            json!({
                "documentType": "IdentityCard",
                "lastName": "Unknown",
                "firstName": "Unknown",
                "birthDate": "Unknown",
                "cardNumber": "Unknown",
                "birthPlace": "Unknown",
                "sex": "Unknown",
                "address": "Unknown",
                "expirationDate": "Unknown",
            })
        );
    }

    #[test]
    fn test_resume_record_serialization() {
        let mut record = ResumeRecord {
            first_name: Some("Jean".to_string()),
            birth_date: NaiveDate::from_ymd_opt(1990, 3, 12),
            ..Default::default()
        };
        record.skills.insert("PYTHON".to_string());
        record.skills.insert("CSS".to_string());
        record
            .languages
            .push(LanguageProficiency::new("Anglais", Proficiency::B2));

        let value = serde_json::to_value(ExtractionRecord::Resume(record)).unwrap();

        assert_eq!(value["documentType"], "Resume");
        assert_eq!(value["firstName"], "Jean");
        assert_eq!(value["lastName"], "Unknown");
        assert_eq!(value["birthDate"], "1990-03-12");
        assert_eq!(value["skills"], json!(["CSS", "PYTHON"]));
        assert_eq!(value["languages"], json!([{"language": "Anglais", "level": "B2"}]));
        assert_eq!(value["experiences"], json!([]));
    }

    #[test]
    fn test_sentinel_deserializes_to_none() {
        let record: IdentityCardRecord = serde_json::from_value(json!({
            "lastName": "MARTIN",
            "firstName": "Unknown",
            "birthDate": "1985-07-02",
            "cardNumber": "Unknown",
            "birthPlace": "Unknown",
            "sex": "Female",
            "address": "Unknown",
            "expirationDate": "Unknown",
        }))
        .unwrap();

        assert_eq!(record.last_name.as_deref(), Some("MARTIN"));
        assert_eq!(record.first_name, None);
        assert_eq!(record.birth_date, NaiveDate::from_ymd_opt(1985, 7, 2));
        assert_eq!(record.sex, Sex::Female);
    }

    #[test]
    fn test_missing_fields() {
        let record = ResumeRecord {
            email: Some("jean@example.fr".to_string()),
            ..Default::default()
        };
        let missing = record.missing_fields();
        assert!(!missing.contains(&"email"));
        assert!(missing.contains(&"phone"));
        assert!(missing.contains(&"skills"));
        assert_eq!(missing.len(), 9);
    }

    #[test]
    fn test_proficiency_markers() {
        assert_eq!(Proficiency::from_marker("b2"), Some(Proficiency::B2));
        assert_eq!(Proficiency::from_marker("COURANT"), Some(Proficiency::Courant));
        assert_eq!(Proficiency::from_marker("debutant"), Some(Proficiency::Debutant));
        assert_eq!(Proficiency::from_marker("Intermédiaire"), Some(Proficiency::Intermediaire));
        assert_eq!(Proficiency::from_marker("expert"), None);
        assert_eq!(Proficiency::Debutant.to_string(), "Débutant");
    }
}

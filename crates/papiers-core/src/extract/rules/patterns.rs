//! Common regex patterns for identity card and résumé extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Contact data
    pub static ref EMAIL: Regex = Regex::new(
        r"\b[\w.%+\-]+@[\w\-]+(?:\.[\w\-]+)*\.[A-Za-z]{2,4}\b"
    ).unwrap();

    /// French mobile or landline: +33 or leading 0, then four digit pairs.
    pub static ref PHONE: Regex = Regex::new(
        r"(?:\+33 ?|\b0)[1-9](?:[ .\-]?\d{2}){4}\b"
    ).unwrap();

    // Address
    pub static ref POSTAL_CODE: Regex = Regex::new(
        r"\b\d{5}\b"
    ).unwrap();

    pub static ref STREET_TYPE: Regex = Regex::new(
        r"(?i)\b(?:rue|avenue|av|bd|boulevard|impasse|all[ée]e|chemin|place|route)\b"
    ).unwrap();

    // Labeled dates: DD[sep]MM[sep]YYYY after the label
    pub static ref BIRTH_DATE: Regex = Regex::new(
        r"(?i)(?:\bn[ée](?:\(e\)|e)?\s+le|date\s+de\s+naissance|naissance)[\s:\-]*(\d{2})[/\-. ]?(\d{2})[/\-. ]?(\d{4})\b"
    ).unwrap();

    pub static ref EXPIRATION_DATE: Regex = Regex::new(
        r"(?i)(?:date\s+d['’]\s*expiration|valide?\s+jusqu['’]\s*au|expire\s+le|expiration)[\s:\-]*(\d{2})[/\-. ]?(\d{2})[/\-. ]?(\d{4})\b"
    ).unwrap();

    // Identity card
    pub static ref CARD_NUMBER: Regex = Regex::new(
        r"\b([A-Z]{2})\s?(\d{6})\b"
    ).unwrap();

    pub static ref BIRTH_PLACE: Regex = Regex::new(
        r"(?i)(?:lieu\s+de\s+naissance|\bn[ée](?:\(e\)|e)?\s+à)\s*[:\-]?\s*(\p{L}[\p{L} '\-]{1,49})"
    ).unwrap();

    // Names
    /// "Firstname SURNAME" layout: one capitalized word, then uppercase words.
    pub static ref NAME_LINE: Regex = Regex::new(
        r"^(\p{Lu}[\p{L}'\-]*)[\s\-]+(\p{Lu}[\p{Lu}'\-]*(?:\s+\p{Lu}[\p{Lu}'\-]*)*)$"
    ).unwrap();

    pub static ref LABELED_LAST_NAME: Regex = Regex::new(
        r"\b(?i:nom)\b(?:\s+(?i:de\s+famille))?\s*[:\-]?\s*(\p{Lu}[\p{Lu}'\-]*\b(?: \p{Lu}[\p{Lu}'\-]*\b)*)"
    ).unwrap();

    pub static ref LABELED_FIRST_NAME: Regex = Regex::new(
        r"\b(?i:pr[ée]nom(?:s\b|\(s\)|\b))\s*[:\-]?\s*(\p{Lu}[\p{L}'\-]*(?:[ ,]+\p{Lu}[\p{L}'\-]*)*)"
    ).unwrap();

    /// A `NOM`/`PRÉNOM` label inside a captured value, when OCR merged the
    /// two fields onto one line.
    pub static ref NAME_LABEL: Regex = Regex::new(
        r"(?i)\b(?:pr[ée]nom|nom)(?:s\b|\(s\)|\b)"
    ).unwrap();

    // Languages
    pub static ref PROFICIENCY_MARKER: Regex = Regex::new(
        r"(?i)\b(A1|A2|B1|B2|C1|C2|courant|bilingue|notions?|d[ée]butant|interm[ée]diaire)\b"
    ).unwrap();

    pub static ref LANGUAGE_SEPARATOR: Regex = Regex::new(
        r"[,;\n]"
    ).unwrap();
}

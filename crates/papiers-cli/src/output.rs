//! Record serialization: JSON, XML and a plain-text summary.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use papiers_core::models::record::{IdentityCardRecord, LanguageProficiency, ResumeRecord};
use papiers_core::{DocumentType, ExtractionRecord, UNKNOWN};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// XML output
    Xml,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
            OutputFormat::Text => "txt",
        }
    }
}

/// Serialize a record in the requested format.
pub fn render(record: &ExtractionRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Xml => {
            let created_at = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();
            to_xml(record, &created_at)
        }
        OutputFormat::Text => Ok(to_text(record)),
    }
}

/// `<stem>_carte.<ext>` for identity cards, `<stem>_cv.<ext>` for résumés.
pub fn output_path(dir: &Path, input: &Path, document_type: DocumentType, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let suffix = match document_type {
        DocumentType::IdentityCard => "carte",
        DocumentType::Resume => "cv",
        DocumentType::Unknown => "inconnu",
    };
    dir.join(format!("{}_{}.{}", stem, suffix, format.extension()))
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

pub fn to_xml(record: &ExtractionRecord, created_at: &str) -> anyhow::Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let root = match record {
        ExtractionRecord::IdentityCard(_) => "IdentityCard",
        ExtractionRecord::Resume(_) => "Resume",
    };
    let mut start = BytesStart::new(root);
    start.push_attribute(("createdAt", created_at));
    writer.write_event(Event::Start(start))?;

    match record {
        ExtractionRecord::IdentityCard(card) => write_identity_card(&mut writer, card)?,
        ExtractionRecord::Resume(resume) => write_resume(&mut writer, resume)?,
    }

    writer.write_event(Event::End(BytesEnd::new(root)))?;
    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

fn write_identity_card(w: &mut XmlWriter, card: &IdentityCardRecord) -> anyhow::Result<()> {
    text_element(w, "lastName", or_unknown(&card.last_name))?;
    text_element(w, "firstName", or_unknown(&card.first_name))?;
    text_element(w, "birthDate", &date_or_unknown(card.birth_date))?;
    text_element(w, "cardNumber", or_unknown(&card.card_number))?;
    text_element(w, "birthPlace", or_unknown(&card.birth_place))?;
    text_element(w, "sex", card.sex.as_str())?;
    text_element(w, "address", or_unknown(&card.address))?;
    text_element(w, "expirationDate", &date_or_unknown(card.expiration_date))?;
    Ok(())
}

fn write_resume(w: &mut XmlWriter, resume: &ResumeRecord) -> anyhow::Result<()> {
    text_element(w, "lastName", or_unknown(&resume.last_name))?;
    text_element(w, "firstName", or_unknown(&resume.first_name))?;
    text_element(w, "birthDate", &date_or_unknown(resume.birth_date))?;
    text_element(w, "email", or_unknown(&resume.email))?;
    text_element(w, "phone", or_unknown(&resume.phone))?;
    text_element(w, "address", or_unknown(&resume.address))?;
    list_element(w, "skills", "skill", resume.skills.iter().map(String::as_str))?;
    write_languages(w, &resume.languages)?;
    list_element(w, "experiences", "experience", resume.experiences.iter().map(String::as_str))?;
    list_element(w, "educations", "education", resume.educations.iter().map(String::as_str))?;
    Ok(())
}

fn write_languages(w: &mut XmlWriter, languages: &[LanguageProficiency]) -> anyhow::Result<()> {
    if languages.is_empty() {
        w.write_event(Event::Empty(BytesStart::new("languages")))?;
        return Ok(());
    }

    w.write_event(Event::Start(BytesStart::new("languages")))?;
    for entry in languages {
        let mut start = BytesStart::new("language");
        start.push_attribute(("level", entry.level.as_str()));
        w.write_event(Event::Start(start))?;
        w.write_event(Event::Text(BytesText::new(&entry.language)))?;
        w.write_event(Event::End(BytesEnd::new("language")))?;
    }
    w.write_event(Event::End(BytesEnd::new("languages")))?;
    Ok(())
}

fn text_element(w: &mut XmlWriter, name: &str, value: &str) -> anyhow::Result<()> {
    w.write_event(Event::Start(BytesStart::new(name)))?;
    w.write_event(Event::Text(BytesText::new(value)))?;
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn list_element<'a>(
    w: &mut XmlWriter,
    name: &str,
    item: &str,
    values: impl ExactSizeIterator<Item = &'a str>,
) -> anyhow::Result<()> {
    if values.len() == 0 {
        w.write_event(Event::Empty(BytesStart::new(name)))?;
        return Ok(());
    }

    w.write_event(Event::Start(BytesStart::new(name)))?;
    for value in values {
        text_element(w, item, value)?;
    }
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn or_unknown(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(UNKNOWN)
}

fn date_or_unknown(value: Option<chrono::NaiveDate>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn to_text(record: &ExtractionRecord) -> String {
    let mut output = String::new();

    match record {
        ExtractionRecord::IdentityCard(card) => {
            output.push_str("Identity card\n");
            output.push_str(&format!("  Last name:       {}\n", or_unknown(&card.last_name)));
            output.push_str(&format!("  First name:      {}\n", or_unknown(&card.first_name)));
            output.push_str(&format!("  Birth date:      {}\n", date_or_unknown(card.birth_date)));
            output.push_str(&format!("  Birth place:     {}\n", or_unknown(&card.birth_place)));
            output.push_str(&format!("  Sex:             {}\n", card.sex));
            output.push_str(&format!("  Card number:     {}\n", or_unknown(&card.card_number)));
            output.push_str(&format!("  Address:         {}\n", or_unknown(&card.address)));
            output.push_str(&format!("  Expiration date: {}\n", date_or_unknown(card.expiration_date)));
        }
        ExtractionRecord::Resume(resume) => {
            output.push_str("Résumé\n");
            output.push_str(&format!("  Last name:  {}\n", or_unknown(&resume.last_name)));
            output.push_str(&format!("  First name: {}\n", or_unknown(&resume.first_name)));
            output.push_str(&format!("  Birth date: {}\n", date_or_unknown(resume.birth_date)));
            output.push_str(&format!("  Email:      {}\n", or_unknown(&resume.email)));
            output.push_str(&format!("  Phone:      {}\n", or_unknown(&resume.phone)));
            output.push_str(&format!("  Address:    {}\n", or_unknown(&resume.address)));

            let skills: Vec<String> = resume.skills.iter().cloned().collect();
            output.push_str(&format!("  Skills:     {}\n", join_or_unknown(skills)));

            let languages: Vec<String> = resume
                .languages
                .iter()
                .map(|l| format!("{} ({})", l.language, l.level))
                .collect();
            output.push_str(&format!("  Languages:  {}\n", join_or_unknown(languages)));

            for (title, entries) in [("Experience", &resume.experiences), ("Education", &resume.educations)] {
                output.push_str(&format!("\n{}:\n", title));
                if entries.is_empty() {
                    output.push_str(&format!("  {}\n", UNKNOWN));
                }
                for entry in entries {
                    output.push_str(&format!("  - {}\n", entry));
                }
            }
        }
    }

    output
}

fn join_or_unknown(items: Vec<String>) -> String {
    if items.is_empty() {
        return UNKNOWN.to_string();
    }
    items.join(", ")
}

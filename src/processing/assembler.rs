//! Structured record assembly
//!
//! Composes the skill matcher and the personal info extractor into one
//! record. Each top-level field carries its own outcome so a failing
//! resolver surfaces as a field-scoped error marker instead of
//! discarding the rest of the record.

use crate::config::Config;
use crate::error::Result;
use crate::processing::personal_info::{NamedEntity, PersonalInfoExtractor, PersonalInfoRecord};
use crate::processing::skills::SkillMatcher;
use crate::reference::ReferenceData;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Keywords that open a summary/about section. Turkish resumes use
/// "hakkımda" / "özgeçmiş" / "profil" headers.
const SUMMARY_KEYWORDS: [&str; 5] = ["hakkımda", "about", "summary", "özgeçmiş", "profil"];

/// Outcome of one top-level field. An error serializes as
/// `{"error": "..."}` so consumers can tell a failed resolver from an
/// empty result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldOutcome<T> {
    Error { error: String },
    Value(T),
}

impl<T> FieldOutcome<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            FieldOutcome::Value(v) => Some(v),
            FieldOutcome::Error { .. } => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FieldOutcome::Error { .. })
    }

    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(v) => FieldOutcome::Value(v),
            Err(e) => FieldOutcome::Error {
                error: e.to_string(),
            },
        }
    }
}

/// Fully assembled extraction result for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredRecord {
    pub personal_info: FieldOutcome<PersonalInfoRecord>,
    pub skills: FieldOutcome<Vec<String>>,
    pub summary: Option<String>,
}

pub struct RecordAssembler {
    skill_matcher: SkillMatcher,
    personal_info: PersonalInfoExtractor,
}

impl RecordAssembler {
    pub fn new(reference: Arc<ReferenceData>) -> Result<Self> {
        Ok(Self {
            skill_matcher: SkillMatcher::new(Arc::clone(&reference)),
            personal_info: PersonalInfoExtractor::new(reference)?,
        })
    }

    /// Load reference data per `config` and build the assembler.
    /// Fails when the taxonomy resource is missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        let reference = Arc::new(ReferenceData::load(config)?);
        Ok(Self {
            skill_matcher: SkillMatcher::with_max_ngram(Arc::clone(&reference), config.max_ngram),
            personal_info: PersonalInfoExtractor::new(reference)?,
        })
    }

    pub fn build(&self, text: &str) -> StructuredRecord {
        self.build_with_hint(text, None)
    }

    /// Assemble a record, feeding an optional NER hint to country
    /// resolution. Skill and personal info extraction are independent
    /// of each other.
    pub fn build_with_hint(
        &self,
        text: &str,
        entities: Option<&[NamedEntity]>,
    ) -> StructuredRecord {
        let personal_info =
            FieldOutcome::Value(self.personal_info.extract_with_hint(text, entities));
        let skills = FieldOutcome::Value(self.skill_matcher.extract_skills(text));
        let summary = extract_summary(text);

        StructuredRecord {
            personal_info,
            skills,
            summary,
        }
    }
}

/// Take up to 5 non-empty lines following a summary/about header in
/// the first 50 lines; without a header, the first 5 non-empty lines
/// of the document.
pub fn extract_summary(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let mut summary_lines: Vec<&str> = Vec::new();
    let mut found_header = false;

    for (i, line) in lines.iter().take(50).enumerate() {
        let lower = line.trim().to_lowercase();
        if !SUMMARY_KEYWORDS.iter().any(|k| lower.contains(k)) {
            continue;
        }
        for next in lines.iter().skip(i + 1).take(10) {
            let next = next.trim();
            if !next.is_empty() {
                summary_lines.push(next);
                if summary_lines.len() >= 5 {
                    break;
                }
            }
        }
        found_header = true;
        break;
    }

    if !found_header {
        summary_lines = lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .take(5)
            .collect();
    }

    if summary_lines.is_empty() {
        None
    } else {
        Some(summary_lines.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractorError;

    const TAXONOMY: &str = r#"{
        "languages": [
            {"name": "Python", "aliases": ["python3"]},
            {"name": "Rust"}
        ]
    }"#;

    const COUNTRIES: &str = r#"{"countries": {"Germany": ["Deutschland", "DE"]}}"#;

    fn assembler() -> RecordAssembler {
        let reference = ReferenceData::from_json(TAXONOMY, COUNTRIES).unwrap();
        RecordAssembler::new(Arc::new(reference)).unwrap()
    }

    #[test]
    fn test_summary_after_header() {
        let text = "Jane Carter\n\nABOUT ME\n\nBackend developer.\nLoves Rust.\n";
        assert_eq!(
            extract_summary(text),
            Some("Backend developer. Loves Rust.".to_string())
        );
    }

    #[test]
    fn test_summary_header_limit_of_five_lines() {
        let text = "SUMMARY\na\nb\nc\nd\ne\nf\ng";
        assert_eq!(extract_summary(text), Some("a b c d e".to_string()));
    }

    #[test]
    fn test_summary_fallback_to_leading_lines() {
        let text = "Jane Carter\nBackend developer\n\nEXPERIENCE\nCompany X\nCompany Y\nCompany Z";
        assert_eq!(
            extract_summary(text),
            Some("Jane Carter Backend developer EXPERIENCE Company X Company Y".to_string())
        );
    }

    #[test]
    fn test_summary_fallback_skips_blank_lines() {
        // blank lines do not count against the five-line budget
        let text = "a\n\nb\n\n\nc\nd\ne\nf";
        assert_eq!(extract_summary(text), Some("a b c d e".to_string()));
    }

    #[test]
    fn test_summary_empty_document() {
        assert_eq!(extract_summary(""), None);
    }

    #[test]
    fn test_build_populates_all_fields() {
        let assembler = assembler();
        let text = "Jane Carter\njane@example.com\nBerlin / Deutschland\n\nSKILLS\nPython and Rust";
        let record = assembler.build(text);

        let info = record.personal_info.value().unwrap();
        assert_eq!(info.name, Some("Jane Carter".to_string()));
        assert_eq!(info.country, Some("Germany".to_string()));
        assert_eq!(
            record.skills.value().unwrap(),
            &vec!["Python".to_string(), "Rust".to_string()]
        );
        assert!(record.summary.is_some());
    }

    #[test]
    fn test_empty_input_record() {
        let assembler = assembler();
        let record = assembler.build("");
        assert_eq!(
            record.personal_info.value().unwrap(),
            &PersonalInfoRecord::default()
        );
        assert!(record.skills.value().unwrap().is_empty());
        assert_eq!(record.summary, None);
    }

    #[test]
    fn test_field_error_wire_format() {
        let outcome: FieldOutcome<Vec<String>> = FieldOutcome::from_result(Err(
            ExtractorError::TextProcessing("bad input".to_string()),
        ));
        assert!(outcome.is_error());
        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(json, r#"{"error":"Text processing error: bad input"}"#);

        let parsed: FieldOutcome<Vec<String>> = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_error());
    }

    #[test]
    fn test_from_config_missing_taxonomy_is_fatal() {
        let config = Config {
            data_dir: std::path::PathBuf::from("no/such/dir"),
            ..Config::default()
        };
        assert!(RecordAssembler::from_config(&config).is_err());
    }
}

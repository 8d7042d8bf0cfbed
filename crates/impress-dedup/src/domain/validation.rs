//! Boundary validation for incoming records
//!
//! Import pipelines hand over loosely shaped JSON. `RecordInput` accepts that
//! shape, and conversion into `BibliographicRecord` rejects anything the
//! engine cannot work with.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BibliographicRecord, PublicationDate, Provenance};
use crate::error::{DedupError, Result};

/// Severity of a validation error
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

/// A validation error or warning
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub severity: ValidationSeverity,
}

impl ValidationError {
    fn error(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            severity: ValidationSeverity::Error,
        }
    }

    fn warning(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            severity: ValidationSeverity::Warning,
        }
    }
}

/// Author list as sources deliver it: either a list or one joined string
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AuthorsInput {
    List(Vec<String>),
    Joined(String),
}

impl AuthorsInput {
    fn into_names(self) -> Vec<String> {
        match self {
            AuthorsInput::List(names) => names
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            AuthorsInput::Joined(joined) => split_authors(&joined),
        }
    }
}

/// Split a joined author field on " and " (BibTeX style) and ";".
pub fn split_authors(authors: &str) -> Vec<String> {
    authors
        .split(" and ")
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Loosely typed record as received from an import pipeline
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInput {
    pub id: Option<String>,
    pub title: Option<String>,
    pub authors: Option<AuthorsInput>,
    #[serde(alias = "abstract")]
    pub abstract_text: Option<String>,
    pub journal: Option<String>,
    pub doi: Option<String>,
    pub pmid: Option<String>,
    #[serde(alias = "publication_date", alias = "date")]
    pub publication_date: Option<String>,
    pub source: Option<String>,
    #[serde(alias = "imported_at")]
    pub imported_at: Option<DateTime<Utc>>,
}

/// Validate a record input and return errors/warnings
pub fn validate_record(input: &RecordInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if blank(&input.id) {
        errors.push(ValidationError::error("id", "Record id is required"));
    }

    let has_title = !blank(&input.title);
    let has_identifier = !blank(&input.doi) || !blank(&input.pmid);
    if !has_title && !has_identifier {
        errors.push(ValidationError::error(
            "title",
            "A title, DOI or PMID is required to compare records",
        ));
    } else if !has_title {
        errors.push(ValidationError::warning("title", "Title is recommended"));
    }

    let has_authors = match &input.authors {
        Some(AuthorsInput::List(names)) => names.iter().any(|n| !n.trim().is_empty()),
        Some(AuthorsInput::Joined(joined)) => !joined.trim().is_empty(),
        None => false,
    };
    if !has_authors {
        errors.push(ValidationError::warning("authors", "Authors are recommended"));
    }

    if blank(&input.source) {
        errors.push(ValidationError::warning(
            "source",
            "Source is missing, recorded as \"unknown\"",
        ));
    }

    if let Some(doi) = non_blank(&input.doi) {
        if !doi.starts_with("10.") {
            errors.push(ValidationError::warning("doi", "DOI should start with '10.'"));
        }
    }

    if let Some(pmid) = non_blank(&input.pmid) {
        if !pmid.chars().all(|c| c.is_ascii_digit()) {
            errors.push(ValidationError::warning("pmid", "PMID should be numeric"));
        }
    }

    if let Some(date) = non_blank(&input.publication_date) {
        if PublicationDate::parse(date).is_none() {
            errors.push(ValidationError::warning(
                "publication_date",
                "Publication date is not parsable and will be ignored when scoring",
            ));
        }
    }

    errors
}

/// Check if a record input is valid (no errors)
pub fn is_valid(input: &RecordInput) -> bool {
    validate_record(input)
        .iter()
        .all(|e| !matches!(e.severity, ValidationSeverity::Error))
}

impl TryFrom<RecordInput> for BibliographicRecord {
    type Error = DedupError;

    fn try_from(input: RecordInput) -> Result<Self> {
        let problems = validate_record(&input);
        let errors: Vec<ValidationError> = problems
            .into_iter()
            .filter(|e| e.severity == ValidationSeverity::Error)
            .collect();
        if !errors.is_empty() {
            return Err(DedupError::InvalidRecord {
                id: input.id.unwrap_or_default(),
                errors,
            });
        }

        let source = non_blank(&input.source).unwrap_or("unknown").to_string();
        let provenance = Provenance {
            source,
            imported_at: input.imported_at.unwrap_or_else(Utc::now),
        };

        Ok(BibliographicRecord {
            id: input.id.map(|id| id.trim().to_string()).unwrap_or_default(),
            title: input.title.map(|t| t.trim().to_string()).unwrap_or_default(),
            authors: input.authors.map(AuthorsInput::into_names).unwrap_or_default(),
            abstract_text: trimmed(input.abstract_text),
            journal: trimmed(input.journal),
            doi: trimmed(input.doi),
            pmid: trimmed(input.pmid),
            publication_date: trimmed(input.publication_date),
            provenance,
        })
    }
}

/// Convert a batch of inputs, rejecting the batch on the first invalid
/// record or repeated id.
pub fn validate_batch(inputs: Vec<RecordInput>) -> Result<Vec<BibliographicRecord>> {
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(inputs.len());

    for input in inputs {
        let record = BibliographicRecord::try_from(input)?;
        if !seen.insert(record.id.clone()) {
            return Err(DedupError::DuplicateRecordId(record.id));
        }
        records.push(record);
    }

    Ok(records)
}

fn blank(value: &Option<String>) -> bool {
    non_blank(value).is_none()
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(id: &str, title: &str) -> RecordInput {
        RecordInput {
            id: Some(id.to_string()),
            title: Some(title.to_string()),
            authors: Some(AuthorsInput::List(vec!["Jane Doe".to_string()])),
            source: Some("pubmed".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_input_has_no_problems() {
        assert!(validate_record(&input("r1", "A title")).is_empty());
        assert!(is_valid(&input("r1", "A title")));
    }

    #[test]
    fn test_missing_id_is_error() {
        let mut raw = input("r1", "A title");
        raw.id = Some("   ".to_string());
        let errors = validate_record(&raw);
        assert!(errors
            .iter()
            .any(|e| e.field == "id" && e.severity == ValidationSeverity::Error));
        assert!(BibliographicRecord::try_from(raw).is_err());
    }

    #[test]
    fn test_identifier_without_title_is_only_warning() {
        let mut raw = input("r1", "");
        raw.doi = Some("10.1000/xyz".to_string());
        assert!(is_valid(&raw));
        let record = BibliographicRecord::try_from(raw).unwrap();
        assert_eq!(record.title, "");
        assert_eq!(record.doi.as_deref(), Some("10.1000/xyz"));
    }

    #[test]
    fn test_nothing_to_compare_is_error() {
        let raw = input("r1", " ");
        assert!(!is_valid(&raw));
    }

    #[test]
    fn test_warnings_do_not_block_conversion() {
        let mut raw = input("r1", "A title");
        raw.doi = Some("doi:10.1/x".to_string());
        raw.pmid = Some("PMC123".to_string());
        raw.publication_date = Some("Spring 2020".to_string());
        raw.source = None;

        let warnings = validate_record(&raw);
        assert_eq!(warnings.len(), 4);
        assert!(warnings
            .iter()
            .all(|w| w.severity == ValidationSeverity::Warning));

        let record = BibliographicRecord::try_from(raw).unwrap();
        assert_eq!(record.provenance.source, "unknown");
        assert_eq!(record.parsed_date(), None);
    }

    #[test]
    fn test_joined_authors_are_split() {
        let mut raw = input("r1", "A title");
        raw.authors = Some(AuthorsInput::Joined(
            "Smith, J. and Doe, J.; Roe, R.".to_string(),
        ));
        let record = BibliographicRecord::try_from(raw).unwrap();
        assert_eq!(record.authors, vec!["Smith, J.", "Doe, J.", "Roe, R."]);
    }

    #[test]
    fn test_deserialize_loose_json() {
        let json = r#"{
            "id": "pm-1",
            "title": "  Effects of Telemedicine  ",
            "authors": "Smith, J. and Doe, J.",
            "abstract": "Background...",
            "publicationDate": "2020-05",
            "source": "pubmed"
        }"#;
        let raw: RecordInput = serde_json::from_str(json).unwrap();
        let record = BibliographicRecord::try_from(raw).unwrap();
        assert_eq!(record.title, "Effects of Telemedicine");
        assert_eq!(record.abstract_text.as_deref(), Some("Background..."));
        assert_eq!(
            record.parsed_date(),
            Some(PublicationDate {
                year: 2020,
                month: Some(5)
            })
        );
    }

    #[test]
    fn test_batch_rejects_repeated_ids() {
        let err = validate_batch(vec![input("r1", "A"), input("r1", "B")]).unwrap_err();
        assert!(matches!(err, DedupError::DuplicateRecordId(id) if id == "r1"));
    }

    #[test]
    fn test_batch_keeps_order() {
        let records = validate_batch(vec![input("b", "B"), input("a", "A")]).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}

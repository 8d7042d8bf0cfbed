//! Bibliographic record domain model

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Where a record came from
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Provenance {
    /// Search source that supplied the record (pubmed, crossref, ...)
    pub source: String,
    pub imported_at: DateTime<Utc>,
}

impl Provenance {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            imported_at: Utc::now(),
        }
    }
}

/// An article gathered from a literature-search source.
///
/// Empty or whitespace-only strings are treated as absent by every
/// comparison and merge operation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BibliographicRecord {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub abstract_text: Option<String>,
    pub journal: Option<String>,
    pub doi: Option<String>,
    pub pmid: Option<String>,
    /// Raw publication date as supplied by the source
    pub publication_date: Option<String>,
    pub provenance: Provenance,
}

impl BibliographicRecord {
    /// Create a new record with required fields
    pub fn new(id: impl Into<String>, title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            authors: Vec::new(),
            abstract_text: None,
            journal: None,
            doi: None,
            pmid: None,
            publication_date: None,
            provenance: Provenance::new(source),
        }
    }

    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_abstract(mut self, abstract_text: impl Into<String>) -> Self {
        self.abstract_text = Some(abstract_text.into());
        self
    }

    pub fn with_journal(mut self, journal: impl Into<String>) -> Self {
        self.journal = Some(journal.into());
        self
    }

    pub fn with_doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }

    pub fn with_pmid(mut self, pmid: impl Into<String>) -> Self {
        self.pmid = Some(pmid.into());
        self
    }

    pub fn with_publication_date(mut self, date: impl Into<String>) -> Self {
        self.publication_date = Some(date.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        present(Some(&self.title))
    }

    pub fn abstract_text(&self) -> Option<&str> {
        present(self.abstract_text.as_ref())
    }

    pub fn journal(&self) -> Option<&str> {
        present(self.journal.as_ref())
    }

    pub fn doi(&self) -> Option<&str> {
        present(self.doi.as_ref())
    }

    pub fn pmid(&self) -> Option<&str> {
        present(self.pmid.as_ref())
    }

    pub fn publication_date(&self) -> Option<&str> {
        present(self.publication_date.as_ref())
    }

    /// Parsed year/month of the publication date, `None` when absent or unparsable
    pub fn parsed_date(&self) -> Option<PublicationDate> {
        self.publication_date().and_then(PublicationDate::parse)
    }

    /// Author names that are not blank
    pub fn authors(&self) -> Vec<&str> {
        self.authors
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .collect()
    }

    /// Number of non-empty fields among title, authors, abstract, journal,
    /// DOI, PMID and publication date.
    pub fn filled_field_count(&self) -> usize {
        [
            self.title().is_some(),
            !self.authors().is_empty(),
            self.abstract_text().is_some(),
            self.journal().is_some(),
            self.doi().is_some(),
            self.pmid().is_some(),
            self.publication_date().is_some(),
        ]
        .iter()
        .filter(|filled| **filled)
        .count()
    }

    /// Share of the seven merge-relevant fields that are filled
    pub fn completeness(&self) -> f64 {
        self.filled_field_count() as f64 / 7.0
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Year/month precision publication date
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationDate {
    pub year: i32,
    pub month: Option<u32>,
}

impl PublicationDate {
    /// Parse `YYYY`, `YYYY-MM`, `YYYY-MM-DD` (or `/` separated) and RFC 3339
    /// timestamps. Returns `None` for anything else.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self {
                year: ts.year(),
                month: Some(ts.month()),
            });
        }

        let normalized = raw.replace('/', "-");
        if let Ok(date) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
            return Some(Self {
                year: date.year(),
                month: Some(date.month()),
            });
        }

        let mut parts = normalized.split('-');
        let year = parse_year(parts.next()?)?;
        let month = match parts.next() {
            Some(m) => {
                let month: u32 = m.parse().ok()?;
                if !(1..=12).contains(&month) {
                    return None;
                }
                Some(month)
            }
            None => None,
        };
        if parts.next().is_some() {
            return None;
        }

        Some(Self { year, month })
    }
}

fn parse_year(s: &str) -> Option<i32> {
    if s.len() != 4 || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Fields that take part in similarity scoring
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    Title,
    Authors,
    Journal,
    PublicationDate,
    Doi,
    Pmid,
}

impl RecordField {
    pub const ALL: [RecordField; 6] = [
        RecordField::Title,
        RecordField::Authors,
        RecordField::Journal,
        RecordField::PublicationDate,
        RecordField::Doi,
        RecordField::Pmid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordField::Title => "title",
            RecordField::Authors => "authors",
            RecordField::Journal => "journal",
            RecordField::PublicationDate => "publication_date",
            RecordField::Doi => "doi",
            RecordField::Pmid => "pmid",
        }
    }
}

impl std::fmt::Display for RecordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

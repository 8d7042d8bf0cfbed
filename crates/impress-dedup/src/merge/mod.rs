//! Merging duplicate groups into canonical records
//!
//! The most complete record of a group becomes the primary. Its empty fields
//! are filled from the other members, authors are unioned and the longest
//! abstract wins. Source records are never touched; deleting them is up to
//! the caller.

use std::borrow::Borrow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::deduplication::ClusterResult;
use crate::domain::BibliographicRecord;

/// Resolution tag for merges made without a reviewer
pub const AUTO_MERGED: &str = "auto_merged";

/// Fields the merger can take from a donor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeField {
    Title,
    Authors,
    Abstract,
    Journal,
    Doi,
    Pmid,
    PublicationDate,
}

/// Which member supplied a field of the merged record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSource {
    pub field: MergeField,
    pub record_id: String,
}

/// Canonical record produced from a duplicate group
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    pub record: BibliographicRecord,
    /// Every member id in group order, primary included
    pub merged_from: Vec<String>,
    pub merged_at: DateTime<Utc>,
    pub resolution: String,
    /// Fields taken from members other than the primary
    pub fields_from_donors: Vec<FieldSource>,
}

impl MergedRecord {
    pub fn primary_id(&self) -> &str {
        &self.record.id
    }
}

/// Result of merging one group
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MergeOutcome {
    /// Single-record group, returned as is
    Unchanged(BibliographicRecord),
    Merged(MergedRecord),
}

impl MergeOutcome {
    pub fn record(&self) -> &BibliographicRecord {
        match self {
            MergeOutcome::Unchanged(record) => record,
            MergeOutcome::Merged(merged) => &merged.record,
        }
    }

    pub fn into_record(self) -> BibliographicRecord {
        match self {
            MergeOutcome::Unchanged(record) => record,
            MergeOutcome::Merged(merged) => merged.record,
        }
    }
}

/// Collapses duplicate groups into canonical records
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordMerger;

impl RecordMerger {
    pub fn new() -> Self {
        Self
    }

    /// Merge one group. An empty group yields `None`; a single record comes
    /// back unchanged.
    pub fn merge<R: Borrow<BibliographicRecord>>(&self, cluster: &[R]) -> Option<MergeOutcome> {
        let members: Vec<&BibliographicRecord> = cluster.iter().map(|r| r.borrow()).collect();
        match members.as_slice() {
            [] => None,
            [only] => Some(MergeOutcome::Unchanged((*only).clone())),
            _ => Some(MergeOutcome::Merged(merge_group(&members))),
        }
    }

    /// Merge every duplicate group of a clustering run over `records`
    pub fn merge_clusters(
        &self,
        records: &[BibliographicRecord],
        result: &ClusterResult,
    ) -> Vec<MergeOutcome> {
        result
            .duplicate_groups
            .iter()
            .filter_map(|group| {
                let members: Vec<&BibliographicRecord> =
                    group.indices.iter().filter_map(|i| records.get(*i)).collect();
                self.merge(&members)
            })
            .collect()
    }
}

/// Merge a group with the default merger
pub fn merge<R: Borrow<BibliographicRecord>>(cluster: &[R]) -> Option<MergeOutcome> {
    RecordMerger.merge(cluster)
}

/// Index of the most complete record; the first one wins ties
fn select_primary(members: &[&BibliographicRecord]) -> usize {
    let mut best_idx = 0usize;
    let mut best_score = members[0].filled_field_count();

    for (idx, record) in members.iter().enumerate().skip(1) {
        let score = record.filled_field_count();
        if score > best_score {
            best_score = score;
            best_idx = idx;
        }
    }

    best_idx
}

fn merge_group(members: &[&BibliographicRecord]) -> MergedRecord {
    let primary_idx = select_primary(members);
    let primary = members[primary_idx];
    let donors: Vec<&BibliographicRecord> = members
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != primary_idx)
        .map(|(_, record)| *record)
        .collect();

    let mut merged = primary.clone();
    let mut fields_from_donors = Vec::new();

    // Field fill: first donor in group order with a value
    for donor in &donors {
        if merged.title().is_none() && donor.title().is_some() {
            merged.title = donor.title.clone();
            fields_from_donors.push(source(MergeField::Title, donor));
        }
        if merged.journal().is_none() && donor.journal().is_some() {
            merged.journal = donor.journal.clone();
            fields_from_donors.push(source(MergeField::Journal, donor));
        }
        if merged.doi().is_none() && donor.doi().is_some() {
            merged.doi = donor.doi.clone();
            fields_from_donors.push(source(MergeField::Doi, donor));
        }
        if merged.pmid().is_none() && donor.pmid().is_some() {
            merged.pmid = donor.pmid.clone();
            fields_from_donors.push(source(MergeField::Pmid, donor));
        }
        if merged.publication_date().is_none() && donor.publication_date().is_some() {
            merged.publication_date = donor.publication_date.clone();
            fields_from_donors.push(source(MergeField::PublicationDate, donor));
        }
    }

    // Authors: union by exact string, primary's first
    let mut authors: Vec<String> = Vec::new();
    let mut author_donors: Vec<&BibliographicRecord> = Vec::new();
    for record in std::iter::once(&primary).chain(donors.iter()) {
        let mut contributed = false;
        for author in &record.authors {
            if author.trim().is_empty() || authors.contains(author) {
                continue;
            }
            authors.push(author.clone());
            contributed = true;
        }
        if contributed && record.id != primary.id {
            author_donors.push(*record);
        }
    }
    merged.authors = authors;
    for donor in author_donors {
        fields_from_donors.push(source(MergeField::Authors, donor));
    }

    // Abstract: longest wins, earlier member on ties
    let mut best_abstract = primary.abstract_text();
    let mut best_len = best_abstract.map_or(0, |a| a.chars().count());
    let mut abstract_donor: Option<&BibliographicRecord> = None;
    for donor in &donors {
        if let Some(text) = donor.abstract_text() {
            let len = text.chars().count();
            if len > best_len {
                best_abstract = Some(text);
                best_len = len;
                abstract_donor = Some(*donor);
            }
        }
    }
    if let Some(donor) = abstract_donor {
        merged.abstract_text = best_abstract.map(str::to_string);
        fields_from_donors.push(source(MergeField::Abstract, donor));
    }

    let merged_from: Vec<String> = members.iter().map(|r| r.id.clone()).collect();

    tracing::debug!(
        "Merged {} records into {} ({} field(s) from donors)",
        merged_from.len(),
        primary.id,
        fields_from_donors.len()
    );

    MergedRecord {
        record: merged,
        merged_from,
        merged_at: Utc::now(),
        resolution: AUTO_MERGED.to_string(),
        fields_from_donors,
    }
}

fn source(field: MergeField, record: &BibliographicRecord) -> FieldSource {
    FieldSource {
        field,
        record_id: record.id.clone(),
    }
}

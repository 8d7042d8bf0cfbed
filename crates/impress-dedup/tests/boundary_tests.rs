//! Record boundary and configuration loading tests

mod common;

use std::io::Write;

use common::fixtures::init_tracing;
use impress_dedup::domain::{validate_batch, AuthorsInput};
use impress_dedup::{
    BibliographicRecord, ConfigError, DedupConfig, DedupError, Deduplicator, MergeOutcome,
    RecordInput,
};
use tempfile::NamedTempFile;

// === Import Rows ===

#[test]
fn test_json_rows_become_records() {
    let rows = r#"[
        {
            "id": "pm-1",
            "title": "  Effects of Telemedicine on Rural Care ",
            "authors": "Jane Doe and John Smith",
            "abstract": "Telemedicine improved access.",
            "doi": "10.1/ABC",
            "date": "2021-03-15",
            "source": "pubmed"
        },
        {
            "id": "em-9",
            "title": "EFFECTS OF TELEMEDICINE ON RURAL CARE",
            "authors": ["Doe, J.", "Smith, John"],
            "journal": "Journal of Rural Health",
            "doi": "10.1/abc",
            "importedAt": "2024-01-02T03:04:05Z"
        }
    ]"#;
    let inputs: Vec<RecordInput> = serde_json::from_str(rows).unwrap();
    assert!(matches!(inputs[0].authors, Some(AuthorsInput::Joined(_))));

    let records = validate_batch(inputs).unwrap();
    assert_eq!(records[0].title, "Effects of Telemedicine on Rural Care");
    assert_eq!(records[0].authors, vec!["Jane Doe", "John Smith"]);
    assert_eq!(records[0].publication_date.as_deref(), Some("2021-03-15"));
    assert_eq!(records[1].provenance.source, "unknown");
    assert_eq!(
        records[1].provenance.imported_at.to_rfc3339(),
        "2024-01-02T03:04:05+00:00"
    );
}

#[test]
fn test_row_without_title_or_identifier_is_rejected() {
    let input = RecordInput {
        id: Some("x".to_string()),
        title: Some("   ".to_string()),
        journal: Some("Some Journal".to_string()),
        ..Default::default()
    };
    let err = BibliographicRecord::try_from(input).unwrap_err();
    match err {
        DedupError::InvalidRecord { id, errors } => {
            assert_eq!(id, "x");
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "title");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_repeated_id_rejects_batch() {
    let row = |title: &str| RecordInput {
        id: Some("dup".to_string()),
        title: Some(title.to_string()),
        ..Default::default()
    };
    let err = validate_batch(vec![row("One"), row("Two")]).unwrap_err();
    assert!(matches!(err, DedupError::DuplicateRecordId(ref id) if id == "dup"));
}

#[test]
fn test_deduplicator_over_import_rows() {
    init_tracing();
    let rows = r#"[
        {"id": "a", "title": "Effects of Telemedicine on Rural Care", "doi": "10.1/abc"},
        {"id": "b", "title": "Graph neural networks for chemistry"},
        {"id": "c", "title": "Effects of telemedicine on rural care", "doi": "10.1/ABC", "pmid": "42"}
    ]"#;
    let inputs: Vec<RecordInput> = serde_json::from_str(rows).unwrap();
    let dedup = Deduplicator::new();
    let (records, result) = dedup.cluster_inputs(inputs).unwrap();

    assert_eq!(result.unique_ids, vec!["b"]);
    let merged = dedup.merge_clusters(&records, &result);
    assert_eq!(merged.len(), 1);
    assert!(matches!(&merged[0], MergeOutcome::Merged(m) if m.primary_id() == "c"));
}

// === Config Files ===

#[test]
fn test_load_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[matching]
threshold = 0.9

[clustering]
threshold = 0.75

[scoring]
author_name_threshold = 0.85

[scoring.weights]
title = 0.5
"#
    )
    .unwrap();

    let config = DedupConfig::load(file.path()).unwrap();
    assert_eq!(config.matching.threshold, 0.9);
    assert_eq!(config.clustering.threshold, 0.75);
    assert_eq!(config.scoring.author_name_threshold, 0.85);
    assert_eq!(config.scoring.weights.title, 0.5);
    assert_eq!(config.scoring.weights.doi, 0.05);

    let dedup = Deduplicator::with_config(config).unwrap();
    assert_eq!(dedup.config().clustering.threshold, 0.75);
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = DedupConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_config_round_trips_through_toml() {
    let config = DedupConfig::default();
    let text = toml::to_string(&config).unwrap();
    assert_eq!(DedupConfig::from_toml_str(&text).unwrap(), config);
}

//! impress-dedup: duplicate detection and merging for bibliographic imports
//!
//! Records arriving from several databases (PubMed, Embase, Scopus, ...) are
//! compared field by field, grouped into duplicate clusters and collapsed
//! into canonical records:
//! - Field normalization and weighted similarity scoring
//! - Incremental matching of a new record against a project pool
//! - Anchor-based batch clustering of a whole collection
//! - Merging of duplicate groups into the most complete record
//! - Exact / strong / moderate detection rules
//!
//! Enable the `parallel` feature to score clustering candidates on rayon.

pub mod config;
pub mod deduplication;
pub mod domain;
pub mod error;
pub mod merge;

pub use config::{
    ClusteringConfig, DedupConfig, FieldThresholds, FieldWeights, MatchingConfig, RuleThresholds,
    ScoringConfig,
};
pub use deduplication::{
    BatchClusterer, ClusterResult, Deduplicator, DetectionRule, DetectionRules, PairwiseMatcher,
    SimilarityResult, SimilarityScorer,
};
pub use domain::{
    BibliographicRecord, DetectionStatus, DuplicateCluster, DuplicateDetection, Provenance,
    PublicationDate, RecordField, RecordInput, ValidationError, ValidationSeverity,
};
pub use error::{ConfigError, DedupError, Result};
pub use merge::{FieldSource, MergeField, MergeOutcome, MergedRecord, RecordMerger};

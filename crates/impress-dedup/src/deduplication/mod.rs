//! Duplicate detection for imported bibliographic records
//!
//! Scoring, incremental matching against a pool, anchor-based batch
//! clustering and the preconfigured detection rules.

mod clustering;
mod matching;
mod normalization;
mod orchestration;
mod rules;
mod similarity;

pub use clustering::{cluster, BatchClusterer, ClusterResult, DEFAULT_CLUSTER_THRESHOLD};
pub use matching::{find_candidates, PairwiseMatcher, DEFAULT_MATCH_THRESHOLD};
pub use normalization::{normalize, normalize_author_name};
pub use orchestration::Deduplicator;
pub use rules::{DetectionRule, DetectionRules};
pub use similarity::{
    compare, date_similarity, exact_similarity, text_similarity, SimilarityResult,
    SimilarityScorer,
};

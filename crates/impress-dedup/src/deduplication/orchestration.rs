//! Deduplication orchestration
//!
//! `Deduplicator` wires one `DedupConfig` through the scorer, matcher,
//! clusterer, rules and merger, for the two ways import pipelines use the
//! engine: incremental (each new record against the project pool) and batch
//! (a whole project at once).

use super::clustering::{BatchClusterer, ClusterResult};
use super::matching::PairwiseMatcher;
use super::rules::DetectionRules;
use super::similarity::{SimilarityResult, SimilarityScorer};
use crate::config::DedupConfig;
use crate::domain::{validate_batch, BibliographicRecord, DuplicateDetection, RecordInput};
use crate::error::Result;
use crate::merge::{MergeOutcome, RecordMerger};

/// Engine facade configured from a single `DedupConfig`
#[derive(Debug, Clone)]
pub struct Deduplicator {
    config: DedupConfig,
    scorer: SimilarityScorer,
    matcher: PairwiseMatcher,
    clusterer: BatchClusterer,
    rules: DetectionRules,
    merger: RecordMerger,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::from_validated(DedupConfig::default())
    }
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a config, rejecting invalid weights or thresholds
    pub fn with_config(config: DedupConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: DedupConfig) -> Self {
        let scorer = SimilarityScorer::with_config(config.scoring.clone());
        Self {
            matcher: PairwiseMatcher::new(scorer.clone()).with_threshold(config.matching.threshold),
            clusterer: BatchClusterer::new(scorer.clone())
                .with_threshold(config.clustering.threshold),
            rules: DetectionRules::new(scorer.clone(), config.rules.clone()),
            merger: RecordMerger::new(),
            scorer,
            config,
        }
    }

    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    pub fn rules(&self) -> &DetectionRules {
        &self.rules
    }

    pub fn compare(&self, a: &BibliographicRecord, b: &BibliographicRecord) -> SimilarityResult {
        self.scorer.compare(a, b)
    }

    /// Incremental mode: candidates for one newly imported record
    pub fn find_candidates(
        &self,
        new_record: &BibliographicRecord,
        pool: &[BibliographicRecord],
    ) -> Vec<DuplicateDetection> {
        self.matcher.find_candidates(new_record, pool)
    }

    /// Batch mode: group a whole collection
    pub fn cluster(&self, records: &[BibliographicRecord]) -> ClusterResult {
        self.clusterer.cluster(records)
    }

    pub fn merge(&self, cluster: &[BibliographicRecord]) -> Option<MergeOutcome> {
        self.merger.merge(cluster)
    }

    /// Merge every duplicate group of an earlier `cluster` run
    pub fn merge_clusters(
        &self,
        records: &[BibliographicRecord],
        result: &ClusterResult,
    ) -> Vec<MergeOutcome> {
        self.merger.merge_clusters(records, result)
    }

    /// Cluster `records` and merge every duplicate group
    pub fn cluster_and_merge(
        &self,
        records: &[BibliographicRecord],
    ) -> (ClusterResult, Vec<MergeOutcome>) {
        let result = self.cluster(records);
        let merged = self.merge_clusters(records, &result);
        (result, merged)
    }

    /// Validate raw import rows, then cluster them
    pub fn cluster_inputs(
        &self,
        inputs: Vec<RecordInput>,
    ) -> Result<(Vec<BibliographicRecord>, ClusterResult)> {
        let records = validate_batch(inputs)?;
        let result = self.cluster(&records);
        Ok((records, result))
    }
}

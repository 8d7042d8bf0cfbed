//! Incremental matching of one new record against an existing pool

use super::similarity::SimilarityScorer;
use crate::domain::{BibliographicRecord, DuplicateDetection};

/// Default score at or above which a pool member is reported
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.8;

/// Scores newly imported records against a candidate pool
#[derive(Debug, Clone)]
pub struct PairwiseMatcher {
    scorer: SimilarityScorer,
    threshold: f64,
}

impl Default for PairwiseMatcher {
    fn default() -> Self {
        Self {
            scorer: SimilarityScorer::default(),
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

impl PairwiseMatcher {
    pub fn new(scorer: SimilarityScorer) -> Self {
        Self {
            scorer,
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Detections for every pool member scoring at or above the threshold,
    /// best first. Equal scores keep pool order. Pool entries sharing the new
    /// record's id are skipped.
    pub fn find_candidates(
        &self,
        new_record: &BibliographicRecord,
        pool: &[BibliographicRecord],
    ) -> Vec<DuplicateDetection> {
        let mut detections: Vec<DuplicateDetection> = pool
            .iter()
            .filter(|candidate| candidate.id != new_record.id)
            .filter_map(|candidate| {
                let result = self.scorer.compare(new_record, candidate);
                if result.score >= self.threshold {
                    tracing::trace!(
                        "{} ~ {} scored {:.3} ({})",
                        new_record.id,
                        candidate.id,
                        result.score,
                        result.summary()
                    );
                    Some(DuplicateDetection::potential(
                        new_record.id.clone(),
                        candidate.id.clone(),
                        result.score,
                        result.matched_fields,
                    ))
                } else {
                    None
                }
            })
            .collect();

        // sort_by is stable, so ties stay in pool order
        detections.sort_by(|a, b| b.score.total_cmp(&a.score));

        tracing::debug!(
            "Record {} has {} duplicate candidate(s) in a pool of {}",
            new_record.id,
            detections.len(),
            pool.len()
        );
        detections
    }
}

/// Find candidates for `new_record` in `pool` with default scoring
pub fn find_candidates(
    new_record: &BibliographicRecord,
    pool: &[BibliographicRecord],
    threshold: f64,
) -> Vec<DuplicateDetection> {
    PairwiseMatcher::default()
        .with_threshold(threshold)
        .find_candidates(new_record, pool)
}

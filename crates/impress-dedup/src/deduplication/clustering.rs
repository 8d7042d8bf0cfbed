//! Batch clustering of a whole record collection
//!
//! Records are scanned in order. The first unassigned record becomes the
//! anchor of a new group, and every later unassigned record that scores at or
//! above the threshold against that anchor joins it. Membership is decided
//! only against the anchor: two members of one group need not be similar to
//! each other, and a record similar to a member (but not to the anchor) does
//! not join.
//!
//! # Parallel Processing
//!
//! With the `parallel` feature the comparisons of one anchor against its
//! remaining candidates run on rayon. Results are collected in candidate
//! order before membership is assigned, so grouping is identical either way.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::similarity::{SimilarityResult, SimilarityScorer};
use crate::domain::{BibliographicRecord, DuplicateCluster, DuplicateDetection};

/// Default score at or above which a record joins an anchor's group
pub const DEFAULT_CLUSTER_THRESHOLD: f64 = 0.8;

/// Output of one clustering run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterResult {
    /// Groups with more than one member, in anchor order
    pub duplicate_groups: Vec<DuplicateCluster>,
    /// Records that ended up alone, in input order
    pub unique_ids: Vec<String>,
    /// Every anchor-candidate pair that cleared the threshold
    pub detections: Vec<DuplicateDetection>,
}

impl ClusterResult {
    pub fn duplicate_record_count(&self) -> usize {
        self.duplicate_groups.iter().map(DuplicateCluster::len).sum()
    }

    /// The group a record belongs to, if it has duplicates
    pub fn group_of(&self, record_id: &str) -> Option<&DuplicateCluster> {
        self.duplicate_groups.iter().find(|g| g.contains(record_id))
    }
}

/// Anchor-based batch clusterer
#[derive(Debug, Clone)]
pub struct BatchClusterer {
    scorer: SimilarityScorer,
    threshold: f64,
}

impl Default for BatchClusterer {
    fn default() -> Self {
        Self {
            scorer: SimilarityScorer::default(),
            threshold: DEFAULT_CLUSTER_THRESHOLD,
        }
    }
}

impl BatchClusterer {
    pub fn new(scorer: SimilarityScorer) -> Self {
        Self {
            scorer,
            threshold: DEFAULT_CLUSTER_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn cluster(&self, records: &[BibliographicRecord]) -> ClusterResult {
        let n = records.len();
        let mut assigned = vec![false; n];
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut detections = Vec::new();
        let mut comparisons = 0usize;

        for anchor in 0..n {
            if assigned[anchor] {
                continue;
            }
            assigned[anchor] = true;

            // Only this anchor's scan can assign records, so the candidate
            // list stays accurate for the whole scan.
            let candidates: Vec<usize> = ((anchor + 1)..n).filter(|j| !assigned[*j]).collect();
            comparisons += candidates.len();

            let mut members = vec![anchor];
            for (j, result) in self.score_candidates(&records[anchor], records, &candidates) {
                if result.score < self.threshold {
                    continue;
                }
                tracing::trace!(
                    "{} joins anchor {} at {:.3} ({})",
                    records[j].id,
                    records[anchor].id,
                    result.score,
                    result.summary()
                );
                assigned[j] = true;
                members.push(j);
                detections.push(DuplicateDetection::potential(
                    records[anchor].id.clone(),
                    records[j].id.clone(),
                    result.score,
                    result.matched_fields,
                ));
            }
            groups.push(members);
        }

        let mut result = ClusterResult {
            detections,
            ..Default::default()
        };
        for members in groups {
            if members.len() > 1 {
                result.duplicate_groups.push(DuplicateCluster {
                    record_ids: members.iter().map(|i| records[*i].id.clone()).collect(),
                    indices: members,
                });
            } else {
                result.unique_ids.push(records[members[0]].id.clone());
            }
        }

        tracing::debug!(
            "Clustered {} records with {} comparisons: {} duplicate group(s), {} unique",
            n,
            comparisons,
            result.duplicate_groups.len(),
            result.unique_ids.len()
        );
        result
    }

    #[cfg(not(feature = "parallel"))]
    fn score_candidates(
        &self,
        anchor: &BibliographicRecord,
        records: &[BibliographicRecord],
        candidates: &[usize],
    ) -> Vec<(usize, SimilarityResult)> {
        candidates
            .iter()
            .map(|&j| (j, self.scorer.compare(anchor, &records[j])))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn score_candidates(
        &self,
        anchor: &BibliographicRecord,
        records: &[BibliographicRecord],
        candidates: &[usize],
    ) -> Vec<(usize, SimilarityResult)> {
        // Indexed collect keeps candidate order
        candidates
            .par_iter()
            .map(|&j| (j, self.scorer.compare(anchor, &records[j])))
            .collect()
    }
}

/// Cluster `records` with default scoring
pub fn cluster(records: &[BibliographicRecord], threshold: f64) -> ClusterResult {
    BatchClusterer::default()
        .with_threshold(threshold)
        .cluster(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    // DOI is the only field, so pairs score exactly 1.0 or 0.0
    fn with_doi(id: &str, doi: &str) -> BibliographicRecord {
        BibliographicRecord::new(id, "", "test").with_doi(doi)
    }

    #[test]
    fn test_empty_input() {
        let result = cluster(&[], 0.8);
        assert!(result.duplicate_groups.is_empty());
        assert!(result.unique_ids.is_empty());
        assert!(result.detections.is_empty());
    }

    #[test]
    fn test_single_record_is_unique() {
        let result = cluster(&[with_doi("a", "10.1/a")], 0.8);
        assert_eq!(result.unique_ids, vec!["a"]);
        assert!(result.duplicate_groups.is_empty());
    }

    #[test]
    fn test_groups_by_anchor() {
        let records = vec![
            with_doi("a", "10.1/x"),
            with_doi("b", "10.1/y"),
            with_doi("c", "10.1/X"),
            with_doi("d", "10.1/y"),
        ];
        let result = cluster(&records, 0.8);

        assert_eq!(result.duplicate_groups.len(), 2);
        assert_eq!(result.duplicate_groups[0].record_ids, vec!["a", "c"]);
        assert_eq!(result.duplicate_groups[0].indices, vec![0, 2]);
        assert_eq!(result.duplicate_groups[1].record_ids, vec!["b", "d"]);
        assert!(result.unique_ids.is_empty());
        assert_eq!(result.duplicate_record_count(), 4);

        let pairs: Vec<_> = result
            .detections
            .iter()
            .map(|d| (d.record_id.as_str(), d.candidate_id.as_str()))
            .collect();
        assert_eq!(pairs, vec![("a", "c"), ("b", "d")]);
    }

    #[test]
    fn test_assigned_record_is_not_an_anchor() {
        let records = vec![
            with_doi("a", "10.1/x"),
            with_doi("b", "10.1/x"),
            with_doi("c", "10.1/x"),
        ];
        let result = cluster(&records, 0.8);
        assert_eq!(result.duplicate_groups.len(), 1);
        assert_eq!(result.duplicate_groups[0].record_ids, vec!["a", "b", "c"]);
        // b never anchors, so there is no b-c detection
        assert_eq!(result.detections.len(), 2);
        assert!(result.detections.iter().all(|d| d.record_id == "a"));
    }

    #[test]
    fn test_group_of() {
        let records = vec![with_doi("a", "10.1/x"), with_doi("b", "10.1/x")];
        let result = cluster(&records, 0.8);
        assert_eq!(result.group_of("b").and_then(|g| g.anchor_id()), Some("a"));
        assert!(result.group_of("z").is_none());
    }
}

//! Preconfigured duplicate predicates of increasing leniency

use serde::{Deserialize, Serialize};

use super::similarity::{exact_similarity, SimilarityScorer};
use crate::config::RuleThresholds;
use crate::domain::BibliographicRecord;

/// Strictness level of a duplicate rule, strictest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionRule {
    /// Shared DOI or PMID
    Exact,
    /// Overall score of at least 0.9 (by default)
    Strong,
    /// Overall score of at least 0.7 (by default)
    Moderate,
}

/// Rule predicates over a scorer. Every call rescores the pair.
#[derive(Debug, Clone, Default)]
pub struct DetectionRules {
    scorer: SimilarityScorer,
    thresholds: RuleThresholds,
}

impl DetectionRules {
    pub fn new(scorer: SimilarityScorer, thresholds: RuleThresholds) -> Self {
        Self { scorer, thresholds }
    }

    /// Both records carry the same DOI, or the same PMID
    pub fn exact(&self, a: &BibliographicRecord, b: &BibliographicRecord) -> bool {
        exact_similarity(a.doi(), b.doi()) == Some(1.0)
            || exact_similarity(a.pmid(), b.pmid()) == Some(1.0)
    }

    pub fn strong(&self, a: &BibliographicRecord, b: &BibliographicRecord) -> bool {
        self.scorer.compare(a, b).score >= self.thresholds.strong
    }

    pub fn moderate(&self, a: &BibliographicRecord, b: &BibliographicRecord) -> bool {
        self.scorer.compare(a, b).score >= self.thresholds.moderate
    }

    pub fn matches(
        &self,
        rule: DetectionRule,
        a: &BibliographicRecord,
        b: &BibliographicRecord,
    ) -> bool {
        match rule {
            DetectionRule::Exact => self.exact(a, b),
            DetectionRule::Strong => self.strong(a, b),
            DetectionRule::Moderate => self.moderate(a, b),
        }
    }

    /// The strictest rule the pair satisfies
    pub fn classify(
        &self,
        a: &BibliographicRecord,
        b: &BibliographicRecord,
    ) -> Option<DetectionRule> {
        if self.exact(a, b) {
            return Some(DetectionRule::Exact);
        }
        let score = self.scorer.compare(a, b).score;
        if score >= self.thresholds.strong {
            Some(DetectionRule::Strong)
        } else if score >= self.thresholds.moderate {
            Some(DetectionRule::Moderate)
        } else {
            None
        }
    }
}

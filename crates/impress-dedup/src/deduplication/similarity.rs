//! Similarity scoring for deduplication

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::normalization::{normalize, normalize_author_name};
use crate::config::ScoringConfig;
use crate::domain::{BibliographicRecord, PublicationDate, RecordField};

/// Result of comparing two records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// Overall similarity score (0.0 to 1.0)
    pub score: f64,
    /// Per-field similarity, only for fields present on both records
    pub field_scores: BTreeMap<RecordField, f64>,
    /// Fields whose similarity cleared that field's threshold
    pub matched_fields: Vec<RecordField>,
}

impl SimilarityResult {
    pub fn field_score(&self, field: RecordField) -> Option<f64> {
        self.field_scores.get(&field).copied()
    }

    pub fn is_matched(&self, field: RecordField) -> bool {
        self.matched_fields.contains(&field)
    }

    /// Human-readable explanation, e.g. "title 92%, authors 100%"
    pub fn summary(&self) -> String {
        if self.field_scores.is_empty() {
            return "No comparable fields".to_string();
        }
        self.field_scores
            .iter()
            .map(|(field, score)| format!("{} {:.0}%", field, score * 100.0))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Weighted multi-field record comparison
#[derive(Debug, Clone, Default)]
pub struct SimilarityScorer {
    config: ScoringConfig,
}

impl SimilarityScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Compare two records field by field and combine the field scores.
    ///
    /// Fields missing on either side are left out of both the weighted sum
    /// and the weight total. A DOI or PMID match forces the score to 1.0.
    pub fn compare(&self, a: &BibliographicRecord, b: &BibliographicRecord) -> SimilarityResult {
        let mut field_scores = BTreeMap::new();

        if let (Some(ta), Some(tb)) = (a.title(), b.title()) {
            field_scores.insert(RecordField::Title, self.text_similarity(ta, tb));
        }

        let (authors_a, authors_b) = (a.authors(), b.authors());
        if !authors_a.is_empty() && !authors_b.is_empty() {
            field_scores.insert(
                RecordField::Authors,
                self.author_similarity(&authors_a, &authors_b),
            );
        }

        if let (Some(ja), Some(jb)) = (a.journal(), b.journal()) {
            field_scores.insert(RecordField::Journal, self.text_similarity(ja, jb));
        }

        if let (Some(da), Some(db)) = (a.parsed_date(), b.parsed_date()) {
            field_scores.insert(RecordField::PublicationDate, date_similarity(da, db));
        }

        if let Some(score) = exact_similarity(a.doi(), b.doi()) {
            field_scores.insert(RecordField::Doi, score);
        }

        if let Some(score) = exact_similarity(a.pmid(), b.pmid()) {
            field_scores.insert(RecordField::Pmid, score);
        }

        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        for (field, score) in &field_scores {
            let weight = self.config.weights.get(*field);
            weighted_sum += weight * score;
            weight_total += weight;
        }

        let identifier_match = [RecordField::Doi, RecordField::Pmid]
            .iter()
            .any(|f| field_scores.get(f) == Some(&1.0));

        let score = if identifier_match {
            1.0
        } else if weight_total > 0.0 {
            (weighted_sum / weight_total).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let matched_fields = field_scores
            .iter()
            .filter(|(field, score)| **score >= self.config.thresholds.get(**field))
            .map(|(field, _)| *field)
            .collect();

        SimilarityResult {
            score,
            field_scores,
            matched_fields,
        }
    }

    /// Fuzzy similarity of two free-text values.
    ///
    /// Identical strings score 1.0. Otherwise both sides are normalized and
    /// scored as a weighted blend of token Jaccard and character-trigram
    /// Jaccard.
    pub fn text_similarity(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }

        let norm_a = normalize(a);
        let norm_b = normalize(b);

        let words = word_jaccard(&norm_a, &norm_b, self.config.min_token_len);
        let trigrams = trigram_jaccard(&norm_a, &norm_b);

        let total = self.config.word_weight + self.config.trigram_weight;
        if total <= 0.0 {
            return 0.0;
        }
        ((self.config.word_weight * words + self.config.trigram_weight * trigrams) / total)
            .clamp(0.0, 1.0)
    }

    /// Share of names in `a` that have a close name somewhere in `b`,
    /// divided by the longer list's length.
    ///
    /// Each name in `a` is checked against all of `b` independently, so two
    /// names in `a` may both count against the same name in `b`.
    pub fn author_similarity(&self, a: &[&str], b: &[&str]) -> f64 {
        let longest = a.len().max(b.len());
        if longest == 0 {
            return 0.0;
        }

        let names_b: Vec<String> = b.iter().map(|n| normalize_author_name(n)).collect();

        let matches = a
            .iter()
            .filter(|raw_a| {
                let name_a = normalize_author_name(raw_a);
                names_b.iter().any(|name_b| {
                    self.text_similarity(&name_a, name_b) > self.config.author_name_threshold
                })
            })
            .count();

        matches as f64 / longest as f64
    }
}

/// Compare two records with the default scoring configuration
pub fn compare(a: &BibliographicRecord, b: &BibliographicRecord) -> SimilarityResult {
    SimilarityScorer::default().compare(a, b)
}

/// Fuzzy text similarity with the default scoring configuration
pub fn text_similarity(a: &str, b: &str) -> f64 {
    SimilarityScorer::default().text_similarity(a, b)
}

/// 1.0 for a case-insensitive match, 0.0 otherwise, `None` when either side
/// is missing.
pub fn exact_similarity(a: Option<&str>, b: Option<&str>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => {
            if a.trim().to_lowercase() == b.trim().to_lowercase() {
                Some(1.0)
            } else {
                Some(0.0)
            }
        }
        _ => None,
    }
}

/// Year/month proximity of two publication dates
pub fn date_similarity(a: PublicationDate, b: PublicationDate) -> f64 {
    if a.year == b.year {
        if a.month == b.month {
            1.0
        } else {
            0.9
        }
    } else if (a.year - b.year).abs() == 1 {
        0.7
    } else {
        0.0
    }
}

/// Jaccard similarity of the token sets, ignoring short tokens
fn word_jaccard(a: &str, b: &str, min_len: usize) -> f64 {
    let tokens = |s: &str| -> HashSet<String> {
        s.split_whitespace()
            .filter(|t| t.chars().count() >= min_len)
            .map(str::to_string)
            .collect()
    };
    jaccard(&tokens(a), &tokens(b))
}

/// Jaccard similarity of overlapping 3-character windows, whitespace removed
fn trigram_jaccard(a: &str, b: &str) -> f64 {
    jaccard(&trigrams(a), &trigrams(b))
}

fn trigrams(s: &str) -> HashSet<String> {
    let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
    chars
        .windows(3)
        .map(|window| window.iter().collect::<String>())
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

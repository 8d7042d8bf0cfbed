//! Configuration for impress-dedup
//!
//! Field weights, per-field match thresholds and the decision thresholds used
//! by the matcher, clusterer and detection rules. Every section has defaults,
//! so a TOML file only needs the values it overrides:
//!
//! ```toml
//! [matching]
//! threshold = 0.85
//!
//! [scoring.weights]
//! title = 0.5
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::RecordField;
use crate::error::ConfigError;

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    pub scoring: ScoringConfig,
    pub matching: MatchingConfig,
    pub clustering: ClusteringConfig,
    pub rules: RuleThresholds,
}

impl DedupConfig {
    /// Parse a TOML document; missing sections keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: DedupConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!("Loaded dedup config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.validate()?;
        check_threshold("matching.threshold", self.matching.threshold)?;
        check_threshold("clustering.threshold", self.clustering.threshold)?;
        check_threshold("rules.strong", self.rules.strong)?;
        check_threshold("rules.moderate", self.rules.moderate)?;
        Ok(())
    }
}

/// Similarity scoring parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Contribution of each field to the overall score
    pub weights: FieldWeights,
    /// Per-field similarity needed to list a field as matched
    pub thresholds: FieldThresholds,
    /// Two author names match when their similarity is strictly above this
    pub author_name_threshold: f64,
    /// Share of token Jaccard in fuzzy text similarity
    pub word_weight: f64,
    /// Share of trigram Jaccard in fuzzy text similarity
    pub trigram_weight: f64,
    /// Tokens shorter than this are ignored by token Jaccard
    pub min_token_len: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: FieldWeights::default(),
            thresholds: FieldThresholds::default(),
            author_name_threshold: 0.8,
            word_weight: 0.7,
            trigram_weight: 0.3,
            min_token_len: 3,
        }
    }
}

impl ScoringConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let mut total = 0.0;
        for field in RecordField::ALL {
            let weight = self.weights.get(field);
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    field: field.to_string(),
                    value: weight,
                });
            }
            total += weight;
            check_threshold(
                &format!("scoring.thresholds.{}", field),
                self.thresholds.get(field),
            )?;
        }
        if total <= 0.0 {
            return Err(ConfigError::NoPositiveWeights);
        }

        for (name, weight) in [
            ("word_weight", self.word_weight),
            ("trigram_weight", self.trigram_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    field: name.to_string(),
                    value: weight,
                });
            }
        }
        check_threshold("scoring.author_name_threshold", self.author_name_threshold)
    }
}

/// Per-field weights of the overall score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub title: f64,
    pub authors: f64,
    pub journal: f64,
    pub publication_date: f64,
    pub doi: f64,
    pub pmid: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 0.40,
            authors: 0.25,
            journal: 0.15,
            publication_date: 0.10,
            doi: 0.05,
            pmid: 0.05,
        }
    }
}

impl FieldWeights {
    pub fn get(&self, field: RecordField) -> f64 {
        match field {
            RecordField::Title => self.title,
            RecordField::Authors => self.authors,
            RecordField::Journal => self.journal,
            RecordField::PublicationDate => self.publication_date,
            RecordField::Doi => self.doi,
            RecordField::Pmid => self.pmid,
        }
    }
}

/// Per-field thresholds for `matched_fields`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldThresholds {
    pub title: f64,
    pub authors: f64,
    pub journal: f64,
    pub publication_date: f64,
    pub doi: f64,
    pub pmid: f64,
}

impl Default for FieldThresholds {
    fn default() -> Self {
        Self {
            title: 0.85,
            authors: 0.75,
            journal: 0.80,
            publication_date: 0.90,
            doi: 1.0,
            pmid: 1.0,
        }
    }
}

impl FieldThresholds {
    pub fn get(&self, field: RecordField) -> f64 {
        match field {
            RecordField::Title => self.title,
            RecordField::Authors => self.authors,
            RecordField::Journal => self.journal,
            RecordField::PublicationDate => self.publication_date,
            RecordField::Doi => self.doi,
            RecordField::Pmid => self.pmid,
        }
    }
}

/// Incremental (one new record against a pool) matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self { threshold: 0.8 }
    }
}

/// Batch clustering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    pub threshold: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self { threshold: 0.8 }
    }
}

/// Score cut-offs for the strong and moderate detection rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleThresholds {
    pub strong: f64,
    pub moderate: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            strong: 0.9,
            moderate: 0.7,
        }
    }
}

fn check_threshold(name: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidThreshold {
            name: name.to_string(),
            value,
        });
    }
    Ok(())
}

//! Error types for impress-dedup

use thiserror::Error;

use crate::domain::{DetectionStatus, ValidationError};

/// Result type alias for deduplication operations
pub type Result<T> = std::result::Result<T, DedupError>;

/// Main error type for the record boundary and reviewer workflow
#[derive(Error, Debug)]
pub enum DedupError {
    /// A record failed boundary validation
    #[error("Invalid record {id:?}: {}", summarize(.errors))]
    InvalidRecord {
        id: String,
        errors: Vec<ValidationError>,
    },

    /// Two records in one batch share an id
    #[error("Duplicate record id in batch: {0}")]
    DuplicateRecordId(String),

    /// Reviewer status change that is not allowed
    #[error("Invalid status transition from {from:?} to {to:?}")]
    InvalidStatusTransition {
        from: DetectionStatus,
        to: DetectionStatus,
    },

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(String),

    /// Weight that is negative or not finite
    #[error("Invalid weight for {field}: {value}")]
    InvalidWeight { field: String, value: f64 },

    /// Threshold outside [0, 1]
    #[error("Threshold {name} must be within [0, 1], got {value}")]
    InvalidThreshold { name: String, value: f64 },

    /// Every field weight is zero
    #[error("At least one field weight must be positive")]
    NoPositiveWeights,
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

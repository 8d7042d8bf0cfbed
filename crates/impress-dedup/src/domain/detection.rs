//! Duplicate detections and clusters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordField;
use crate::error::{DedupError, Result};

/// Review state of a detection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStatus {
    Potential,
    Confirmed,
    Rejected,
}

/// A pair of records that scored above a duplicate threshold
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DuplicateDetection {
    pub id: String,
    /// The record being checked (new record or cluster anchor)
    pub record_id: String,
    /// The record it was matched against
    pub candidate_id: String,
    pub score: f64,
    pub matched_fields: Vec<RecordField>,
    pub status: DetectionStatus,
    pub note: Option<String>,
    pub detected_at: DateTime<Utc>,
}

impl DuplicateDetection {
    /// New detections always start as `Potential`
    pub fn potential(
        record_id: impl Into<String>,
        candidate_id: impl Into<String>,
        score: f64,
        matched_fields: Vec<RecordField>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            record_id: record_id.into(),
            candidate_id: candidate_id.into(),
            score,
            matched_fields,
            status: DetectionStatus::Potential,
            note: None,
            detected_at: Utc::now(),
        }
    }

    /// Apply a reviewer decision. Only potential detections can be reviewed,
    /// and only into `Confirmed` or `Rejected`.
    pub fn review(&mut self, status: DetectionStatus, note: Option<String>) -> Result<()> {
        if self.status != DetectionStatus::Potential || status == DetectionStatus::Potential {
            return Err(DedupError::InvalidStatusTransition {
                from: self.status,
                to: status,
            });
        }
        self.status = status;
        if note.is_some() {
            self.note = note;
        }
        Ok(())
    }

    pub fn involves(&self, record_id: &str) -> bool {
        self.record_id == record_id || self.candidate_id == record_id
    }
}

/// One group produced by a batch clustering run. The anchor comes first.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DuplicateCluster {
    pub record_ids: Vec<String>,
    /// Positions of the members in the clustered slice
    pub indices: Vec<usize>,
}

impl DuplicateCluster {
    pub fn anchor_id(&self) -> Option<&str> {
        self.record_ids.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.record_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_ids.is_empty()
    }

    pub fn contains(&self, record_id: &str) -> bool {
        self.record_ids.iter().any(|id| id == record_id)
    }
}

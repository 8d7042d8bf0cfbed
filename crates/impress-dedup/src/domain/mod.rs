//! Domain types for duplicate detection
//!
//! - BibliographicRecord: an imported article with provenance
//! - DuplicateDetection: a scored candidate pair awaiting review
//! - DuplicateCluster: one group from a batch clustering run
//! - RecordInput: the loosely typed boundary shape, validated on conversion

pub mod detection;
pub mod record;
pub mod validation;

pub use detection::*;
pub use record::*;
pub use validation::*;

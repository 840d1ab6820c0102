//! Analysis result aggregation modules
//!
//! - Result types (chords, segments, service response)
//! - Metadata

pub mod metadata;
pub mod result;

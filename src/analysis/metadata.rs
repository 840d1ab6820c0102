//! Analysis metadata structures

use serde::{Deserialize, Serialize};

/// Analysis metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Algorithm version
    pub algorithm_version: String,

    /// Extractor hop length in samples (0 when chroma was supplied directly)
    pub hop_length: usize,

    /// Number of chroma frames matched
    pub frame_count: usize,

    /// Frames skipped for falling under the confidence floor
    pub dropped_frames: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,
}

impl Default for AnalysisMetadata {
    fn default() -> Self {
        Self {
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            hop_length: 0,
            frame_count: 0,
            dropped_frames: 0,
            processing_time_ms: 0.0,
        }
    }
}

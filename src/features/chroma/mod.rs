//! Chroma extraction modules
//!
//! Pitch-class distribution (12 semitones) over time:
//! - `ChromaExtractor` seam and the built-in STFT extractor
//! - Normalization
//! - Temporal smoothing

pub mod extractor;
pub mod normalization;
pub mod smoothing;

pub use extractor::StftChromaExtractor;

use crate::error::AnalysisError;

/// Number of pitch classes per chroma vector
pub const N_PITCH_CLASSES: usize = 12;

/// A sequence of chroma frames with their timestamps
///
/// Frames are indexed C=0 … B=11 and must be non-negative. `times[i]` is the
/// time in seconds of `frames[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chromagram {
    /// One 12-bin chroma vector per frame
    pub frames: Vec<[f32; N_PITCH_CLASSES]>,

    /// Frame timestamps in seconds, non-decreasing
    pub times: Vec<f32>,
}

impl Chromagram {
    /// Create a chromagram from frames and timestamps
    pub fn new(frames: Vec<[f32; N_PITCH_CLASSES]>, times: Vec<f32>) -> Self {
        Self { frames, times }
    }

    /// Build from variable-length rows, checking each has 12 bins
    ///
    /// # Errors
    ///
    /// `AnalysisError::InvalidInput` if any row is not 12 elements long
    pub fn from_rows(rows: &[Vec<f32>], times: Vec<f32>) -> Result<Self, AnalysisError> {
        let mut frames = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let frame: [f32; N_PITCH_CLASSES] = row.as_slice().try_into().map_err(|_| {
                AnalysisError::InvalidInput(format!(
                    "Chroma vector at index {} has {} elements, expected {}",
                    i,
                    row.len(),
                    N_PITCH_CLASSES
                ))
            })?;
            frames.push(frame);
        }
        Ok(Self { frames, times })
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if there are no frames
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Iterate `(time, frame)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (f32, &[f32; N_PITCH_CLASSES])> + '_ {
        self.times.iter().copied().zip(self.frames.iter())
    }

    /// Check the extractor contract
    ///
    /// # Errors
    ///
    /// - `InternalInconsistency` if frame and time counts differ, or times are
    ///   negative, non-finite or decreasing
    /// - `InvalidInput` if any energy is negative or non-finite
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.frames.len() != self.times.len() {
            return Err(AnalysisError::InternalInconsistency(format!(
                "chromagram has {} frames but {} timestamps",
                self.frames.len(),
                self.times.len()
            )));
        }

        let mut prev = 0.0f32;
        for (i, (t, frame)) in self.iter().enumerate() {
            if !t.is_finite() || t < 0.0 {
                return Err(AnalysisError::InternalInconsistency(format!(
                    "invalid timestamp {} at frame {}",
                    t, i
                )));
            }
            if t < prev {
                return Err(AnalysisError::InternalInconsistency(format!(
                    "timestamps decrease at frame {} ({} < {})",
                    i, t, prev
                )));
            }
            if frame.iter().any(|&x| !x.is_finite() || x < 0.0) {
                return Err(AnalysisError::InvalidInput(format!(
                    "chroma frame {} has negative or non-finite energy",
                    i
                )));
            }
            prev = t;
        }

        Ok(())
    }
}

/// Source of chroma features
///
/// The engine only depends on this trait; any time-frequency front end that
/// yields non-negative pitch-class energies at known frame times will do.
pub trait ChromaExtractor {
    /// Compute a chromagram with one frame every `hop_length` samples
    ///
    /// # Errors
    ///
    /// Implementations report their own failures as
    /// `AnalysisError::ExtractionFailure`.
    fn extract(
        &self,
        samples: &[f32],
        sample_rate: u32,
        hop_length: usize,
    ) -> Result<Chromagram, AnalysisError>;
}

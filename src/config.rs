//! Configuration parameters for chord analysis

use crate::error::AnalysisError;

/// How the representative confidence of a closed segment is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentConfidence {
    /// Confidence of the frame that closes the segment (the next qualifying
    /// frame with a different label), or the last frame seen at end of stream
    #[default]
    ClosingFrame,
    /// Mean confidence over the segment's qualifying frames
    Mean,
    /// Minimum confidence over the segment's qualifying frames
    Minimum,
}

/// Chroma extraction parameters for the built-in STFT extractor
#[derive(Debug, Clone)]
pub struct ChromaConfig {
    /// FFT window length in samples (default: 4096)
    ///
    /// Independent of the hop: with the default 0.5 s frames at 22050 Hz the
    /// window covers the centre ~186 ms of each hop.
    pub frame_size: usize,

    /// Tuning reference for A4 (default: 440.0 Hz)
    pub center_frequency: f32,

    /// Lowest frequency folded into the chroma (default: 55.0 Hz, A1)
    pub min_frequency: f32,

    /// Highest frequency folded into the chroma (default: 5000.0 Hz)
    pub max_frequency: f32,

    /// Enable soft chroma mapping (default: false)
    /// Soft mapping spreads frequency bins to neighboring semitones
    pub soft_chroma_mapping: bool,

    /// Soft mapping standard deviation in semitones (default: 0.5)
    pub soft_mapping_sigma: f32,
}

impl Default for ChromaConfig {
    fn default() -> Self {
        Self {
            frame_size: 4096,
            center_frequency: 440.0,
            min_frequency: 55.0,
            max_frequency: 5000.0,
            soft_chroma_mapping: false,
            soft_mapping_sigma: 0.5,
        }
    }
}

/// Chord analysis configuration parameters
#[derive(Debug, Clone)]
pub struct ChordConfig {
    /// Analysis frame duration in seconds (default: 0.5)
    ///
    /// Converted to the extractor hop length. Larger frames smooth over
    /// transients but blur rapid chord changes.
    pub frame_duration_seconds: f32,

    /// Minimum frame confidence for a frame to take part in segmentation (default: 0.3)
    /// Frames below this floor are skipped, never treated as boundaries
    pub min_confidence: f32,

    /// Segment confidence policy (default: ClosingFrame)
    pub segment_confidence: SegmentConfidence,

    /// Temporal smoothing window in frames (default: 1 = disabled)
    pub smoothing_window: usize,

    /// Chroma extraction parameters
    pub chroma: ChromaConfig,
}

impl ChordConfig {
    /// Reference sample rate the engine is tuned for
    pub const DEFAULT_SAMPLE_RATE: u32 = 22050;

    /// Hop length in samples for a given sample rate
    ///
    /// Floors `sample_rate * frame_duration_seconds`. The product is nudged up
    /// by one f32 ulp so durations like 0.01 s, stored just below their decimal
    /// value, still give whole-sample hops (441 at 44100 Hz).
    pub fn hop_length(&self, sample_rate: u32) -> usize {
        let hop = sample_rate as f64 * self.frame_duration_seconds as f64;
        (hop + hop * f32::EPSILON as f64).floor() as usize
    }

    /// Check that every parameter is in range
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` naming the first offending field
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.frame_duration_seconds.is_finite() || self.frame_duration_seconds <= 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "frame_duration_seconds must be positive, got {}",
                self.frame_duration_seconds
            )));
        }

        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(AnalysisError::InvalidInput(format!(
                "min_confidence must be in [0, 1], got {}",
                self.min_confidence
            )));
        }

        if self.smoothing_window == 0 {
            return Err(AnalysisError::InvalidInput(
                "smoothing_window must be at least 1".to_string(),
            ));
        }

        let chroma = &self.chroma;
        if chroma.frame_size < 2 {
            return Err(AnalysisError::InvalidInput(format!(
                "chroma frame_size must be at least 2, got {}",
                chroma.frame_size
            )));
        }
        if !chroma.center_frequency.is_finite() || chroma.center_frequency <= 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "center_frequency must be positive, got {}",
                chroma.center_frequency
            )));
        }
        if !chroma.min_frequency.is_finite()
            || !chroma.max_frequency.is_finite()
            || chroma.min_frequency <= 0.0
            || chroma.max_frequency <= chroma.min_frequency
        {
            return Err(AnalysisError::InvalidInput(format!(
                "invalid chroma frequency range [{}, {}]",
                chroma.min_frequency, chroma.max_frequency
            )));
        }
        if chroma.soft_chroma_mapping
            && (!chroma.soft_mapping_sigma.is_finite() || chroma.soft_mapping_sigma <= 0.0)
        {
            return Err(AnalysisError::InvalidInput(format!(
                "soft_mapping_sigma must be positive, got {}",
                chroma.soft_mapping_sigma
            )));
        }

        Ok(())
    }
}

impl Default for ChordConfig {
    fn default() -> Self {
        Self {
            frame_duration_seconds: 0.5,
            min_confidence: 0.3,
            segment_confidence: SegmentConfidence::ClosingFrame,
            smoothing_window: 1,
            chroma: ChromaConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ChordConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.segment_confidence, SegmentConfidence::ClosingFrame);
    }

    #[test]
    fn test_hop_length() {
        let config = ChordConfig::default();
        assert_eq!(config.hop_length(22050), 11025);
        assert_eq!(config.hop_length(44100), 22050);

        let config = ChordConfig {
            frame_duration_seconds: 0.1,
            ..Default::default()
        };
        assert_eq!(config.hop_length(8000), 800);
        assert_eq!(config.hop_length(44100), 4410);
    }

    #[test]
    fn test_hop_length_short_frames() {
        let config = ChordConfig {
            frame_duration_seconds: 0.01,
            ..Default::default()
        };
        assert_eq!(config.hop_length(44100), 441);

        let config = ChordConfig {
            frame_duration_seconds: 0.02,
            ..Default::default()
        };
        assert_eq!(config.hop_length(22050), 441);

        let config = ChordConfig {
            frame_duration_seconds: 0.3,
            ..Default::default()
        };
        assert_eq!(config.hop_length(48000), 14400);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_frame = ChordConfig {
            frame_duration_seconds: 0.0,
            ..Default::default()
        };
        assert!(matches!(bad_frame.validate(), Err(AnalysisError::InvalidInput(_))));

        let bad_conf = ChordConfig {
            min_confidence: 1.5,
            ..Default::default()
        };
        assert!(bad_conf.validate().is_err());

        let nan_conf = ChordConfig {
            min_confidence: f32::NAN,
            ..Default::default()
        };
        assert!(nan_conf.validate().is_err());

        let mut bad_range = ChordConfig::default();
        bad_range.chroma.max_frequency = 10.0;
        assert!(bad_range.validate().is_err());
    }
}

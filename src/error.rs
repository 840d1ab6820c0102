//! Error types for the chord recognition engine

use std::fmt;

/// Errors that can occur during chord analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Invalid input parameters (dimensions, sample rate, empty or malformed signal)
    InvalidInput(String),

    /// The chroma feature extractor failed
    ExtractionFailure(String),

    /// Extractor output violated its own contract (frame/time mismatch, unordered times)
    InternalInconsistency(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::ExtractionFailure(msg) => write!(f, "Extraction failure: {}", msg),
            AnalysisError::InternalInconsistency(msg) => {
                write!(f, "Internal inconsistency: {}", msg)
            }
        }
    }
}

impl std::error::Error for AnalysisError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let e = AnalysisError::InvalidInput("Empty audio samples".to_string());
        assert_eq!(e.to_string(), "Invalid input: Empty audio samples");

        let e = AnalysisError::ExtractionFailure("fft".to_string());
        assert!(e.to_string().starts_with("Extraction failure"));

        let e = AnalysisError::InternalInconsistency("3 frames, 2 times".to_string());
        assert!(e.to_string().contains("3 frames, 2 times"));
    }
}

//! # chordtrack
//!
//! A chord recognition engine: turns a mono audio signal into a time-ordered
//! list of major/minor triad segments.
//!
//! ## Features
//!
//! - **Chroma extraction**: STFT pitch-class profiles behind a `ChromaExtractor` trait
//! - **Frame matching**: cosine similarity against 24 normalized triad templates
//! - **Segmentation**: confidence floor plus merging of consecutive identical chords
//! - **Structured results**: a serializable response that never carries partial output
//!
//! ## Quick Start
//!
//! ```no_run
//! use chordtrack::{analyze_chords, ChordConfig};
//!
//! // Mono samples, f32, normalized
//! let samples: Vec<f32> = vec![]; // Your audio data
//! let sample_rate = 22050;
//!
//! let analysis = analyze_chords(&samples, sample_rate, ChordConfig::default())?;
//!
//! for seg in &analysis.segments {
//!     println!("{:>7.3}s  {:<4} ({:.2})", seg.start_time, seg.chord, seg.confidence);
//! }
//! # Ok::<(), chordtrack::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Audio Input → Chroma Extraction → Frame Matching → Segmentation → Output
//! ```
//!
//! Every stage is a pure function of its input. The template table is the only
//! shared state and is read-only, so independent calls can run in parallel
//! (see [`detect_chords_batch`]).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod preprocessing;

use rayon::prelude::*;

// Re-export main types
pub use analysis::metadata::AnalysisMetadata;
pub use analysis::result::{
    Chord, ChordAnalysis, ChordDetectionResponse, ChordEvent, ChordSegment,
};
pub use config::{ChordConfig, ChromaConfig, SegmentConfidence};
pub use error::AnalysisError;
pub use features::chroma::{ChromaExtractor, Chromagram, StftChromaExtractor};

use features::chords::{match_frame, ChordTemplates, Segmenter};
use features::chroma::smoothing::smooth_chroma;

/// Main analysis function
///
/// Extracts chroma with the built-in STFT extractor, matches every frame
/// against the triad templates and merges the result into chord segments.
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz (reference: 22050)
/// * `config` - Analysis configuration parameters
///
/// # Errors
///
/// - `InvalidInput` for an empty or non-finite signal, a zero sample rate, or
///   an invalid configuration
/// - `ExtractionFailure` if chroma extraction fails
/// - `InternalInconsistency` if the extractor output is malformed
///
/// # Example
///
/// ```no_run
/// use chordtrack::{analyze_chords, ChordConfig};
///
/// let samples = vec![0.0f32; 22050 * 30];
/// let analysis = analyze_chords(&samples, 22050, ChordConfig::default())?;
/// println!("{} chord changes", analysis.segments.len());
/// # Ok::<(), chordtrack::AnalysisError>(())
/// ```
pub fn analyze_chords(
    samples: &[f32],
    sample_rate: u32,
    config: ChordConfig,
) -> Result<ChordAnalysis, AnalysisError> {
    let extractor = StftChromaExtractor::new(config.chroma.clone());
    analyze_chords_with(samples, sample_rate, &config, &extractor)
}

/// Analyze with a caller-supplied chroma extractor
///
/// # Errors
///
/// Same as [`analyze_chords`]; extractor errors are passed through unchanged.
pub fn analyze_chords_with<E: ChromaExtractor + ?Sized>(
    samples: &[f32],
    sample_rate: u32,
    config: &ChordConfig,
    extractor: &E,
) -> Result<ChordAnalysis, AnalysisError> {
    use std::time::Instant;
    let start_time = Instant::now();

    log::debug!(
        "Starting chord analysis: {} samples at {} Hz",
        samples.len(),
        sample_rate
    );

    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput("Empty audio samples".to_string()));
    }

    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput("Invalid sample rate".to_string()));
    }

    if let Some(i) = samples.iter().position(|x| !x.is_finite()) {
        return Err(AnalysisError::InvalidInput(format!(
            "Non-finite sample at index {}",
            i
        )));
    }

    config.validate()?;

    let hop_length = config.hop_length(sample_rate);
    if hop_length == 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "frame_duration_seconds {} is shorter than one sample at {} Hz",
            config.frame_duration_seconds, sample_rate
        )));
    }

    let duration = samples.len() as f32 / sample_rate as f32;
    log::info!("Audio loaded: {:.2} seconds at {} Hz", duration, sample_rate);

    let chromagram = extractor.extract(samples, sample_rate, hop_length)?;

    let mut analysis = analyze_chromagram(&chromagram, duration, sample_rate, config)?;
    analysis.metadata.hop_length = hop_length;
    analysis.metadata.processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    Ok(analysis)
}

/// Match and segment an existing chromagram
///
/// Entry point for callers that compute chroma themselves. A chromagram with
/// no frames yields an empty segment list.
///
/// # Arguments
///
/// * `chromagram` - Chroma frames with timestamps
/// * `track_duration` - Track length in seconds; the last segment runs to it
/// * `sample_rate` - Sample rate to report in the result
/// * `config` - Analysis configuration parameters
///
/// # Errors
///
/// - `InvalidInput` for a negative or non-finite duration, negative energies, or
///   an invalid configuration
/// - `InternalInconsistency` for mismatched or unordered timestamps, or a frame
///   time past `track_duration`
pub fn analyze_chromagram(
    chromagram: &Chromagram,
    track_duration: f32,
    sample_rate: u32,
    config: &ChordConfig,
) -> Result<ChordAnalysis, AnalysisError> {
    use std::time::Instant;
    let start_time = Instant::now();

    if !track_duration.is_finite() || track_duration < 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid track duration {}",
            track_duration
        )));
    }

    config.validate()?;
    chromagram.validate()?;

    if let Some(&last) = chromagram.times.last() {
        if last > track_duration {
            return Err(AnalysisError::InternalInconsistency(format!(
                "frame at {}s lies past the end of a {}s track",
                last, track_duration
            )));
        }
    }

    let frames = smooth_chroma(&chromagram.frames, config.smoothing_window);
    let templates = ChordTemplates::global();
    let mut segmenter = Segmenter::new(config.min_confidence, config.segment_confidence);

    for (&time, chroma) in chromagram.times.iter().zip(frames.iter()) {
        let frame = match_frame(chroma, templates)?;
        segmenter.push(time, frame)?;
    }

    let dropped_frames = segmenter.dropped_frames();
    let segments = segmenter.finish(track_duration);

    if segments.is_empty() && !chromagram.is_empty() {
        log::warn!(
            "No frame reached min_confidence {:.2}; returning no chords",
            config.min_confidence
        );
    }

    log::info!(
        "Detected {} chord changes over {} frames",
        segments.len(),
        chromagram.len()
    );

    Ok(ChordAnalysis {
        segments,
        duration: track_duration,
        sample_rate,
        metadata: AnalysisMetadata {
            frame_count: chromagram.len(),
            dropped_frames,
            processing_time_ms: start_time.elapsed().as_secs_f32() * 1000.0,
            ..AnalysisMetadata::default()
        },
    })
}

/// Analyze and convert the outcome into the structured response
///
/// Never fails: errors become `success = false` with an empty chord list.
pub fn detect_chords(samples: &[f32], sample_rate: u32, config: ChordConfig) -> ChordDetectionResponse {
    match analyze_chords(samples, sample_rate, config) {
        Ok(analysis) => ChordDetectionResponse::from_analysis(&analysis),
        Err(e) => {
            log::error!("Error detecting chords: {}", e);
            ChordDetectionResponse::from_error(&e, sample_rate)
        }
    }
}

/// Run [`detect_chords`] over many independent signals in parallel
///
/// Responses are returned in input order.
pub fn detect_chords_batch<S>(signals: &[(S, u32)], config: &ChordConfig) -> Vec<ChordDetectionResponse>
where
    S: AsRef<[f32]> + Sync,
{
    log::debug!("Batch chord detection over {} signals", signals.len());

    signals
        .par_iter()
        .map(|(samples, sample_rate)| detect_chords(samples.as_ref(), *sample_rate, config.clone()))
        .collect()
}

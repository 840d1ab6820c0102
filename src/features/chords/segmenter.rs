//! Chord segmentation
//!
//! Turns the per-frame `(time, chord, confidence)` stream into contiguous
//! chord segments.
//!
//! # Algorithm
//!
//! 1. Frames under the confidence floor are skipped: they never start, extend
//!    or close a segment, so they are absorbed into whatever segment surrounds them
//! 2. The first qualifying frame opens a segment
//! 3. A qualifying frame with the same chord continues it
//! 4. A qualifying frame with a different chord closes it at that frame's time
//!    and opens the next one
//! 5. At end of stream the open segment runs to the end of the track
//!
//! With the default `SegmentConfidence::ClosingFrame` policy a segment closed in
//! step 4 reports the confidence of the frame that closed it, and the final
//! segment reports the confidence of the last frame seen (qualifying or not).

use super::matcher::FrameMatch;
use crate::analysis::result::{Chord, ChordSegment};
use crate::config::SegmentConfidence;
use crate::error::AnalysisError;

/// Segment being accumulated
#[derive(Debug, Clone)]
struct OpenSegment {
    chord: Chord,
    start_time: f32,
    confidence_sum: f64,
    confidence_min: f32,
    frames: usize,
}

impl OpenSegment {
    fn new(time: f32, frame: FrameMatch) -> Self {
        Self {
            chord: frame.chord,
            start_time: time,
            confidence_sum: frame.confidence as f64,
            confidence_min: frame.confidence,
            frames: 1,
        }
    }

    fn absorb(&mut self, confidence: f32) {
        self.confidence_sum += confidence as f64;
        self.confidence_min = self.confidence_min.min(confidence);
        self.frames += 1;
    }
}

#[derive(Debug, Clone)]
enum State {
    Idle,
    Active(OpenSegment),
}

/// Single-use segmentation state machine
///
/// Feed frames in time order with [`Segmenter::push`], then consume it with
/// [`Segmenter::finish`].
#[derive(Debug, Clone)]
pub struct Segmenter {
    min_confidence: f32,
    policy: SegmentConfidence,
    state: State,
    last_time: Option<f32>,
    last_confidence: f32,
    dropped: usize,
    segments: Vec<ChordSegment>,
}

impl Segmenter {
    /// Create a segmenter with a confidence floor and segment confidence policy
    pub fn new(min_confidence: f32, policy: SegmentConfidence) -> Self {
        Self {
            min_confidence,
            policy,
            state: State::Idle,
            last_time: None,
            last_confidence: 0.0,
            dropped: 0,
            segments: Vec::new(),
        }
    }

    /// Process the next frame
    ///
    /// # Errors
    ///
    /// `AnalysisError::InternalInconsistency` if `time` is earlier than the
    /// previous frame's time
    pub fn push(&mut self, time: f32, frame: FrameMatch) -> Result<(), AnalysisError> {
        if let Some(prev) = self.last_time {
            if time < prev {
                return Err(AnalysisError::InternalInconsistency(format!(
                    "frame at {:.3}s arrived after frame at {:.3}s",
                    time, prev
                )));
            }
        }
        self.last_time = Some(time);
        self.last_confidence = frame.confidence;

        if frame.confidence < self.min_confidence {
            self.dropped += 1;
            return Ok(());
        }

        self.state = match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => State::Active(OpenSegment::new(time, frame)),
            State::Active(mut open) if open.chord == frame.chord => {
                open.absorb(frame.confidence);
                State::Active(open)
            }
            State::Active(closed) => {
                let confidence = self.segment_confidence(&closed, frame.confidence);
                self.emit(closed, confidence, time);
                State::Active(OpenSegment::new(time, frame))
            }
        };

        Ok(())
    }

    /// Frames skipped so far for falling under the confidence floor
    pub fn dropped_frames(&self) -> usize {
        self.dropped
    }

    /// Close any open segment at `track_duration` and return all segments
    pub fn finish(mut self, track_duration: f32) -> Vec<ChordSegment> {
        if let State::Active(open) = std::mem::replace(&mut self.state, State::Idle) {
            let confidence = self.segment_confidence(&open, self.last_confidence);
            self.emit(open, confidence, track_duration);
        }

        log::debug!(
            "Segmented into {} chords ({} frames below {:.2} skipped)",
            self.segments.len(),
            self.dropped,
            self.min_confidence
        );

        self.segments
    }

    fn segment_confidence(&self, open: &OpenSegment, closing: f32) -> f32 {
        match self.policy {
            SegmentConfidence::ClosingFrame => closing,
            SegmentConfidence::Mean => (open.confidence_sum / open.frames as f64) as f32,
            SegmentConfidence::Minimum => open.confidence_min,
        }
    }

    fn emit(&mut self, open: OpenSegment, confidence: f32, end_time: f32) {
        let duration = end_time - open.start_time;
        if duration <= 0.0 {
            log::debug!(
                "Skipping zero-length {} segment at {:.3}s",
                open.chord,
                open.start_time
            );
            return;
        }

        self.segments.push(ChordSegment {
            start_time: open.start_time,
            chord: open.chord,
            confidence,
            duration,
        });
    }
}

/// Segment a complete frame stream in one call
///
/// # Errors
///
/// `AnalysisError::InternalInconsistency` if frame times decrease
pub fn segment_frames(
    frames: &[(f32, FrameMatch)],
    track_duration: f32,
    min_confidence: f32,
    policy: SegmentConfidence,
) -> Result<Vec<ChordSegment>, AnalysisError> {
    let mut segmenter = Segmenter::new(min_confidence, policy);
    for &(time, frame) in frames {
        segmenter.push(time, frame)?;
    }
    Ok(segmenter.finish(track_duration))
}

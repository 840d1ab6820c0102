//! Chord recognition modules
//!
//! Recognise triads frame by frame and merge them into segments:
//! - Template library (24 triads)
//! - Frame matching (cosine similarity)
//! - Segmentation (confidence floor + label merging)

pub mod matcher;
pub mod segmenter;
pub mod templates;

pub use matcher::{match_frame, score_templates, FrameMatch};
pub use segmenter::{segment_frames, Segmenter};
pub use templates::{templates, ChordTemplate, ChordTemplates};

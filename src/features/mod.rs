//! Feature extraction modules
//!
//! - Chroma extraction
//! - Chord recognition

pub mod chords;
pub mod chroma;

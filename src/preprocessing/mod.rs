//! Audio preprocessing modules
//!
//! Utilities for preparing audio for analysis:
//! - Channel mixing (interleaved to mono)

pub mod channel_mixer;

//! Triad chord templates
//!
//! Binary pitch-class profiles for 24 chords (12 major + 12 minor triads),
//! normalized to unit L1 sum once and shared read-only for the life of the
//! process.

use std::sync::OnceLock;

use crate::analysis::result::Chord;
use crate::features::chroma::{normalization::l2_norm, N_PITCH_CLASSES};

/// Number of chord templates
pub const N_TEMPLATES: usize = 24;

/// One normalized chord profile
#[derive(Debug, Clone, PartialEq)]
pub struct ChordTemplate {
    /// Chord this profile represents
    pub chord: Chord,

    /// Profile divided by its sum (each chord tone = 1/3)
    pub profile: [f32; N_PITCH_CLASSES],

    /// Euclidean norm of `profile`, cached for cosine similarity
    pub norm: f32,
}

/// Template library for all 24 triads
///
/// Iteration order is fixed: C, C#, ..., B major, then Cm, C#m, ..., Bm.
/// The matcher's tie-break relies on it.
#[derive(Debug, Clone)]
pub struct ChordTemplates {
    templates: Vec<ChordTemplate>,
}

impl ChordTemplates {
    /// Build the 24 triad templates
    pub fn new() -> Self {
        let chords = (0..12u32)
            .map(Chord::Major)
            .chain((0..12u32).map(Chord::Minor));

        let templates = chords
            .map(|chord| {
                let raw = raw_profile(chord);
                let sum: f32 = raw.iter().sum();
                let mut profile = [0.0f32; N_PITCH_CLASSES];
                for (p, &r) in profile.iter_mut().zip(raw.iter()) {
                    *p = r / sum;
                }
                ChordTemplate {
                    chord,
                    profile,
                    norm: l2_norm(&profile),
                }
            })
            .collect();

        Self { templates }
    }

    /// Process-wide template table, built on first use
    pub fn global() -> &'static ChordTemplates {
        static TEMPLATES: OnceLock<ChordTemplates> = OnceLock::new();
        TEMPLATES.get_or_init(ChordTemplates::new)
    }

    /// Templates in matching order
    pub fn iter(&self) -> impl Iterator<Item = &ChordTemplate> {
        self.templates.iter()
    }

    /// Number of templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Always false; the library is never empty
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Look up the template for a chord
    pub fn get(&self, chord: Chord) -> Option<&ChordTemplate> {
        self.templates.iter().find(|t| t.chord == chord)
    }
}

impl Default for ChordTemplates {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered `(chord, normalized profile)` pairs from the shared table
pub fn templates() -> impl Iterator<Item = (Chord, &'static [f32; N_PITCH_CLASSES])> {
    ChordTemplates::global().iter().map(|t| (t.chord, &t.profile))
}

/// Unnormalized 0/1 profile: 1 at each chord tone
///
/// `NoChord` has no chord tones and yields all zeros.
pub fn raw_profile(chord: Chord) -> [f32; N_PITCH_CLASSES] {
    let mut raw = [0.0f32; N_PITCH_CLASSES];
    if let Some(pcs) = chord.pitch_classes() {
        for pc in pcs {
            raw[pc] = 1.0;
        }
    }
    raw
}

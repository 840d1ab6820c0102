//! Frame-level chord matching
//!
//! Scores one chroma vector against every template by cosine similarity and
//! keeps the best. There is no silence detection here: a quiet frame still
//! weakly matches some triad, and the segmenter's confidence floor decides
//! whether it counts.

use super::templates::ChordTemplates;
use crate::analysis::result::Chord;
use crate::error::AnalysisError;
use crate::features::chroma::normalization::{l1_normalize, l2_norm, EPSILON};
use crate::features::chroma::N_PITCH_CLASSES;

/// Best template for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMatch {
    /// Matched chord
    pub chord: Chord,

    /// Cosine similarity with the matched template (0.0-1.0)
    pub confidence: f32,
}

/// Match one chroma vector against the template library
///
/// The search starts from `(NoChord, 0.0)` and a template replaces the current
/// best only with a strictly higher score, so ties go to the earlier template
/// and an all-zero frame returns `NoChord` with confidence 0.
///
/// # Errors
///
/// `AnalysisError::InvalidInput` if `chroma` does not have 12 elements
///
/// # Example
///
/// ```
/// use chordtrack::analysis::result::Chord;
/// use chordtrack::features::chords::{match_frame, ChordTemplates};
///
/// // G major: G B D
/// let mut chroma = [0.0f32; 12];
/// chroma[7] = 1.0;
/// chroma[11] = 0.8;
/// chroma[2] = 0.9;
///
/// let m = match_frame(&chroma, ChordTemplates::global())?;
/// assert_eq!(m.chord, Chord::Major(7));
/// # Ok::<(), chordtrack::AnalysisError>(())
/// ```
pub fn match_frame(chroma: &[f32], templates: &ChordTemplates) -> Result<FrameMatch, AnalysisError> {
    let scores = score_templates(chroma, templates)?;

    let mut best = FrameMatch {
        chord: Chord::NoChord,
        confidence: 0.0,
    };
    for (chord, score) in scores {
        if score > best.confidence {
            best = FrameMatch {
                chord,
                confidence: score,
            };
        }
    }

    Ok(best)
}

/// Cosine similarity of a chroma vector with every template, in template order
///
/// # Errors
///
/// `AnalysisError::InvalidInput` if `chroma` does not have 12 elements
pub fn score_templates(
    chroma: &[f32],
    templates: &ChordTemplates,
) -> Result<Vec<(Chord, f32)>, AnalysisError> {
    if chroma.len() != N_PITCH_CLASSES {
        return Err(AnalysisError::InvalidInput(format!(
            "Chroma vector must have {} elements, got {}",
            N_PITCH_CLASSES,
            chroma.len()
        )));
    }

    let x = l1_normalize(chroma);
    let x_norm = l2_norm(&x);

    Ok(templates
        .iter()
        .map(|t| {
            let score = dot_product(&x, &t.profile) / (x_norm * t.norm + EPSILON);
            (t.chord, score.clamp(0.0, 1.0))
        })
        .collect())
}

/// Compute dot product between two vectors.
fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

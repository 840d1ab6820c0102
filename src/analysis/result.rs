//! Analysis result types

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::metadata::AnalysisMetadata;
use crate::error::AnalysisError;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Chord label
///
/// Only major and minor triads are recognised. `NoChord` is the sentinel the
/// matcher reports when no template scores above zero (silent frames).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chord {
    /// Major triad (0 = C, 1 = C#, ..., 11 = B)
    Major(u32),
    /// Minor triad (0 = C, 1 = C#, ..., 11 = B)
    Minor(u32),
    /// No chord ("N")
    NoChord,
}

impl Chord {
    /// Get chord name in lead-sheet notation (e.g., "C", "Am", "F#", "D#m", "N")
    ///
    /// # Example
    ///
    /// ```
    /// use chordtrack::analysis::result::Chord;
    ///
    /// assert_eq!(Chord::Major(0).name(), "C");
    /// assert_eq!(Chord::Major(6).name(), "F#");
    /// assert_eq!(Chord::Minor(9).name(), "Am");
    /// assert_eq!(Chord::NoChord.name(), "N");
    /// ```
    pub fn name(&self) -> String {
        match self {
            Chord::Major(i) => NOTE_NAMES[*i as usize % 12].to_string(),
            Chord::Minor(i) => format!("{}m", NOTE_NAMES[*i as usize % 12]),
            Chord::NoChord => "N".to_string(),
        }
    }

    /// Parse a chord name produced by [`Chord::name`]
    ///
    /// Sharps only; flats are not part of the label vocabulary.
    ///
    /// ```
    /// use chordtrack::analysis::result::Chord;
    ///
    /// assert_eq!(Chord::from_name("C#m"), Some(Chord::Minor(1)));
    /// assert_eq!(Chord::from_name("G"), Some(Chord::Major(7)));
    /// assert_eq!(Chord::from_name("N"), Some(Chord::NoChord));
    /// assert_eq!(Chord::from_name("Bb"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "N" {
            return Some(Chord::NoChord);
        }

        let (root, minor) = match name.strip_suffix('m') {
            Some(root) => (root, true),
            None => (name, false),
        };

        let idx = NOTE_NAMES.iter().position(|&n| n == root)? as u32;
        Some(if minor {
            Chord::Minor(idx)
        } else {
            Chord::Major(idx)
        })
    }

    /// Root pitch class, `None` for `NoChord`
    pub fn root(&self) -> Option<u32> {
        match self {
            Chord::Major(i) | Chord::Minor(i) => Some(*i % 12),
            Chord::NoChord => None,
        }
    }

    /// Pitch classes of the triad (root, third, fifth)
    pub fn pitch_classes(&self) -> Option<[usize; 3]> {
        match self {
            Chord::Major(i) => {
                let r = *i as usize % 12;
                Some([r, (r + 4) % 12, (r + 7) % 12])
            }
            Chord::Minor(i) => {
                let r = *i as usize % 12;
                Some([r, (r + 3) % 12, (r + 7) % 12])
            }
            Chord::NoChord => None,
        }
    }
}

impl std::fmt::Display for Chord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.name())
    }
}

impl Serialize for Chord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for Chord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Chord::from_name(&s).ok_or_else(|| de::Error::custom(format!("unknown chord: {}", s)))
    }
}

/// A contiguous time span carrying one chord label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordSegment {
    /// Segment start in seconds
    pub start_time: f32,

    /// Chord label
    pub chord: Chord,

    /// Representative confidence (0.0-1.0), see `SegmentConfidence`
    pub confidence: f32,

    /// Segment length in seconds (always > 0)
    pub duration: f32,
}

impl ChordSegment {
    /// End of the segment in seconds (exclusive)
    pub fn end_time(&self) -> f32 {
        self.start_time + self.duration
    }

    /// True if `time` falls in `[start_time, end_time)`
    pub fn contains(&self, time: f32) -> bool {
        time >= self.start_time && time < self.end_time()
    }
}

/// Complete chord analysis of one signal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChordAnalysis {
    /// Segments ordered by start time
    pub segments: Vec<ChordSegment>,

    /// Track duration in seconds
    pub duration: f32,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}

impl ChordAnalysis {
    /// Segment active at `time`, if any
    ///
    /// Segments are sorted and non-overlapping, so this is a binary search.
    pub fn chord_at(&self, time: f32) -> Option<&ChordSegment> {
        let idx = self.segments.partition_point(|s| s.start_time <= time);
        if idx == 0 {
            return None;
        }
        let seg = &self.segments[idx - 1];
        if seg.contains(time) {
            Some(seg)
        } else {
            None
        }
    }

    /// Ordered chord labels, one per segment
    pub fn progression(&self) -> Vec<Chord> {
        self.segments.iter().map(|s| s.chord).collect()
    }
}

/// One chord entry of the service-facing response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordEvent {
    /// Start time in seconds (3 decimals)
    pub time: f32,

    /// Chord name
    pub chord: String,

    /// Confidence (3 decimals)
    pub confidence: f32,

    /// Duration in seconds (3 decimals)
    pub duration: f32,
}

impl From<&ChordSegment> for ChordEvent {
    fn from(seg: &ChordSegment) -> Self {
        Self {
            time: round3(seg.start_time),
            chord: seg.chord.name(),
            confidence: round3(seg.confidence),
            duration: round3(seg.duration),
        }
    }
}

/// Structured result returned across the engine boundary
///
/// Either `success` with the full chord list, or a failure with an error
/// message and an empty list. Never partially populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChordDetectionResponse {
    /// Whether analysis succeeded
    pub success: bool,

    /// Detected chords, ordered by time
    pub chords: Vec<ChordEvent>,

    /// Track duration in seconds (0.0 on failure)
    pub duration: f32,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Error description on failure
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl ChordDetectionResponse {
    /// Build the success response for a completed analysis
    pub fn from_analysis(analysis: &ChordAnalysis) -> Self {
        Self {
            success: true,
            chords: analysis.segments.iter().map(ChordEvent::from).collect(),
            duration: analysis.duration,
            sample_rate: analysis.sample_rate,
            error: None,
        }
    }

    /// Build the failure response for an error
    pub fn from_error(error: &AnalysisError, sample_rate: u32) -> Self {
        Self {
            success: false,
            chords: Vec::new(),
            duration: 0.0,
            sample_rate,
            error: Some(error.to_string()),
        }
    }

    /// Encode as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<Result<ChordAnalysis, AnalysisError>> for ChordDetectionResponse {
    fn from(result: Result<ChordAnalysis, AnalysisError>) -> Self {
        match result {
            Ok(analysis) => Self::from_analysis(&analysis),
            Err(e) => Self::from_error(&e, 0),
        }
    }
}

/// Round to 3 decimal places for presentation
pub(crate) fn round3(x: f32) -> f32 {
    ((x as f64 * 1000.0).round() / 1000.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f32, chord: Chord, duration: f32) -> ChordSegment {
        ChordSegment {
            start_time: start,
            chord,
            confidence: 0.9,
            duration,
        }
    }

    fn analysis(segments: Vec<ChordSegment>) -> ChordAnalysis {
        ChordAnalysis {
            segments,
            duration: 4.0,
            sample_rate: 22050,
            metadata: AnalysisMetadata::default(),
        }
    }

    #[test]
    fn test_chord_name_major() {
        assert_eq!(Chord::Major(0).name(), "C");
        assert_eq!(Chord::Major(1).name(), "C#");
        assert_eq!(Chord::Major(7).name(), "G");
        assert_eq!(Chord::Major(11).name(), "B");
    }

    #[test]
    fn test_chord_name_minor() {
        assert_eq!(Chord::Minor(0).name(), "Cm");
        assert_eq!(Chord::Minor(1).name(), "C#m");
        assert_eq!(Chord::Minor(9).name(), "Am");
        assert_eq!(Chord::Minor(10).name(), "A#m");
    }

    #[test]
    fn test_from_name_rejects_unknown() {
        assert_eq!(Chord::from_name(""), None);
        assert_eq!(Chord::from_name("H"), None);
        assert_eq!(Chord::from_name("Cmaj7"), None);
        assert_eq!(Chord::from_name("m"), None);
    }

    #[test]
    fn test_name_parse_all_labels() {
        for i in 0..12 {
            for chord in [Chord::Major(i), Chord::Minor(i)] {
                assert_eq!(Chord::from_name(&chord.name()), Some(chord));
            }
        }
    }

    #[test]
    fn test_pitch_classes() {
        assert_eq!(Chord::Major(0).pitch_classes(), Some([0, 4, 7]));
        assert_eq!(Chord::Minor(9).pitch_classes(), Some([9, 0, 4]));
        assert_eq!(Chord::Major(11).pitch_classes(), Some([11, 3, 6]));
        assert_eq!(Chord::NoChord.pitch_classes(), None);
    }

    #[test]
    fn test_chord_serializes_as_name() {
        let json = serde_json::to_string(&Chord::Minor(1)).unwrap();
        assert_eq!(json, "\"C#m\"");
        let back: Chord = serde_json::from_str("\"F#\"").unwrap();
        assert_eq!(back, Chord::Major(6));
        assert!(serde_json::from_str::<Chord>("\"Xm\"").is_err());
    }

    #[test]
    fn test_chord_at() {
        let a = analysis(vec![
            seg(0.0, Chord::Major(0), 1.0),
            seg(1.0, Chord::Major(7), 1.5),
            seg(3.0, Chord::Minor(9), 1.0),
        ]);

        assert_eq!(a.chord_at(0.0).map(|s| s.chord), Some(Chord::Major(0)));
        assert_eq!(a.chord_at(0.99).map(|s| s.chord), Some(Chord::Major(0)));
        assert_eq!(a.chord_at(1.0).map(|s| s.chord), Some(Chord::Major(7)));
        assert!(a.chord_at(2.75).is_none());
        assert_eq!(a.chord_at(3.5).map(|s| s.chord), Some(Chord::Minor(9)));
        assert!(a.chord_at(4.0).is_none());
        assert!(a.chord_at(-1.0).is_none());
    }

    #[test]
    fn test_progression() {
        let a = analysis(vec![
            seg(0.0, Chord::Major(0), 1.0),
            seg(1.0, Chord::Major(7), 1.0),
        ]);
        assert_eq!(a.progression(), vec![Chord::Major(0), Chord::Major(7)]);
    }

    #[test]
    fn test_response_rounds_values() {
        let a = analysis(vec![ChordSegment {
            start_time: 0.123456,
            chord: Chord::Minor(4),
            confidence: 0.87654,
            duration: 1.99951,
        }]);
        let response = ChordDetectionResponse::from_analysis(&a);

        assert!(response.success);
        assert!(response.error.is_none());
        assert_eq!(response.chords[0].chord, "Em");
        assert!((response.chords[0].time - 0.123).abs() < 1e-6);
        assert!((response.chords[0].confidence - 0.877).abs() < 1e-6);
        assert!((response.chords[0].duration - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_failure_response_is_empty() {
        let err = AnalysisError::InvalidInput("Empty audio samples".to_string());
        let response = ChordDetectionResponse::from_error(&err, 22050);

        assert!(!response.success);
        assert!(response.chords.is_empty());
        assert_eq!(response.duration, 0.0);

        let json = response.to_json().unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("Empty audio samples"));
    }

    #[test]
    fn test_success_json_omits_error() {
        let response = ChordDetectionResponse::from_analysis(&analysis(vec![]));
        let json = response.to_json().unwrap();
        assert!(!json.contains("error"));
        assert!(json.contains("\"chords\":[]"));
    }
}

use serde::{Deserialize, Serialize};

/// Word-level timing detail attached to a recognition segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptWord {
    pub word: String,
    #[serde(default)]
    pub start_seconds: Option<f64>,
    #[serde(default)]
    pub end_seconds: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// A timing/confidence-bearing segment produced by the recognition subsystem.
///
/// The identification pipeline treats these as input/output only: the one
/// field it ever writes is `refined_text`, filled in by the realigner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSegment {
    /// Sequential position in the recognition result (1-based)
    #[serde(default)]
    pub segment_id: u32,
    /// Segment start time in seconds, derived from word-level offsets
    #[serde(default)]
    pub start_seconds: Option<f64>,
    /// Segment end time in seconds
    #[serde(default)]
    pub end_seconds: Option<f64>,
    /// Recognition confidence (0-1)
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Transcript text for the segment
    pub text: String,
    /// Word-level details, when the recognizer provides them
    #[serde(default)]
    pub words: Option<Vec<TranscriptWord>>,
    /// Refined text variant, attached post-hoc by realignment
    #[serde(default)]
    pub refined_text: Option<String>,
}

impl RawSegment {
    pub fn new(segment_id: u32, text: impl Into<String>) -> Self {
        Self {
            segment_id,
            start_seconds: None,
            end_seconds: None,
            confidence: None,
            text: text.into(),
            words: None,
            refined_text: None,
        }
    }
}

/// A bounded unit of transcript text submitted to the text-generation service.
///
/// Derived from the plain transcript string, independently of the
/// recognition segments. Offsets are character indices (half-open) into the
/// line-ending-normalized source; segments never overlap and are strictly
/// increasing by `start_index`.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSegment {
    /// Sequential id, unique across the whole identification call (1-based)
    pub segment_id: u32,
    /// Original-cased slice of the source, trimmed of surrounding whitespace
    pub text: String,
    /// Whitespace-normalized variant used for compact prompt rendering
    pub prompt_text: String,
    /// Start character offset into the normalized source
    pub start_index: usize,
    /// End character offset (exclusive)
    pub end_index: usize,
}

pub mod confidence;
pub mod error;
pub mod identify;
pub mod io;
pub mod llm;
pub mod models;
pub mod realign;
pub mod segmenter;

pub use confidence::{aggregate_confidence, Confidence};
pub use error::IdentifyError;
pub use identify::{fallback_result, IdentifyConfig, SpeakerIdentifier};
pub use io::{
    format_transcript_with_speakers, parse_recognition_file, parse_recognition_json,
    read_transcript_file, refined_transcript, speaker_summary, write_json,
};
pub use llm::{AnthropicClient, AnthropicConfig, TextGenerator};
pub use models::{
    IdentificationResult, IdentifiedSegment, PromptSegment, RawSegment, SpeakerProfile,
    SpeakerRegistry, SpeakerSummary, TranscriptWord,
};
pub use realign::{realign, refined_fragments};
pub use segmenter::{segment_transcript, SegmenterConfig};

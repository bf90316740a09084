use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::confidence::{aggregate_confidence, Confidence};
use crate::error::IdentifyError;
use crate::llm::{
    build_chunk_prompt, parse_chunk_response, ChunkResponse, TextGenerator, SYSTEM_PROMPT,
};
use crate::models::{
    Assignment, IdentificationResult, IdentifiedSegment, PromptSegment, SpeakerRegistry,
    DEFAULT_SPEAKER_LABEL, UNKNOWN_SPEAKER_LABEL,
};
use crate::segmenter::{segment_transcript, SegmenterConfig};

/// Configuration for a speaker identification run
#[derive(Debug, Clone)]
pub struct IdentifyConfig {
    /// Segmentation size constraints and chunk capacity
    pub segmenter: SegmenterConfig,
    /// Maximum retries per chunk on call or validation failure
    pub max_retries: u32,
}

impl Default for IdentifyConfig {
    fn default() -> Self {
        Self {
            segmenter: SegmenterConfig::default(),
            max_retries: 2,
        }
    }
}

/// Drives the multi-round dialogue with the text-generation service and
/// merges per-chunk responses into one identification result.
///
/// Chunks are processed strictly in order: the prompt for chunk k+1 depends
/// on the speaker registry accumulated through chunk k, so exactly one call
/// is in flight per identification request.
pub struct SpeakerIdentifier<G> {
    generator: G,
    config: IdentifyConfig,
}

impl<G: TextGenerator> SpeakerIdentifier<G> {
    pub fn new(generator: G) -> Self {
        Self::with_config(generator, IdentifyConfig::default())
    }

    pub fn with_config(generator: G, config: IdentifyConfig) -> Self {
        Self { generator, config }
    }

    /// Identify speakers in a plain transcript.
    ///
    /// Never fails: identification is an enhancement over a working
    /// transcript, so every error degrades to the fallback result instead
    /// of propagating.
    pub async fn identify_speakers(&self, transcript: &str) -> IdentificationResult {
        if transcript.trim().is_empty() {
            return fallback_result(transcript);
        }

        match self.run(transcript).await {
            Ok(result) => result,
            Err(e) => {
                warn!("speaker identification failed, using fallback: {e}");
                fallback_result(transcript)
            }
        }
    }

    async fn run(&self, transcript: &str) -> Result<IdentificationResult, IdentifyError> {
        let segments = segment_transcript(transcript, &self.config.segmenter);
        if segments.is_empty() {
            return Err(IdentifyError::Validation(
                "transcript produced no segments".to_string(),
            ));
        }

        let chunks: Vec<&[PromptSegment]> = segments
            .chunks(self.config.segmenter.max_segments_per_request)
            .collect();
        info!(
            "identifying speakers across {} segments in {} chunk(s)",
            segments.len(),
            chunks.len()
        );

        let mut known_speakers = SpeakerRegistry::default();
        let mut assignments: HashMap<u32, Assignment> = HashMap::new();
        let mut notes: Vec<String> = Vec::new();
        let mut confidences: Vec<Confidence> = Vec::new();

        for (index, chunk) in chunks.iter().enumerate() {
            debug!(
                "processing chunk {}/{} ({} segments, {} known speakers)",
                index + 1,
                chunks.len(),
                chunk.len(),
                known_speakers.len()
            );

            let response = self.process_chunk(chunk, &known_speakers).await?;

            for speaker in response.speakers {
                known_speakers.merge(speaker);
            }
            assignments.extend(response.assignments);
            if let Some(note) = response.notes {
                notes.push(note);
            }
            confidences.push(response.overall_confidence);
        }

        if assignments.is_empty() {
            return Err(IdentifyError::Validation(
                "no chunk produced any assignment".to_string(),
            ));
        }

        let result = build_result(&segments, &assignments, &confidences, &notes);
        if !validate_result(&result) {
            return Err(IdentifyError::Validation(
                "final result failed structural checks".to_string(),
            ));
        }

        Ok(result)
    }

    /// Run one chunk through the service, retrying on call failures and
    /// unusable output
    async fn process_chunk(
        &self,
        chunk: &[PromptSegment],
        known_speakers: &SpeakerRegistry,
    ) -> Result<ChunkResponse, IdentifyError> {
        let prompt = build_chunk_prompt(chunk, known_speakers);
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                info!("chunk retry {} of {}", attempt, self.config.max_retries);
            }

            match self.generator.generate(SYSTEM_PROMPT, &prompt).await {
                Ok(raw) => match parse_chunk_response(&raw, chunk) {
                    Ok(response) => return Ok(response),
                    Err(e) => {
                        warn!("chunk response rejected: {e}");
                        last_error = Some(e);
                    }
                },
                Err(e) => {
                    warn!("text generation call failed: {e}");
                    last_error = Some(IdentifyError::ExternalService(e));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            IdentifyError::Validation("chunk produced no usable output".to_string())
        }))
    }
}

/// Fold the global assignment map back onto the ordered prompt segments.
///
/// A segment without an assignment gets the default label with low
/// confidence; that marks an alignment gap and is preserved rather than
/// dropped.
fn build_result(
    segments: &[PromptSegment],
    assignments: &HashMap<u32, Assignment>,
    confidences: &[Confidence],
    notes: &[String],
) -> IdentificationResult {
    let mut unique_labels: HashSet<&str> = HashSet::new();
    let mut final_segments = Vec::with_capacity(segments.len());

    for segment in segments {
        let (speaker, confidence, refined_text) = match assignments.get(&segment.segment_id) {
            Some(assignment) => (
                assignment.speaker.clone(),
                assignment.confidence,
                assignment.refined_text.clone(),
            ),
            None => (DEFAULT_SPEAKER_LABEL.to_string(), Confidence::Low, None),
        };

        final_segments.push(IdentifiedSegment {
            segment_id: segment.segment_id,
            speaker,
            text: segment.text.clone(),
            refined_text,
            start_index: segment.start_index,
            end_index: segment.end_index,
            confidence,
        });
    }

    for segment in &final_segments {
        unique_labels.insert(segment.speaker.as_str());
    }

    let total_speakers = unique_labels.len().max(1);
    let joined_notes: Vec<&str> = notes
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect();

    IdentificationResult {
        speakers_identified: total_speakers > 1,
        total_speakers,
        segments: final_segments,
        confidence: aggregate_confidence(confidences),
        notes: joined_notes.join("\n"),
    }
}

/// Structural checks on the combined result before returning it
fn validate_result(result: &IdentificationResult) -> bool {
    if result.segments.is_empty() || result.total_speakers < 1 {
        return false;
    }
    result.segments.iter().all(|segment| {
        !segment.speaker.trim().is_empty() && segment.start_index <= segment.end_index
    })
}

/// Deterministic degraded result used whenever identification fails.
///
/// One segment spanning the whole transcript, labeled with the unknown
/// speaker marker. Always well-formed; never itself triggers fallback.
pub fn fallback_result(transcript: &str) -> IdentificationResult {
    IdentificationResult {
        speakers_identified: false,
        total_speakers: 1,
        segments: vec![IdentifiedSegment {
            segment_id: 1,
            speaker: UNKNOWN_SPEAKER_LABEL.to_string(),
            text: transcript.to_string(),
            refined_text: Some(transcript.to_string()),
            start_index: 0,
            end_index: transcript.chars().count(),
            confidence: Confidence::Low,
        }],
        confidence: Confidence::Low,
        notes: "Automatische spreker-identificatie is mislukt. Originele transcript weergegeven."
            .to_string(),
    }
}

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::confidence::Confidence;
use crate::error::IdentifyError;
use crate::models::{Assignment, PromptSegment, SpeakerProfile, DEFAULT_SPEAKER_LABEL};

/// Validated, normalized output for one chunk
#[derive(Debug)]
pub struct ChunkResponse {
    /// Surviving assignments, keyed by segment_id
    pub assignments: HashMap<u32, Assignment>,
    /// Speaker profiles observed in this chunk, in reported order
    pub speakers: Vec<SpeakerProfile>,
    /// Free-text observations, if any
    pub notes: Option<String>,
    /// Chunk-level confidence (defaults to medium when absent)
    pub overall_confidence: Confidence,
}

/// Parse and validate raw model output against the originating chunk.
///
/// Every field is treated as untrusted: entries that are not objects are
/// skipped, entries referencing ids outside the chunk or carrying a
/// non-string speaker are discarded, and a missing per-item confidence falls
/// back to the chunk-level value. Zero surviving assignments is a validation
/// failure, not an empty success.
pub fn parse_chunk_response(
    raw: &str,
    chunk: &[PromptSegment],
) -> Result<ChunkResponse, IdentifyError> {
    let payload = extract_json(raw).ok_or(IdentifyError::Parse)?;
    let object = payload
        .as_object()
        .ok_or_else(|| IdentifyError::Schema("response is not a JSON object".to_string()))?;

    let segment_entries = object
        .get("segments")
        .and_then(Value::as_array)
        .ok_or_else(|| IdentifyError::Schema("response has no segments list".to_string()))?;

    let overall_confidence = object
        .get("overall_confidence")
        .and_then(Value::as_str)
        .map(Confidence::parse_or_medium)
        .unwrap_or_default();

    let valid_ids: HashSet<u32> = chunk.iter().map(|s| s.segment_id).collect();
    let mut assignments = HashMap::new();

    for entry in segment_entries {
        let Some(item) = entry.as_object() else {
            continue;
        };
        let Some(segment_id) = item
            .get("segment_id")
            .and_then(Value::as_u64)
            .and_then(|id| u32::try_from(id).ok())
        else {
            continue;
        };
        let Some(speaker) = item.get("speaker").and_then(Value::as_str) else {
            continue;
        };
        if !valid_ids.contains(&segment_id) {
            continue;
        }

        let confidence = match item.get("confidence").and_then(Value::as_str) {
            Some(label) => Confidence::parse_or_medium(label),
            None => overall_confidence,
        };

        let refined_text = item
            .get("refined_text")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(String::from);

        let speaker = speaker.trim();
        let speaker = if speaker.is_empty() {
            DEFAULT_SPEAKER_LABEL
        } else {
            speaker
        };

        assignments.insert(
            segment_id,
            Assignment {
                speaker: speaker.to_string(),
                confidence,
                refined_text,
            },
        );
    }

    if assignments.is_empty() {
        return Err(IdentifyError::Validation(
            "model output contained no valid segment assignments".to_string(),
        ));
    }

    let speakers = object
        .get("speakers")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(parse_speaker_profile).collect())
        .unwrap_or_default();

    let notes = object
        .get("notes")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from);

    Ok(ChunkResponse {
        assignments,
        speakers,
        notes,
        overall_confidence,
    })
}

/// Extract a JSON value from free-form model output.
///
/// Tries the trimmed output directly, then the substring between the first
/// `{` and the last `}` (models often wrap JSON in prose or code fences).
fn extract_json(raw: &str) -> Option<Value> {
    let stripped = raw.trim();
    if stripped.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str(stripped) {
        return Some(value);
    }

    let start = stripped.find('{')?;
    let end = stripped.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&stripped[start..=end]).ok()
}

/// Normalize one loosely-shaped speaker entry.
///
/// Accepts `summary` as an alternative to `description`, and a single string
/// or a list under `alias`/`aliases`. Entries without a usable label are
/// dropped.
fn parse_speaker_profile(value: &Value) -> Option<SpeakerProfile> {
    let object = value.as_object()?;
    let label = object.get("label").and_then(Value::as_str)?.trim();
    if label.is_empty() {
        return None;
    }

    let description = object
        .get("description")
        .or_else(|| object.get("summary"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_string();

    let alias_value = object.get("aliases").or_else(|| object.get("alias"));
    let aliases = match alias_value {
        Some(Value::String(single)) => {
            let trimmed = single.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed.to_string()]
            }
        }
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    };

    Some(SpeakerProfile {
        label: label.to_string(),
        description,
        aliases,
    })
}

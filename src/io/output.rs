use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{IdentificationResult, SpeakerSummary, UNKNOWN_SPEAKER_LABEL};

/// Format an identification result as a readable speaker-labeled transcript.
///
/// Each segment renders as `"{speaker}: {text}"` (preferring refined text),
/// separated by blank lines. When no distinct speakers were identified the
/// raw fallback text is returned as-is.
pub fn format_transcript_with_speakers(result: &IdentificationResult) -> String {
    if !result.speakers_identified {
        return result
            .segments
            .first()
            .map(|s| s.text.clone())
            .unwrap_or_default();
    }

    let parts: Vec<String> = result
        .segments
        .iter()
        .filter_map(|segment| {
            let text = segment
                .refined_text
                .as_deref()
                .unwrap_or(&segment.text)
                .trim();
            if text.is_empty() {
                None
            } else {
                Some(format!("{}: {}", segment.speaker, text))
            }
        })
        .collect();

    parts.join("\n\n")
}

/// Summarize the identified speakers of a result
pub fn speaker_summary(result: &IdentificationResult) -> SpeakerSummary {
    if !result.speakers_identified {
        return SpeakerSummary {
            total_speakers: 1,
            confidence: result.confidence,
            speakers: vec![UNKNOWN_SPEAKER_LABEL.to_string()],
            notes: result.notes.clone(),
        };
    }

    let speakers: Vec<String> = result
        .segments
        .iter()
        .map(|s| s.speaker.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    SpeakerSummary {
        total_speakers: speakers.len(),
        confidence: result.confidence,
        speakers,
        notes: result.notes.clone(),
    }
}

/// Build a lightly refined transcript without speaker labels.
///
/// Joins each segment's refined (or original) text with blank lines; None
/// when nothing usable remains.
pub fn refined_transcript(result: &IdentificationResult) -> Option<String> {
    let parts: Vec<&str> = result
        .segments
        .iter()
        .map(|segment| segment.refined_text.as_deref().unwrap_or(&segment.text).trim())
        .filter(|text| !text.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

/// Write any serializable value as pretty JSON
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, value).context("Failed to write JSON")?;
    Ok(())
}

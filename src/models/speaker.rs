use serde::{Deserialize, Serialize};

use crate::confidence::Confidence;

/// Label assigned when a prompt segment ends up without any assignment.
///
/// This never represents real model output; it marks an alignment gap that
/// must be preserved rather than silently dropped.
pub const DEFAULT_SPEAKER_LABEL: &str = "Spreker A";

/// Label used by the fallback result when identification fails entirely
pub const UNKNOWN_SPEAKER_LABEL: &str = "Onbekende Spreker";

/// Accumulated knowledge about one speaker label, carried across chunks to
/// keep labeling consistent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeakerProfile {
    /// Canonical label, e.g. "Spreker A"
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl SpeakerProfile {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: String::new(),
            aliases: Vec::new(),
        }
    }

    /// Fold a later observation of the same label into this profile.
    ///
    /// Non-empty fields overwrite; empty fields never erase existing data.
    pub fn absorb(&mut self, other: &SpeakerProfile) {
        if !other.description.is_empty() {
            self.description = other.description.clone();
        }
        if !other.aliases.is_empty() {
            self.aliases = other.aliases.clone();
        }
    }
}

/// Insertion-ordered speaker registry, keyed by label.
///
/// Order matters: the prompt builder renders known speakers in first-seen
/// order, and rendering must be deterministic for a deterministic model.
#[derive(Debug, Clone, Default)]
pub struct SpeakerRegistry {
    profiles: Vec<SpeakerProfile>,
}

impl SpeakerRegistry {
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeakerProfile> {
        self.profiles.iter()
    }

    pub fn get(&self, label: &str) -> Option<&SpeakerProfile> {
        self.profiles.iter().find(|p| p.label == label)
    }

    /// Register a profile observed in a chunk response. First sighting of a
    /// label creates the profile; later sightings absorb into it.
    pub fn merge(&mut self, incoming: SpeakerProfile) {
        if incoming.label.is_empty() {
            return;
        }
        match self.profiles.iter_mut().find(|p| p.label == incoming.label) {
            Some(existing) => existing.absorb(&incoming),
            None => self.profiles.push(incoming),
        }
    }
}

/// The resolved speaker for one prompt segment within a chunk response
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub speaker: String,
    pub confidence: Confidence,
    pub refined_text: Option<String>,
}

/// One prompt segment merged with its final speaker data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedSegment {
    pub segment_id: u32,
    pub speaker: String,
    pub text: String,
    #[serde(default)]
    pub refined_text: Option<String>,
    pub start_index: usize,
    pub end_index: usize,
    pub confidence: Confidence,
}

/// Final output of a speaker identification call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentificationResult {
    /// True iff more than one distinct label appears across the segments
    pub speakers_identified: bool,
    /// Count of distinct labels, minimum 1
    pub total_speakers: usize,
    /// Merged per-segment speaker data, in original order
    pub segments: Vec<IdentifiedSegment>,
    /// Aggregated qualitative confidence across chunks
    pub confidence: Confidence,
    /// Concatenated free-text observations from the model
    pub notes: String,
}

/// Condensed per-call speaker statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeakerSummary {
    pub total_speakers: usize,
    pub confidence: Confidence,
    pub speakers: Vec<String>,
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_empty_fields_never_erase() {
        let mut existing = SpeakerProfile {
            label: "Spreker A".to_string(),
            description: "host".to_string(),
            aliases: vec![],
        };
        let incoming = SpeakerProfile {
            label: "Spreker A".to_string(),
            description: String::new(),
            aliases: vec!["Jan".to_string()],
        };

        existing.absorb(&incoming);

        assert_eq!(existing.description, "host");
        assert_eq!(existing.aliases, vec!["Jan".to_string()]);
    }

    #[test]
    fn test_absorb_non_empty_fields_overwrite() {
        let mut existing = SpeakerProfile {
            label: "Spreker B".to_string(),
            description: "gast".to_string(),
            aliases: vec!["Piet".to_string()],
        };
        let incoming = SpeakerProfile {
            label: "Spreker B".to_string(),
            description: "interviewer".to_string(),
            aliases: vec!["Piet".to_string(), "P.".to_string()],
        };

        existing.absorb(&incoming);

        assert_eq!(existing.description, "interviewer");
        assert_eq!(existing.aliases.len(), 2);
    }

    #[test]
    fn test_registry_preserves_insertion_order() {
        let mut registry = SpeakerRegistry::default();
        registry.merge(SpeakerProfile::new("Spreker B"));
        registry.merge(SpeakerProfile::new("Spreker A"));
        registry.merge(SpeakerProfile::new("Spreker B"));

        let labels: Vec<&str> = registry.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Spreker B", "Spreker A"]);
    }

    #[test]
    fn test_registry_ignores_blank_labels() {
        let mut registry = SpeakerRegistry::default();
        registry.merge(SpeakerProfile::new(""));
        assert!(registry.is_empty());
    }
}

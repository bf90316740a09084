use crate::models::{PromptSegment, SpeakerRegistry};

/// System prompt for speaker identification (Dutch transcripts)
pub const SYSTEM_PROMPT: &str = "Je bent een expert in het analyseren van Nederlandse gesprekken \
en het consistent labelen van sprekers. Gebruik alleen labels in de vorm \"Spreker A\", \
\"Spreker B\", enzovoort. Hergebruik bestaande labels wanneer dezelfde persoon spreekt. \
Je mag zinnen heel licht herformuleren voor duidelijkheid, maar behoud altijd exacte \
betekenis, intentie en chronologie.";

/// Render the user prompt for one chunk of prompt segments.
///
/// The guidance block lists accumulated speaker knowledge so labels stay
/// consistent across chunks; an empty registry instead instructs the model
/// to start fresh with ordinal labels.
pub fn build_chunk_prompt(chunk: &[PromptSegment], known_speakers: &SpeakerRegistry) -> String {
    let speaker_guidance = if known_speakers.is_empty() {
        "Nog geen bekende sprekers. Introduceer nieuwe labels als Spreker A, Spreker B, etc."
            .to_string()
    } else {
        let formatted: Vec<String> = known_speakers
            .iter()
            .map(|profile| {
                let alias_text = if profile.aliases.is_empty() {
                    String::new()
                } else {
                    format!(" (alias: {})", profile.aliases.join(", "))
                };
                format!("{}: {}{}", profile.label, profile.description, alias_text)
                    .trim()
                    .to_string()
            })
            .collect();
        format!(
            "Bekende sprekers – gebruik exact deze labels waar mogelijk:\n{}",
            formatted.join("\n")
        )
    };

    let segment_lines: Vec<String> = chunk
        .iter()
        .map(|segment| format!("{}. {}", segment.segment_id, segment.prompt_text))
        .collect();

    format!(
        r#"Analyseer de volgende transcriptsegmenten en wijs elke regel toe aan precies één spreker.

{speaker_guidance}

Segmenten:
{segments}

Beantwoord uitsluitend met één JSON-object met exact de volgende structuur:
{{
  "overall_confidence": "high|medium|low",
  "speakers": [
    {{ "label": "Spreker A", "description": "korte beschrijving van deze spreker", "aliases": ["alias", "bijnaam"] }}
  ],
  "segments": [
    {{ "segment_id": 12, "speaker": "Spreker A", "confidence": "high|medium|low", "reason": "relevante aanwijzingen", "refined_text": "optioneel licht verbeterde zin" }}
  ],
  "notes": "eventuele observaties of onzekerheden"
}}

Richtlijnen:
1. Gebruik elk segment_id precies één keer en gebruik geen ids die niet in de lijst voorkomen.
2. Introduceer alleen nieuwe labels wanneer echt nodig en ga alfabetisch verder.
3. Als een segment meerdere stemmen bevat, kies de dominante stem en licht dit toe in de reason of notes.
4. Houd de beschrijvingen, redenen en eventuele refined_text beknopt en wijzig alleen een zin wanneer dit de leesbaarheid verbetert zonder nieuwe informatie toe te voegen.
5. Laat refined_text weg wanneer je niets hoeft te verbeteren.
"#,
        speaker_guidance = speaker_guidance,
        segments = segment_lines.join("\n")
    )
}

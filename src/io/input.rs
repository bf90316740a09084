use std::path::Path;

use anyhow::{Context, Result};

use crate::models::RawSegment;

/// Read a plain transcript file
pub fn read_transcript_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
}

/// Parse a recognition-segments JSON file into ordered RawSegments
pub fn parse_recognition_file(path: &Path) -> Result<Vec<RawSegment>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_recognition_json(&content)
}

/// Parse a recognition-segments JSON string.
///
/// Accepts the recognizer's segment list and renumbers `segment_id`
/// sequentially (1-based) so downstream code can rely on positional ids
/// even when the source omitted them.
pub fn parse_recognition_json(json: &str) -> Result<Vec<RawSegment>> {
    let mut segments: Vec<RawSegment> =
        serde_json::from_str(json).context("Failed to parse recognition segments JSON")?;

    for (index, segment) in segments.iter_mut().enumerate() {
        segment.segment_id = (index + 1) as u32;
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_recognition_json_renumbers() {
        let json = r#"[
            {"text": "eerste segment", "start_seconds": 0.0, "end_seconds": 2.5},
            {"segment_id": 42, "text": "tweede segment", "confidence": 0.9}
        ]"#;

        let segments = parse_recognition_json(json).unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].segment_id, 1);
        assert_eq!(segments[1].segment_id, 2);
        assert_eq!(segments[1].text, "tweede segment");
        assert_eq!(segments[1].confidence, Some(0.9));
    }

    #[test]
    fn test_parse_recognition_json_rejects_garbage() {
        assert!(parse_recognition_json("{\"not\": \"a list\"}").is_err());
        assert!(parse_recognition_json("rommel").is_err());
    }

    #[test]
    fn test_read_files_from_disk() {
        let dir = tempfile::tempdir().unwrap();

        let transcript_path = dir.path().join("transcript.txt");
        let mut file = std::fs::File::create(&transcript_path).unwrap();
        write!(file, "Hallo daar. Hoe gaat het?").unwrap();
        assert_eq!(
            read_transcript_file(&transcript_path).unwrap(),
            "Hallo daar. Hoe gaat het?"
        );

        let segments_path = dir.path().join("segments.json");
        let mut file = std::fs::File::create(&segments_path).unwrap();
        write!(file, r#"[{{"text": "Hallo daar."}}]"#).unwrap();
        let segments = parse_recognition_file(&segments_path).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].segment_id, 1);
    }
}

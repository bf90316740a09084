use crate::models::{IdentificationResult, RawSegment};

/// Collect the refined-text fragments of a result, in segment order.
///
/// Each final segment contributes its refined text or, absent that, its
/// original text; blank entries are skipped.
pub fn refined_fragments(result: &IdentificationResult) -> Vec<String> {
    result
        .segments
        .iter()
        .filter_map(|segment| {
            let text = segment.refined_text.as_deref().unwrap_or(&segment.text).trim();
            if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            }
        })
        .collect()
}

/// Redistribute refined-text fragments onto the timing-bearing recognition
/// segments.
///
/// The two sequences have different granularity and no shared ids, so the
/// fragments are dealt out proportionally to each recognition segment's
/// share of the original text: a segment's character budget is its trimmed
/// length (minimum 1) relative to the total, scaled to the combined fragment
/// length. Consumption is greedy from a shared cursor; every segment that is
/// reached takes at least one fragment even when that overshoots its budget,
/// and the last segment absorbs whatever remains. Fragments within a bucket
/// are joined with single spaces.
///
/// Always terminates and assigns every fragment to exactly one segment. When
/// there are more segments than fragments, trailing segments keep
/// `refined_text` as None; that gap is deliberate, not an error.
pub fn realign(fragments: &[String], mut segments: Vec<RawSegment>) -> Vec<RawSegment> {
    if segments.is_empty() || fragments.is_empty() {
        return segments;
    }

    let weights: Vec<usize> = segments
        .iter()
        .map(|s| s.text.trim().chars().count().max(1))
        .collect();
    let total_base: usize = weights.iter().sum();
    let total_refined: usize = fragments.iter().map(|f| f.chars().count()).sum();

    let mut cursor = 0usize;
    let last_index = segments.len() - 1;

    for (index, segment) in segments.iter_mut().enumerate() {
        if cursor >= fragments.len() {
            break;
        }

        let target = weights[index] as f64 / total_base as f64 * total_refined as f64;
        let mut bucket: Vec<&str> = Vec::new();
        let mut bucket_len = 0usize;

        if index == last_index {
            while cursor < fragments.len() {
                bucket.push(&fragments[cursor]);
                cursor += 1;
            }
        } else {
            loop {
                bucket.push(&fragments[cursor]);
                bucket_len += fragments[cursor].chars().count();
                cursor += 1;
                if cursor >= fragments.len() || bucket_len as f64 >= target {
                    break;
                }
            }
        }

        segment.refined_text = Some(bucket.join(" "));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confidence::Confidence;
    use crate::models::IdentifiedSegment;

    fn raw(id: u32, text: &str) -> RawSegment {
        RawSegment::new(id, text)
    }

    fn fragments(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_single_fragment_lands_on_first_segment() {
        // Weights 10/10/80; the only fragment overshoots the first budget
        // immediately, so the remaining segments get nothing.
        let segments = vec![
            raw(1, &"a".repeat(10)),
            raw(2, &"b".repeat(10)),
            raw(3, &"c".repeat(80)),
        ];
        let fragment = "x".repeat(100);

        let result = realign(&fragments(&[&fragment]), segments);

        assert_eq!(result[0].refined_text.as_deref(), Some(fragment.as_str()));
        assert!(result[1].refined_text.is_none());
        assert!(result[2].refined_text.is_none());
    }

    #[test]
    fn test_even_weights_spread_fragments() {
        let segments = vec![raw(1, &"a".repeat(20)), raw(2, &"b".repeat(20))];
        let frags = fragments(&[&"x".repeat(20), &"y".repeat(20)]);

        let result = realign(&frags, segments);

        assert_eq!(result[0].refined_text.as_deref(), Some("x".repeat(20).as_str()));
        assert_eq!(result[1].refined_text.as_deref(), Some("y".repeat(20).as_str()));
    }

    #[test]
    fn test_last_segment_absorbs_remainder() {
        let segments = vec![raw(1, "b"), raw(2, &"a".repeat(100))];
        let frags = fragments(&["een", "twee", "drie", "vier"]);

        let result = realign(&frags, segments);

        // The tiny first segment overshoots immediately with one fragment;
        // the last segment absorbs everything left, budget or not.
        assert_eq!(result[0].refined_text.as_deref(), Some("een"));
        assert_eq!(result[1].refined_text.as_deref(), Some("twee drie vier"));
    }

    #[test]
    fn test_more_segments_than_fragments_leaves_gaps() {
        let segments = vec![raw(1, "aaaa"), raw(2, "bbbb"), raw(3, "cccc"), raw(4, "dddd")];
        let frags = fragments(&["alles"]);

        let result = realign(&frags, segments);

        assert_eq!(result[0].refined_text.as_deref(), Some("alles"));
        for segment in &result[1..] {
            assert!(segment.refined_text.is_none());
        }
    }

    #[test]
    fn test_empty_inputs_are_noops() {
        assert!(realign(&fragments(&["iets"]), vec![]).is_empty());

        let segments = vec![raw(1, "tekst")];
        let result = realign(&[], segments);
        assert!(result[0].refined_text.is_none());
    }

    #[test]
    fn test_blank_text_weight_floors_at_one() {
        let segments = vec![raw(1, "   "), raw(2, &"b".repeat(50))];
        let frags = fragments(&["kort", &"lang".repeat(10)]);

        let result = realign(&frags, segments);

        // The blank segment still takes its one fragment
        assert_eq!(result[0].refined_text.as_deref(), Some("kort"));
        assert!(result[1].refined_text.is_some());
    }

    #[test]
    fn test_fragments_from_result_prefer_refined_text() {
        let result = IdentificationResult {
            speakers_identified: true,
            total_speakers: 2,
            segments: vec![
                IdentifiedSegment {
                    segment_id: 1,
                    speaker: "Spreker A".to_string(),
                    text: "originele zin".to_string(),
                    refined_text: Some("verbeterde zin".to_string()),
                    start_index: 0,
                    end_index: 13,
                    confidence: Confidence::High,
                },
                IdentifiedSegment {
                    segment_id: 2,
                    speaker: "Spreker B".to_string(),
                    text: "tweede zin".to_string(),
                    refined_text: None,
                    start_index: 14,
                    end_index: 24,
                    confidence: Confidence::Medium,
                },
                IdentifiedSegment {
                    segment_id: 3,
                    speaker: "Spreker B".to_string(),
                    text: "   ".to_string(),
                    refined_text: None,
                    start_index: 25,
                    end_index: 28,
                    confidence: Confidence::Low,
                },
            ],
            confidence: Confidence::Medium,
            notes: String::new(),
        };

        let frags = refined_fragments(&result);
        assert_eq!(frags, vec!["verbeterde zin".to_string(), "tweede zin".to_string()]);
    }
}

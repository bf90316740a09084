use std::fmt;

use serde::{Deserialize, Serialize};

/// Qualitative confidence level reported by the model per chunk and per
/// segment assignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    #[default]
    Medium,
    High,
}

impl Confidence {
    /// Parse a model-provided label; unrecognized values default to medium
    pub fn parse_or_medium(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "low" => Confidence::Low,
            "high" => Confidence::High,
            _ => Confidence::Medium,
        }
    }

    /// Numeric score used for aggregation
    pub fn score(self) -> u32 {
        match self {
            Confidence::Low => 1,
            Confidence::Medium => 2,
            Confidence::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate per-chunk confidence levels into a single call-level value.
///
/// Arithmetic mean of the numeric scores, bucketed at 2.5 (high) and 1.5
/// (low). An empty list aggregates to medium.
pub fn aggregate_confidence(values: &[Confidence]) -> Confidence {
    if values.is_empty() {
        return Confidence::Medium;
    }

    let total: u32 = values.iter().map(|v| v.score()).sum();
    let mean = total as f64 / values.len() as f64;

    if mean >= 2.5 {
        Confidence::High
    } else if mean <= 1.5 {
        Confidence::Low
    } else {
        Confidence::Medium
    }
}

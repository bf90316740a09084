use thiserror::Error;

/// Failure taxonomy for the identification pipeline.
///
/// Every stage returns a typed result; none of these variants reach callers
/// of `identify_speakers`, which collapses them into the fallback result at
/// the orchestration boundary.
#[derive(Debug, Error)]
pub enum IdentifyError {
    /// Model output could not be parsed as JSON, even after brace extraction
    #[error("model output is not parseable JSON")]
    Parse,

    /// JSON parsed but lacks the required shape
    #[error("model output missing required structure: {0}")]
    Schema(String),

    /// No usable per-segment assignment in a chunk, or the final result
    /// failed structural checks
    #[error("validation failed: {0}")]
    Validation(String),

    /// The text-generation call itself failed or timed out
    #[error("text generation call failed: {0}")]
    ExternalService(#[source] anyhow::Error),
}

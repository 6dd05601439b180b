//! Plan generation error types

use thiserror::Error;

/// Errors that can surface from plan generation.
///
/// Travel-leg resolution never produces these: all of its failure modes
/// degrade to "legs unknown" at its boundary. The normalizer never errors
/// either - it always repairs. What remains is the validation gate and the
/// suggestion collaborator.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("at least 2 stops are required, have {have}")]
    NotEnoughStops { have: usize },

    #[error("suggestion service unreachable: {0}")]
    UpstreamUnavailable(#[from] reqwest::Error),

    #[error("suggestion service rejected the request ({status}): {message}")]
    UpstreamRejected { status: u16, message: String },

    #[error("malformed suggestion payload: {0}")]
    MalformedResponse(String),
}

impl PlanError {
    /// Check if this is the pre-flight validation failure
    pub fn is_validation(&self) -> bool {
        matches!(self, PlanError::NotEnoughStops { .. })
    }

    /// Check if retrying the same request could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            PlanError::NotEnoughStops { .. } => false,
            PlanError::UpstreamUnavailable(_) => true,
            PlanError::UpstreamRejected { status, .. } => *status >= 500,
            PlanError::MalformedResponse(_) => true,
        }
    }
}

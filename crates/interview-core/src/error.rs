//! Error types for the interview engine.
//!
//! `SimilarityError` lives here rather than in `interview-similarity` so the
//! evaluation orchestrator can classify and absorb similarity failures
//! without depending on any concrete client.

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by the evaluation orchestrator and session manager.
#[derive(Debug, Error)]
pub enum InterviewError {
    /// No question with this id exists in the catalog.
    #[error("question not found with id: {0}")]
    QuestionNotFound(usize),

    /// No live session with this id exists.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// The evaluation store failed to read or write.
    #[error("evaluation store error: {0:#}")]
    Storage(#[source] anyhow::Error),

    /// A configuration value is unusable (e.g. a zero session size).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl InterviewError {
    /// Returns `true` for the "no such resource" family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            InterviewError::QuestionNotFound(_) | InterviewError::SessionNotFound(_)
        )
    }
}

/// Errors a similarity provider can report.
///
/// None of these ever fail an evaluation; they only switch scoring to the
/// keyword-only path.
#[derive(Debug, Error)]
pub enum SimilarityError {
    /// The call did not finish within the configured timeout.
    #[error("similarity request timed out after {0:?}")]
    Timeout(Duration),

    /// The service could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with an error status.
    #[error("similarity API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The service answered with something that is not a usable score.
    #[error("invalid similarity response: {0}")]
    InvalidResponse(String),

    /// Similarity scoring is switched off in configuration.
    #[error("similarity scoring is disabled")]
    Disabled,
}

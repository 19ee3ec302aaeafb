//! Shared error types for the services crate.

use thiserror::Error;

use survey_core::model::SurveyError;

/// Generic message shown to a user when a summary could not be produced.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate summary";

/// Failures talking to the text-generation provider (or to a remote summary endpoint).
///
/// Carries enough detail for logs; callers should show `SummaryError::public_message`
/// instead of this text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UpstreamError {
    #[error("summary provider is not configured")]
    NotConfigured,
    #[error("summary provider timed out")]
    Timeout,
    #[error("summary provider request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("summary provider returned a malformed body: {0}")]
    Malformed(String),
    #[error("summary provider returned an empty response")]
    EmptyResponse,
    #[error(transparent)]
    Http(reqwest::Error),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Http(err)
        }
    }
}

/// Errors emitted by `SummaryService` and every `SummaryGenerator`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("no answers provided")]
    InvalidInput,
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl SummaryError {
    /// Caller-facing text that never exposes provider internals.
    #[must_use]
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidInput => "No answers provided",
            Self::Upstream(_) => "Something went wrong",
        }
    }
}

/// Errors emitted by `SurveyController::submit`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmitError {
    #[error(transparent)]
    Survey(#[from] SurveyError),
    #[error("{}", GENERATION_FAILED_MESSAGE)]
    Generation(#[source] SummaryError),
}

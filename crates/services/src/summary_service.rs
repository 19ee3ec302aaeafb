use std::env;
use std::sync::Arc;

use survey_core::model::{QaPair, Summary};
use survey_core::{SYSTEM_PROMPT, render_prompt};
use tracing::{debug, warn};

use crate::error::{SummaryError, UpstreamError};
use crate::provider::{ChatCompletionsProvider, CompletionProvider, CompletionRequest};

/// Text returned in place of a summary when the provider sends no content.
pub const FALLBACK_SUMMARY: &str = "Summary generation failed.";

/// What to do when the provider answers successfully but without content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmptyContentPolicy {
    /// Degraded success: return `FALLBACK_SUMMARY`.
    #[default]
    Fallback,
    /// Treat it as an upstream failure.
    Fail,
}

impl EmptyContentPolicy {
    /// Reads `SURVEY_AI_EMPTY_CONTENT` (`fallback` or `error`).
    #[must_use]
    pub fn from_env() -> Self {
        env::var("SURVEY_AI_EMPTY_CONTENT")
            .ok()
            .and_then(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fallback" => Some(Self::Fallback),
            "error" | "fail" => Some(Self::Fail),
            _ => None,
        }
    }
}

/// Turns a set of survey answers into one professional summary paragraph.
///
/// Stateless per call; share it behind an `Arc` across sessions and requests.
#[derive(Clone)]
pub struct SummaryService {
    provider: Arc<dyn CompletionProvider>,
    empty_content: EmptyContentPolicy,
}

impl SummaryService {
    #[must_use]
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            empty_content: EmptyContentPolicy::default(),
        }
    }

    /// Provider and policy configured from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(Arc::new(ChatCompletionsProvider::from_env()))
            .with_empty_content_policy(EmptyContentPolicy::from_env())
    }

    #[must_use]
    pub fn with_empty_content_policy(mut self, policy: EmptyContentPolicy) -> Self {
        self.empty_content = policy;
        self
    }

    #[must_use]
    pub fn empty_content_policy(&self) -> EmptyContentPolicy {
        self.empty_content
    }

    /// Generate a summary for the given question/answer pairs.
    ///
    /// Performs exactly one provider request. Answers are not re-validated here.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::InvalidInput` when `pairs` is empty (no request is made).
    /// Returns `SummaryError::Upstream` for provider or network failures.
    pub async fn generate_summary(&self, pairs: &[QaPair]) -> Result<Summary, SummaryError> {
        if pairs.is_empty() {
            return Err(SummaryError::InvalidInput);
        }

        let request = CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: render_prompt(pairs),
        };
        debug!(
            model = self.provider.model(),
            pairs = pairs.len(),
            "requesting summary"
        );

        let content = match self.provider.complete(&request).await {
            Ok(content) => content,
            Err(err) => {
                warn!(model = self.provider.model(), error = %err, "summary provider failed");
                return Err(err.into());
            }
        };

        match content.filter(|text| !text.trim().is_empty()) {
            Some(text) => Ok(Summary::new(text)),
            None => match self.empty_content {
                EmptyContentPolicy::Fallback => {
                    warn!(
                        model = self.provider.model(),
                        "summary provider returned no content, using fallback"
                    );
                    Ok(Summary::new(FALLBACK_SUMMARY))
                }
                EmptyContentPolicy::Fail => {
                    warn!(model = self.provider.model(), "summary provider returned no content");
                    Err(UpstreamError::EmptyResponse.into())
                }
            },
        }
    }
}

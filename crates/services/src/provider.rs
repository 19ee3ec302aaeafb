//! OpenAI-compatible chat-completions client used to write summaries.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "openrouter/auto";
const DEFAULT_REFERER: &str = "http://localhost:3000";
const DEFAULT_TITLE: &str = "Survey AI App";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub referer: Option<String>,
    pub title: Option<String>,
    pub timeout: Duration,
}

impl ProviderConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            referer: None,
            title: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read provider settings from the process environment.
    ///
    /// Returns `None` when no API key is set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, with a custom variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let api_key = lookup("SURVEY_AI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .or_else(|| lookup("OPENROUTER_API_KEY"))?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url = lookup("SURVEY_AI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let model = lookup("SURVEY_AI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into());
        let referer = lookup("SURVEY_AI_REFERER").or_else(|| Some(DEFAULT_REFERER.into()));
        let title = lookup("SURVEY_AI_TITLE").or_else(|| Some(DEFAULT_TITLE.into()));
        let timeout_secs = lookup("SURVEY_AI_TIMEOUT_SECS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Some(Self {
            base_url,
            api_key,
            model,
            referer: referer.filter(|value| !value.trim().is_empty()),
            title: title.filter(|value| !value.trim().is_empty()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// The two messages sent for one summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
}

/// A text-generation backend.
///
/// `complete` performs exactly one request and returns the first choice's
/// content, or `None` if the provider sent no usable content.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn model(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, UpstreamError>;
}

#[derive(Clone)]
pub struct ChatCompletionsProvider {
    client: Client,
    config: Option<ProviderConfig>,
}

impl ChatCompletionsProvider {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ProviderConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<ProviderConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionsProvider {
    fn model(&self) -> &str {
        self.config
            .as_ref()
            .map_or("unconfigured", |config| config.model.as_str())
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, UpstreamError> {
        let config = self.config.as_ref().ok_or(UpstreamError::NotConfigured)?;

        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: &config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
        };

        let mut builder = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .timeout(config.timeout)
            .json(&payload);
        if let Some(referer) = &config.referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(title) = &config.title {
            builder = builder.header("X-Title", title);
        }

        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(UpstreamError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string()))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

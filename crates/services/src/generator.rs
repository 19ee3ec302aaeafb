//! The seam between the survey controller and whatever produces summaries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use survey_core::model::{QaPair, SubmissionPayload, Summary, SummaryResponse};
use tracing::debug;

use crate::error::{SummaryError, UpstreamError};
use crate::summary_service::SummaryService;

/// Produces a summary for a complete answer set. One call is one upstream attempt.
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn generate(&self, pairs: &[QaPair]) -> Result<Summary, SummaryError>;
}

#[async_trait]
impl SummaryGenerator for SummaryService {
    async fn generate(&self, pairs: &[QaPair]) -> Result<Summary, SummaryError> {
        self.generate_summary(pairs).await
    }
}

/// Calls a remote summary endpoint (`POST {base_url}/api/summary`).
#[derive(Clone)]
pub struct HttpSummaryClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpSummaryClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:3000`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/api/summary", base_url.trim_end_matches('/')),
            timeout: Duration::from_secs(90),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SummaryGenerator for HttpSummaryClient {
    async fn generate(&self, pairs: &[QaPair]) -> Result<Summary, SummaryError> {
        let payload = SubmissionPayload::from(pairs.to_vec());
        debug!(endpoint = %self.endpoint, pairs = pairs.len(), "posting answers");

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(UpstreamError::from)?;

        match response.status() {
            status if status.is_success() => {
                let body: SummaryResponse = response.json().await.map_err(UpstreamError::from)?;
                Ok(Summary::new(body.summary))
            }
            StatusCode::BAD_REQUEST => Err(SummaryError::InvalidInput),
            status => Err(UpstreamError::HttpStatus(status).into()),
        }
    }
}

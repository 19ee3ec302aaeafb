#![forbid(unsafe_code)]

pub mod error;
pub mod generator;
pub mod provider;
pub mod summary_service;
pub mod survey;

pub use error::{GENERATION_FAILED_MESSAGE, SubmitError, SummaryError, UpstreamError};
pub use generator::{HttpSummaryClient, SummaryGenerator};
pub use provider::{ChatCompletionsProvider, CompletionProvider, CompletionRequest, ProviderConfig};
pub use summary_service::{EmptyContentPolicy, FALLBACK_SUMMARY, SummaryService};
pub use survey::{SubmitOutcome, SurveyController, SurveySnapshot};

//! HTTP transport for the summary service.
//!
//! `POST /api/summary` accepts `{ "answers": [ { "question", "answer" } ] }` and replies
//! with `{ "summary": ... }` or `{ "error": ... }`. `GET /health` answers `ok`.

#![forbid(unsafe_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use services::{SummaryError, SummaryService};
use survey_core::model::{ErrorResponse, QaPair, SubmissionPayload, SummaryResponse};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

pub const SUMMARY_PATH: &str = "/api/summary";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ServeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("http server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[derive(Clone)]
struct AppState {
    summaries: Arc<SummaryService>,
}

/// Build the router. The service is shared by every request.
#[must_use]
pub fn router(summaries: Arc<SummaryService>) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health_handler))
        .route(SUMMARY_PATH, post(summary_handler))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { summaries })
}

/// Bind `addr` and serve until the process exits.
///
/// # Errors
///
/// Returns `ServeError::Bind` if the listener cannot be opened and
/// `ServeError::Serve` if the server loop fails.
pub async fn serve(addr: SocketAddr, summaries: Arc<SummaryService>) -> Result<(), ServeError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;
    let local = listener.local_addr().unwrap_or(addr);
    info!(%local, path = SUMMARY_PATH, "summary server listening");

    axum::serve(listener, router(summaries))
        .await
        .map_err(ServeError::Serve)
}

async fn health_handler() -> impl IntoResponse {
    "ok"
}

async fn summary_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let Some(pairs) = parse_answers(&body) else {
        debug!(bytes = body.len(), "rejecting summary request without answers");
        return error_response(&SummaryError::InvalidInput);
    };

    match state.summaries.generate_summary(&pairs).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(SummaryResponse {
                summary: summary.into_inner(),
            }),
        )
            .into_response(),
        Err(err) => {
            if matches!(err, SummaryError::InvalidInput) {
                debug!("summary request had no answers");
            } else {
                error!(error = %err, "summary generation failed");
            }
            error_response(&err)
        }
    }
}

/// Missing, malformed and empty answer lists all count as "no answers".
fn parse_answers(body: &[u8]) -> Option<Vec<QaPair>> {
    serde_json::from_slice::<SubmissionPayload>(body)
        .ok()
        .map(SubmissionPayload::into_pairs)
        .filter(|pairs| !pairs.is_empty())
}

fn error_response(err: &SummaryError) -> Response {
    let status = match err {
        SummaryError::InvalidInput => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse::new(err.public_message()))).into_response()
}

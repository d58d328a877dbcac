//! HTTP edge: API router, guard middleware, metrics listener, shutdown.
//!
//! This module provides:
//! - Shared handler state and router assembly (`AppState`, [`router`])
//! - One GET handler per operation plus `/healthz` (`routes`)
//! - Guard middleware that answers before any handler runs (`middleware`)
//! - The separate metrics router (`metrics`)
//! - Signal handling and bounded-grace drain (`shutdown`)
//!
//! Everything here decodes requests and encodes responses; the decisions
//! live in [`crate::pipeline::Orchestrator`].

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderName, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::MuninError;
use crate::limiter::RateLimiter;
use crate::pipeline::Orchestrator;

pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod shutdown;

/// Shared state behind every API handler.
pub struct AppState {
    pub orchestrator: Orchestrator,
    /// `None` when rate limiting is disabled in config.
    pub limiter: Option<RateLimiter>,
    /// Trusted header naming the client; peer IP is used when unset.
    pub identity_header: Option<HeaderName>,
    pub max_url_len: usize,
}

/// Assemble the API router. Guards run outermost-first: rate limit,
/// then URL length, then the handler.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/translate", get(routes::translate))
        .route("/format", get(routes::format))
        .route("/summarize", get(routes::summarize))
        .route("/healthz", get(routes::healthz))
        .layer(from_fn_with_state(state.clone(), middleware::url_len_guard))
        .layer(from_fn_with_state(state.clone(), middleware::rate_limit_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

impl MuninError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            MuninError::BadRequest(_) => StatusCode::BAD_REQUEST,
            MuninError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            MuninError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MuninError::GenerationUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            MuninError::EmptyGeneration => StatusCode::INTERNAL_SERVER_ERROR,
            MuninError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MuninError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_mapping() {
        assert_eq!(
            MuninError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(MuninError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            MuninError::Storage("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            MuninError::GenerationUnavailable {
                status: Some(500),
                message: "x".into()
            }
            .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            MuninError::EmptyGeneration.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

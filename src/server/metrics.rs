//! Metrics listener: a second router kept off the public API port.

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use prometheus::Registry;

use crate::telemetry;

/// Router for the metrics listener. `GET /metrics` renders the passed
/// registry in the Prometheus text format. No guards here: the listener
/// binds its own (typically private) address.
pub fn router(registry: Registry) -> Router {
    Router::new()
        .route("/metrics", get(render))
        .with_state(registry)
}

async fn render(State(registry): State<Registry>) -> String {
    telemetry::render(&registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::Metrics;
    use crate::types::Operation;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn metrics_endpoint_renders_registry() {
        let registry = Registry::new();
        let metrics = Metrics::new(&registry).unwrap();
        metrics.record_request(Operation::Translate);

        let response = router(registry)
            .oneshot(
                Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("munin_requests_total"));
    }
}

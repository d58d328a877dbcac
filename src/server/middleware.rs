//! Guard middleware: answers before any handler logic runs.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderName;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use super::AppState;
use crate::MuninError;

/// Reject with 429 when the client's bucket is empty. Pass-through when
/// rate limiting is disabled.
pub async fn rate_limit_guard(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(limiter) = &state.limiter {
        let identity = client_identity(state.identity_header.as_ref(), &request);
        if !limiter.admit(&identity) {
            debug!(%identity, path = %request.uri().path(), "rate limited");
            return MuninError::RateLimited.into_response();
        }
    }
    next.run(request).await
}

/// Reject with 400 when the URL (path and query) exceeds the configured
/// length.
pub async fn url_len_guard(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if request.uri().to_string().len() > state.max_url_len {
        return MuninError::BadRequest(format!("URL exceeds {} bytes", state.max_url_len))
            .into_response();
    }
    next.run(request).await
}

/// Derive the bucket key for one request.
///
/// The configured trusted header wins when present; its value is used
/// byte-for-byte, so differently-cased values are different identities.
/// Without it the peer IP is used. Requests with neither (no header, no
/// connect info) share the anonymous "" bucket.
pub(crate) fn client_identity(identity_header: Option<&HeaderName>, request: &Request) -> String {
    if let Some(name) = identity_header
        && let Some(value) = request.headers().get(name)
    {
        return String::from_utf8_lossy(value.as_bytes()).into_owned();
    }
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request() -> Request {
        Request::builder()
            .uri("/translate?keyword=hi")
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn peer_ip_without_configured_header() {
        let mut request = request();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 9], 4242))));
        assert_eq!(client_identity(None, &request), "10.0.0.9");
    }

    #[test]
    fn header_value_is_verbatim_and_case_sensitive() {
        let header = HeaderName::from_static("x-client-id");
        let mut request = request();
        // header names match case-insensitively per HTTP
        request
            .headers_mut()
            .insert("X-Client-ID".parse::<HeaderName>().unwrap(), "Alice".parse().unwrap());
        assert_eq!(client_identity(Some(&header), &request), "Alice");
    }

    #[test]
    fn missing_header_falls_back_to_peer_ip() {
        let header = HeaderName::from_static("x-client-id");
        let mut request = request();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 1], 80))));
        assert_eq!(client_identity(Some(&header), &request), "192.168.1.1");
    }

    #[test]
    fn no_identity_at_all_is_the_anonymous_bucket() {
        let request = request();
        assert_eq!(client_identity(None, &request), "");
    }
}

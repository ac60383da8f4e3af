//! Prometheus metrics for the API server.

use std::time::Instant;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "mlr_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "mlr_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "mlr_http_requests_in_flight";

    pub const URL_CLASSIFICATIONS_TOTAL: &str = "mlr_url_classifications_total";

    pub const UPSTREAM_CALLS_TOTAL: &str = "mlr_upstream_calls_total";
    pub const UPSTREAM_CALL_DURATION_SECONDS: &str = "mlr_upstream_call_duration_seconds";

    pub const RATE_LIMIT_HITS_TOTAL: &str = "mlr_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a classification outcome (`platform` is `unknown` or `invalid`
/// when nothing matched).
pub fn record_classification(platform: &str) {
    let labels = [("platform", platform.to_string())];
    counter!(names::URL_CLASSIFICATIONS_TOTAL, &labels).increment(1);
}

/// Record an external collaborator call.
pub fn record_upstream_call(service: &str, outcome: &str, duration_secs: f64) {
    let labels = [
        ("service", service.to_string()),
        ("outcome", outcome.to_string()),
    ];
    counter!(names::UPSTREAM_CALLS_TOTAL, &labels).increment(1);
    histogram!(names::UPSTREAM_CALL_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", endpoint.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Label for the route that handled `request`.
///
/// Uses the route template (`/api/items/:id`), so label cardinality is
/// bounded by the router. Unrouted paths all share `/other`.
pub fn route_label<B>(request: &Request<B>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "/other".to_string())
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = route_label(&request);
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);
    let response = next.run(request).await;
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};
    use axum::routing::get;
    use axum::{middleware, Router};
    use tower::ServiceExt;

    async fn label_header(request: Request<Body>, next: Next) -> Response<Body> {
        let label = route_label(&request);
        let mut response = next.run(request).await;
        if let Ok(value) = HeaderValue::from_str(&label) {
            response.headers_mut().insert("x-route-label", value);
        }
        response
    }

    fn labelled_router() -> Router {
        let api = Router::new()
            .route("/platforms", get(|| async { "ok" }))
            .route("/items/:id", get(|| async { "ok" }));
        Router::new()
            .nest("/api", api)
            .route("/health", get(|| async { "ok" }))
            .fallback(|| async { StatusCode::NOT_FOUND })
            .layer(middleware::from_fn(label_header))
    }

    async fn label_for(uri: &str) -> String {
        let response = labelled_router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.headers()["x-route-label"].to_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_route_label_uses_template() {
        assert_eq!(label_for("/api/platforms").await, "/api/platforms");
        assert_eq!(label_for("/api/items/123").await, "/api/items/:id");
        assert_eq!(label_for("/health").await, "/health");
    }

    #[tokio::test]
    async fn test_unrouted_paths_share_one_label() {
        let mut labels = std::collections::HashSet::new();
        for i in 0..5 {
            labels.insert(label_for(&format!("/api/scan-{}x", i)).await);
        }
        labels.insert(label_for("/wp-admin/login.php").await);
        assert_eq!(labels.len(), 1);
        assert!(labels.contains("/other"));
    }
}

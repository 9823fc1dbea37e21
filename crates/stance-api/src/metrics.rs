//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use stance_media::AnalysisStats;
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "stance_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "stance_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "stance_http_requests_in_flight";

    // Analysis metrics
    pub const ANALYSES_TOTAL: &str = "stance_analyses_total";
    pub const ANALYSIS_FAILURES_TOTAL: &str = "stance_analysis_failures_total";
    pub const ANALYSIS_DURATION_SECONDS: &str = "stance_analysis_duration_seconds";
    pub const ANALYSES_IN_FLIGHT: &str = "stance_analyses_in_flight";
    pub const FRAMES_PROCESSED_TOTAL: &str = "stance_frames_processed_total";
    pub const POSE_MATCHES_TOTAL: &str = "stance_pose_matches_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", route_label(path).to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a completed analysis.
pub fn record_analysis_success(stats: &AnalysisStats, duration_secs: f64) {
    counter!(names::ANALYSES_TOTAL, "outcome" => "success").increment(1);
    histogram!(names::ANALYSIS_DURATION_SECONDS).record(duration_secs);
    counter!(names::FRAMES_PROCESSED_TOTAL).increment(stats.frames_decoded);

    for (pose, matches) in &stats.matches {
        counter!(names::POSE_MATCHES_TOTAL, "pose" => *pose).increment(*matches);
    }
}

/// Record a failed analysis.
pub fn record_analysis_failure(kind: &'static str, duration_secs: f64) {
    counter!(names::ANALYSES_TOTAL, "outcome" => "failure").increment(1);
    counter!(names::ANALYSIS_FAILURES_TOTAL, "kind" => kind).increment(1);
    histogram!(names::ANALYSIS_DURATION_SECONDS).record(duration_secs);
}

pub fn analysis_started() {
    gauge!(names::ANALYSES_IN_FLIGHT).increment(1.0);
}

pub fn analysis_finished() {
    gauge!(names::ANALYSES_IN_FLIGHT).decrement(1.0);
}

/// Route label for a request path; unknown paths share one label.
fn route_label(path: &str) -> &'static str {
    match path {
        "/health" => "/health",
        "/healthz" => "/healthz",
        "/ready" => "/ready",
        "/analyze" => "/analyze",
        "/metrics" => "/metrics",
        _ => "other",
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    // Increment in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    // Decrement in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_label() {
        assert_eq!(route_label("/analyze"), "/analyze");
        assert_eq!(route_label("/health"), "/health");
        assert_eq!(route_label("/wp-admin/setup.php"), "other");
    }
}

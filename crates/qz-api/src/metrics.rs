//! Prometheus metrics for the HTTP layer and study activity.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use qz_study::{LevelChange, ReviewOutcome};
use uuid::Uuid;

use crate::ApiState;

/// Install the Prometheus recorder. Can only succeed once per process.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full("http_request_duration_seconds".to_string()),
        &[
            0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ],
    )?;

    let handle = builder.install_recorder()?;

    Ok(handle)
}

/// Middleware to record HTTP request metrics
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(duration);

    response
}

/// Replace UUID and numeric path segments with `:id` to bound label cardinality.
fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            let is_id = Uuid::parse_str(segment).is_ok()
                || (!segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()));
            if is_id { ":id" } else { segment }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler(State(state): State<ApiState>) -> Response {
    match state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Count one answered question, and its level change if any.
pub fn record_review(outcome: &ReviewOutcome) {
    let result = if outcome.correct { "correct" } else { "incorrect" };

    counter!(
        "study_reviews_total",
        "outcome" => result,
        "level" => outcome.state.level.as_str()
    )
    .increment(1);

    if outcome.level_change != LevelChange::Unchanged {
        counter!(
            "study_level_changes_total",
            "direction" => outcome.level_change.as_str()
        )
        .increment(1);
    }

    if outcome.recovered {
        counter!("study_state_resets_total").increment(1);
    }
}

/// Count session lifecycle events (`started`, `ended`, `reaped`).
pub fn record_session_events(event: &'static str, count: u64) {
    counter!("study_sessions_total", "event" => event).increment(count);
}

use axum::{Router, http::StatusCode, middleware, response::IntoResponse, routing::get};
use tower_http::trace::TraceLayer;

use crate::{
    error::ApiError,
    metrics::{metrics_handler, track_metrics},
    middleware::request_id::request_id_middleware,
    state::ApiState,
    v1,
};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .nest("/v1", v1::routes())
        .fallback(handler_404)
        .layer(middleware::from_fn(track_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> impl IntoResponse {
    ApiError::NotFound("The requested resource".to_string())
}

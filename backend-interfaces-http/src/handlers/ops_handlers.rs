use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tokio::time::{timeout, Duration};
use tracing::error;

use backend_application::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
}

pub async fn health_live() -> impl IntoResponse {
    Json(HealthStatus { status: "ok" })
}

pub async fn health_ready(State(state): State<AppState>) -> impl IntoResponse {
    let timeout_secs = state.config.request_timeout_seconds.max(1);
    let timeout_duration = Duration::from_secs(timeout_secs);
    let unavailable = (StatusCode::SERVICE_UNAVAILABLE, Json(HealthStatus { status: "unavailable" }));
    match timeout(timeout_duration, state.event_repo.ping()).await {
        Ok(Ok(_)) => (StatusCode::OK, Json(HealthStatus { status: "ready" })),
        Ok(Err(err)) => {
            error!("ready check failed: {}", err);
            unavailable
        }
        Err(_) => {
            error!("ready check timeout after {}s", timeout_secs);
            unavailable
        }
    }
}

pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload)
}

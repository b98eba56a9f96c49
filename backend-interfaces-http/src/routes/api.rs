use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::{middleware, Router};

use backend_application::AppState;

use crate::handlers::{event_handlers, ops_handlers};
use crate::middleware::track_errors;

pub fn build_router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.config.max_body_bytes).unwrap_or(usize::MAX);
    Router::new()
        .route("/api/create-event/", post(event_handlers::create_event))
        .route(
            "/api/create-events-batch/",
            post(event_handlers::create_events_batch),
        )
        .route("/api/get-events/", get(event_handlers::get_events))
        .route(
            "/api/update-event/:event_id/",
            put(event_handlers::update_event),
        )
        .route(
            "/api/delete-event/:event_id/",
            delete(event_handlers::delete_event),
        )
        .route("/api/ops/health/live", get(ops_handlers::health_live))
        .route("/api/ops/health/ready", get(ops_handlers::health_ready))
        .route(
            "/api/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(state.clone(), track_errors))
        .with_state(state)
}

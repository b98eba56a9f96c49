use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use backend_application::AppState;

/// Counts every 4xx/5xx answer in the request error counter.
pub async fn track_errors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        state.metrics.record_error();
    }
    response
}

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::routes::AppState;

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// GET /ready - Readiness probe
///
/// State only exists once the catalog and cluster model loaded and agreed,
/// so reaching this handler means the service can answer requests.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "recipes": state.catalog.len(),
            "clusters": state.recommender.model().k,
        })),
    )
}

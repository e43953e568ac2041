//! Liveness endpoint.

use axum::Json;

/// GET /health — process is up and serving.
pub async fn check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

//! Liveness endpoint backed by a trivial store query.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tracing::warn;

use crate::dto::HealthResponse;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    if state.db.health_check().await {
        return (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
            }),
        );
    }

    warn!("Health check failed: database unavailable");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(HealthResponse {
            status: "unavailable".to_string(),
        }),
    )
}

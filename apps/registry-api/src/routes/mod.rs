//! HTTP routes.
//!
//! ```text
//! GET    /health
//! GET    /api/regions
//! GET    /api/clients
//! POST   /api/clients
//! GET    /api/clients/parents
//! GET    /api/clients/{client_id}
//! PATCH  /api/clients/{client_id}
//! DELETE /api/clients/{client_id}
//! ```

pub mod clients;
pub mod health;
pub mod regions;

use std::sync::Arc;

use axum::Router;

use crate::AppState;

/// Everything mounted under `/api`.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(regions::routes())
        .merge(clients::routes())
}

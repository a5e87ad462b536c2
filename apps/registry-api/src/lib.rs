//! # Registry API
//!
//! HTTP server for the client registry.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Registry API Server                              │
//! │                                                                         │
//! │  HTTP ──► TraceLayer ──► CorsLayer ──► routes ──► ClientService        │
//! │                                          │              │               │
//! │                                          │              ▼               │
//! │                                          └────────► registry-db         │
//! │                                                      (SQLite)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The binary (`main.rs`) only loads configuration, calls
//! [`AppState::initialize`] and serves [`build_router`]; tests build the
//! same router over an in-memory database.

pub mod config;
pub mod dto;
pub mod error;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use registry_db::{Database, DbResult};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use crate::config::{ApiConfig, ConfigError};
pub use crate::error::{ApiError, ApiResult, ErrorDetail, ErrorResponse};
use crate::services::ClientService;

/// Shared application state.
pub struct AppState {
    pub db: Database,
    pub config: ApiConfig,
    pub clients: ClientService,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState {
            clients: ClientService::new(db.clone()),
            db,
            config,
        }
    }

    /// Opens the database (running migrations) and seeds regions if asked to.
    pub async fn initialize(config: ApiConfig) -> DbResult<Self> {
        let db = Database::new(config.db_config()).await?;

        if config.seed_regions {
            let seeded = db.regions().seed_defaults().await?;
            if seeded > 0 {
                info!(seeded, "Seeded default regions");
            }
        }

        Ok(AppState::new(db, config))
    }
}

/// Builds the full application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        // Health check at root level
        .merge(routes::health::routes())
        .nest("/api", routes::api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        // No origins configured: permissive
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

//! Region lookup list.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use registry_core::Region;

use crate::dto::ItemsResponse;
use crate::error::ApiResult;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/regions", get(list_regions))
}

/// `GET /api/regions`: every region, sorted by name.
async fn list_regions(State(state): State<Arc<AppState>>) -> ApiResult<Json<ItemsResponse<Region>>> {
    let regions = state.db.regions().list().await?;
    Ok(Json(regions.into()))
}

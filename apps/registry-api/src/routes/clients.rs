//! Client endpoints.
//!
//! Handlers only translate: extract the raw draft, run structural
//! validation, call [`ClientService`](crate::services::ClientService), and
//! pick the success status. Every failure goes out through `ApiError`.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use registry_core::input::{ClientDraft, ClientListParams, ClientPatchDraft};
use registry_core::validation::{
    parse_path_id, validate_client_patch, validate_list_params, validate_new_client,
};
use registry_core::{Client, ClientPage};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route("/clients/parents", get(list_parent_clients))
        .route(
            "/clients/{client_id}",
            get(get_client).patch(update_client).delete(delete_client),
        )
}

fn client_id(path: Result<Path<String>, PathRejection>) -> ApiResult<Uuid> {
    let Path(raw) = path?;
    Ok(parse_path_id(&raw)?)
}

/// `GET /api/clients`
async fn list_clients(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ClientListParams>, QueryRejection>,
) -> ApiResult<Json<ClientPage>> {
    let Query(params) = params?;
    let query = validate_list_params(params)?;
    Ok(Json(state.clients.list(&query).await?))
}

/// `GET /api/clients/parents`: candidates for the parent selector.
async fn list_parent_clients(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ClientListParams>, QueryRejection>,
) -> ApiResult<Json<ClientPage>> {
    let Query(params) = params?;
    let query = validate_list_params(params)?;
    Ok(Json(state.clients.list_parents(&query).await?))
}

/// `GET /api/clients/{client_id}`
async fn get_client(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Client>> {
    let id = client_id(path)?;
    Ok(Json(state.clients.get(id).await?))
}

/// `POST /api/clients`
async fn create_client(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ClientDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    let Json(draft) = body?;
    let new = validate_new_client(draft)?;
    let client = state.clients.create(new).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// `PATCH /api/clients/{client_id}`
async fn update_client(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<ClientPatchDraft>, JsonRejection>,
) -> ApiResult<Json<Client>> {
    let id = client_id(path)?;
    let Json(draft) = body?;
    let patch = validate_client_patch(draft)?;
    Ok(Json(state.clients.update(id, patch).await?))
}

/// `DELETE /api/clients/{client_id}`
async fn delete_client(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = client_id(path)?;
    state.clients.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Router-level tests: every request goes through the full axum stack
//! (extractors, validation, service, SQLite, error formatter) over an
//! in-memory database.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use registry_api::{build_router, ApiConfig, AppState};
use registry_db::{Database, DbConfig, DEFAULT_REGIONS};
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot

// =============================================================================
// Helpers
// =============================================================================

async fn app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    db.regions().seed_defaults().await.unwrap();
    build_router(Arc::new(AppState::new(db, ApiConfig::default())))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create(app: &Router, body: Value) -> (StatusCode, Value) {
    send(app, "POST", "/api/clients", Some(body)).await
}

/// Creates a client that must succeed, returning its id.
async fn create_ok(app: &Router, body: Value) -> String {
    let (status, json) = create(app, body).await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["clientId"].as_str().unwrap().to_string()
}

fn timestamp(value: &Value) -> DateTime<Utc> {
    value.as_str().unwrap().parse().unwrap()
}

fn error_fields(json: &Value) -> Vec<&str> {
    json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect()
}

// =============================================================================
// Create / Get
// =============================================================================

#[tokio::test]
async fn create_then_get_round_trips() {
    let app = app().await;
    let (_, regions) = send(&app, "GET", "/api/regions", None).await;
    let region_id = regions["items"][0]["id"].as_str().unwrap().to_string();

    let (status, created) = create(
        &app,
        json!({
            "name": "Acme",
            "fullName": "Acme Trading LLC",
            "partyType": "legal",
            "inn": "7701234567",
            "regionId": region_id,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["createdAt"], created["updatedAt"]);
    assert!(created["parentId"].is_null());

    let id = created["clientId"].as_str().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/api/clients/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    assert_eq!(fetched["name"], "Acme");
    assert_eq!(fetched["fullName"], "Acme Trading LLC");
    assert_eq!(fetched["partyType"], "legal");
    assert_eq!(fetched["inn"], "7701234567");
    assert_eq!(fetched["regionId"], region_id.as_str());
}

#[tokio::test]
async fn create_accepts_snake_case_tokens() {
    let app = app().await;
    let (status, created) = create(
        &app,
        json!({ "name": "Solo", "party_type": "individual", "full_name": "Ivan Solo" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["partyType"], "individual");
    assert_eq!(created["fullName"], "Ivan Solo");
}

#[tokio::test]
async fn inn_of_thirteen_chars_rejected_twelve_accepted() {
    let app = app().await;

    let (status, json) = create(
        &app,
        json!({ "name": "Long", "partyType": "individual", "inn": "1234567890123" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["errorName"], "VALIDATION_ERROR");
    assert_eq!(error_fields(&json), vec!["body.inn"]);

    let (status, json) = create(
        &app,
        json!({ "name": "Long", "partyType": "individual", "inn": "123456789012" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["inn"], "123456789012");
}

#[tokio::test]
async fn validation_reports_every_bad_field() {
    let app = app().await;
    let (status, json) = create(
        &app,
        json!({ "partyType": "company", "regionId": "not-a-uuid" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["message"], "Validation error");
    let fields = error_fields(&json);
    assert_eq!(fields.len(), 3);
    assert!(fields.contains(&"body.name"));
    assert!(fields.contains(&"body.partyType"));
    assert!(fields.contains(&"body.regionId"));
}

#[tokio::test]
async fn wrong_json_types_are_reported_per_field() {
    let app = app().await;
    let (status, json) = create(
        &app,
        json!({ "name": "x", "partyType": "company", "inn": 1234567890 }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["errorName"], "VALIDATION_ERROR");
    let fields = error_fields(&json);
    assert_eq!(fields.len(), 2);
    assert!(fields.contains(&"body.partyType"));
    assert!(fields.contains(&"body.inn"));

    let id = create_ok(&app, json!({ "name": "Typed", "partyType": "legal" })).await;
    let (status, json) = send(
        &app,
        "PATCH",
        &format!("/api/clients/{id}"),
        Some(json!({ "inn": 5, "regionId": false })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields = error_fields(&json);
    assert_eq!(fields.len(), 2);
    assert!(fields.contains(&"body.inn"));
    assert!(fields.contains(&"body.regionId"));
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/clients")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["errorName"], "VALIDATION_ERROR");
    assert_eq!(error_fields(&json), vec!["body"]);
}

#[tokio::test]
async fn duplicate_inn_conflicts() {
    let app = app().await;
    create_ok(&app, json!({ "name": "X", "partyType": "legal", "inn": "1" })).await;

    let (status, json) = create(&app, json!({ "name": "Y", "partyType": "legal", "inn": "1" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["errorName"], "CLIENT_ALREADY_EXISTS_BY_INN");
    assert_eq!(json["message"], "Client with this INN already exists");
    assert!(json["errors"].is_null());
}

#[tokio::test]
async fn duplicate_name_conflicts() {
    let app = app().await;
    create_ok(&app, json!({ "name": "X", "partyType": "legal" })).await;

    let (status, json) = create(&app, json!({ "name": "X", "partyType": "legal", "inn": "2" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["errorName"], "CLIENT_ALREADY_EXISTS");
    assert!(json["errors"].is_null());
}

#[tokio::test]
async fn clients_without_inn_do_not_conflict() {
    let app = app().await;
    create_ok(&app, json!({ "name": "A", "partyType": "individual" })).await;
    create_ok(&app, json!({ "name": "B", "partyType": "individual", "inn": "" })).await;
    create_ok(&app, json!({ "name": "C", "partyType": "individual", "inn": null })).await;
}

#[tokio::test]
async fn unknown_parent_is_not_found() {
    let app = app().await;
    let (status, json) = create(
        &app,
        json!({
            "name": "Orphan",
            "partyType": "individual",
            "parentId": "550e8400-e29b-41d4-a716-446655440000",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["errorName"], "PARENT_CLIENT_NOT_FOUND");
}

#[tokio::test]
async fn get_with_bad_or_unknown_id() {
    let app = app().await;

    let (status, json) = send(&app, "GET", "/api/clients/42", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_fields(&json), vec!["path.clientId"]);

    let (status, json) = send(
        &app,
        "GET",
        "/api/clients/550e8400-e29b-41d4-a716-446655440000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["errorName"], "CLIENT_NOT_FOUND");
    assert_eq!(json["message"], "Client not found");
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn partial_update_changes_only_supplied_fields() {
    let app = app().await;
    let (_, created) = create(
        &app,
        json!({ "name": "Acme", "fullName": "Acme LLC", "partyType": "legal", "inn": "7700000000" }),
    )
    .await;
    let id = created["clientId"].as_str().unwrap();
    let uri = format!("/api/clients/{id}");

    let (status, updated) = send(&app, "PATCH", &uri, Some(json!({ "fullName": "Acme Group LLC" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["fullName"], "Acme Group LLC");
    assert_eq!(updated["name"], created["name"]);
    assert_eq!(updated["inn"], created["inn"]);
    assert_eq!(updated["partyType"], created["partyType"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert!(timestamp(&updated["updatedAt"]) > timestamp(&created["updatedAt"]));

    // Explicit null clears a nullable field.
    let (status, cleared) = send(&app, "PATCH", &uri, Some(json!({ "inn": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["inn"].is_null());
    assert_eq!(cleared["fullName"], "Acme Group LLC");
    assert!(timestamp(&cleared["updatedAt"]) > timestamp(&updated["updatedAt"]));

    let (_, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(fetched, cleared);
}

#[tokio::test]
async fn update_of_missing_client_is_not_found() {
    let app = app().await;
    let (status, json) = send(
        &app,
        "PATCH",
        "/api/clients/550e8400-e29b-41d4-a716-446655440000",
        Some(json!({ "name": "Whatever" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["errorName"], "CLIENT_NOT_FOUND");
}

#[tokio::test]
async fn update_rejects_null_name_and_foreign_inn() {
    let app = app().await;
    create_ok(&app, json!({ "name": "A", "partyType": "legal", "inn": "1" })).await;
    let b = create_ok(&app, json!({ "name": "B", "partyType": "legal" })).await;
    let uri = format!("/api/clients/{b}");

    let (status, json) = send(&app, "PATCH", &uri, Some(json!({ "name": null }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_fields(&json), vec!["body.name"]);

    let (status, json) = send(&app, "PATCH", &uri, Some(json!({ "inn": "1" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["errorName"], "CLIENT_ALREADY_EXISTS_BY_INN");

    let (status, json) = send(&app, "PATCH", &uri, Some(json!({ "name": "A" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["errorName"], "CLIENT_ALREADY_EXISTS");
}

#[tokio::test]
async fn update_sets_and_checks_parent() {
    let app = app().await;
    let parent = create_ok(&app, json!({ "name": "Parent", "partyType": "legal" })).await;
    let child = create_ok(&app, json!({ "name": "Child", "partyType": "individual" })).await;
    let uri = format!("/api/clients/{child}");

    let (status, json) = send(
        &app,
        "PATCH",
        &uri,
        Some(json!({ "parentId": "550e8400-e29b-41d4-a716-446655440000" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["errorName"], "PARENT_CLIENT_NOT_FOUND");

    let (status, json) = send(&app, "PATCH", &uri, Some(json!({ "parentId": parent }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["parentId"], parent.as_str());
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = app().await;
    let id = create_ok(&app, json!({ "name": "Gone", "partyType": "legal" })).await;
    let uri = format!("/api/clients/{id}");

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, json) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["errorName"], "CLIENT_NOT_FOUND");

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn list_limit_one_reports_full_total() {
    let app = app().await;
    for name in ["A", "B", "C"] {
        create_ok(&app, json!({ "name": name, "partyType": "legal" })).await;
    }

    let (status, json) = send(&app, "GET", "/api/clients?limit=1&offset=0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
    assert_eq!(json["total"], 3);
}

#[tokio::test]
async fn list_sorts_and_filters() {
    let app = app().await;
    create_ok(&app, json!({ "name": "b", "fullName": "Beta Holdings", "partyType": "legal" })).await;
    create_ok(&app, json!({ "name": "a", "partyType": "individual", "inn": "500100732259" })).await;
    create_ok(&app, json!({ "name": "c", "partyType": "individual" })).await;

    let names = |json: &Value| -> Vec<String> {
        json["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap().to_string())
            .collect()
    };

    let (_, json) = send(&app, "GET", "/api/clients?sortBy=name&sortOrder=asc", None).await;
    assert_eq!(names(&json), vec!["a", "b", "c"]);

    // Default: newest first.
    let (_, json) = send(&app, "GET", "/api/clients", None).await;
    assert_eq!(names(&json), vec!["c", "a", "b"]);

    let (_, json) = send(&app, "GET", "/api/clients?partyType=individual&sort_by=created_at&sort_order=asc", None).await;
    assert_eq!(names(&json), vec!["a", "c"]);

    let (_, json) = send(&app, "GET", "/api/clients?query=HOLDINGS", None).await;
    assert_eq!(names(&json), vec!["b"]);
    assert_eq!(json["total"], 1);

    let (_, json) = send(&app, "GET", "/api/clients?query=0073", None).await;
    assert_eq!(names(&json), vec!["a"]);

    // The search term is matched as sent, spaces included.
    let (_, json) = send(&app, "GET", "/api/clients?query=%20holdings", None).await;
    assert_eq!(names(&json), vec!["b"]);
    let (_, json) = send(&app, "GET", "/api/clients?query=holdings%20", None).await;
    assert_eq!(json["total"], 0);

    let (_, json) = send(&app, "GET", "/api/clients?query=", None).await;
    assert_eq!(json["total"], 3);
}

#[tokio::test]
async fn list_rejects_bad_parameters() {
    let app = app().await;

    let (status, json) = send(&app, "GET", "/api/clients?limit=0", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_fields(&json), vec!["query.limit"]);

    let (status, _) = send(&app, "GET", "/api/clients?limit=101", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, json) = send(&app, "GET", "/api/clients?offset=5000000000", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["items"].as_array().unwrap().len(), 0);

    let (status, json) = send(&app, "GET", "/api/clients?sortBy=Name&offset=-1", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields = error_fields(&json);
    assert!(fields.contains(&"query.sortBy"));
    assert!(fields.contains(&"query.offset"));
}

#[tokio::test]
async fn parents_lists_only_root_clients() {
    let app = app().await;
    let parent = create_ok(&app, json!({ "name": "Holding", "partyType": "legal" })).await;
    create_ok(
        &app,
        json!({ "name": "Branch", "partyType": "legal", "parentId": parent }),
    )
    .await;

    let (_, json) = send(&app, "GET", &format!("/api/clients?parentId={parent}"), None).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["items"][0]["name"], "Branch");

    let (status, json) = send(&app, "GET", "/api/clients/parents", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 1);
    assert_eq!(json["items"][0]["name"], "Holding");
}

// =============================================================================
// Regions / Health
// =============================================================================

#[tokio::test]
async fn regions_are_sorted_by_name() {
    let app = app().await;
    let (status, json) = send(&app, "GET", "/api/regions", None).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = json["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), DEFAULT_REGIONS.len());

    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app().await;
    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn health_reports_unavailable_after_close() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let app = build_router(Arc::new(AppState::new(db.clone(), ApiConfig::default())));
    db.close().await;

    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], "unavailable");
}

//! # Validation Module
//!
//! Structural validation of inbound requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  └── Malformed JSON only; body fields are kept as raw JSON values      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - field constraints                              │
//! │  ├── JSON types, lengths, identifiers, enum tokens, numeric ranges     │
//! │  └── ALL violations collected into one ValidationErrors                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Business rules (registry-api service)                        │
//! │  ├── name / INN uniqueness                                             │
//! │  └── parent existence                                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Database (SQLite)                                            │
//! │  └── UNIQUE indexes as the backstop for racing writers                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use registry_core::input::ClientDraft;
//! use registry_core::validation::validate_new_client;
//!
//! let draft = ClientDraft {
//!     name: Some("Acme".into()),
//!     party_type: Some("legal".into()),
//!     inn: Some(1234567890.into()),
//!     ..Default::default()
//! };
//! let errors = validate_new_client(draft).unwrap_err();
//! assert!(errors.has("body.inn"));
//! ```

use serde_json::Value;
use uuid::Uuid;

use crate::codec::WireEnum;
use crate::error::{ValidationError, ValidationErrors};
use crate::input::{ClientDraft, ClientListParams, ClientPatchDraft};
use crate::types::{
    ClientFilter, ClientListQuery, ClientPatch, ClientSort, ClientSortBy, NewClient, Pagination,
    PartyType, SortOrder,
};
use crate::{DEFAULT_PAGE_LIMIT, MAX_FULL_NAME_LEN, MAX_INN_LEN, MAX_NAME_LEN, MAX_PAGE_LIMIT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

fn check_max_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    // Characters, not bytes: Cyrillic names are two bytes per letter.
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Validates a client's short name (at most 255 characters).
pub fn validate_name(name: &str) -> ValidationResult<()> {
    check_max_len("name", name, MAX_NAME_LEN)
}

/// Validates a client's full name (at most 512 characters).
pub fn validate_full_name(full_name: &str) -> ValidationResult<()> {
    check_max_len("fullName", full_name, MAX_FULL_NAME_LEN)
}

/// Validates a tax identifier.
///
/// ## Rules
/// - At most 12 characters
/// - No digit or checksum rule
/// - Blank input means "no INN"
///
/// ## Example
/// ```rust
/// use registry_core::validation::normalize_inn;
///
/// assert_eq!(normalize_inn("770000000000").unwrap().as_deref(), Some("770000000000"));
/// assert!(normalize_inn("7700000000001").is_err());
/// assert_eq!(normalize_inn("  ").unwrap(), None);
/// ```
pub fn normalize_inn(inn: &str) -> ValidationResult<Option<String>> {
    if inn.trim().is_empty() {
        return Ok(None);
    }
    check_max_len("inn", inn, MAX_INN_LEN)?;
    Ok(Some(inn.to_string()))
}

/// Parses an identifier token.
///
/// ## Example
/// ```rust
/// use registry_core::validation::parse_identifier;
///
/// assert!(parse_identifier("parentId", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(parse_identifier("parentId", "not-a-uuid").is_err());
/// ```
pub fn parse_identifier(field: &str, raw: &str) -> ValidationResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })
}

/// Decodes a wire enum token for `field`.
pub fn parse_enum<E: WireEnum>(field: &str, raw: &str) -> ValidationResult<E> {
    E::decode(raw).map_err(|source| ValidationError::InvalidEnumValue {
        field: field.to_string(),
        source,
    })
}

fn parse_integer(field: &str, raw: &str) -> ValidationResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be an integer".to_string(),
        })
}

/// Validates a page size: an integer in `1..=100`.
pub fn parse_limit(raw: &str) -> ValidationResult<u32> {
    let value = parse_integer("limit", raw)?;
    let max = i64::from(MAX_PAGE_LIMIT);
    if !(1..=max).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max,
        });
    }
    Ok(value as u32)
}

/// Validates a page offset: a non-negative integer.
pub fn parse_offset(raw: &str) -> ValidationResult<i64> {
    let value = parse_integer("offset", raw)?;
    if value < 0 {
        return Err(ValidationError::TooSmall {
            field: "offset".to_string(),
            min: 0,
        });
    }
    Ok(value)
}

// =============================================================================
// Request Validators
// =============================================================================

fn body(field: &str) -> String {
    format!("body.{field}")
}

fn query(field: &str) -> String {
    format!("query.{field}")
}

/// Validates the `{clientId}` path segment.
pub fn parse_path_id(raw: &str) -> Result<Uuid, ValidationErrors> {
    parse_identifier("clientId", raw)
        .map_err(|error| ValidationErrors::single("path.clientId", error))
}

// Body values arrive as raw JSON; each of these checks the JSON type first.

fn text(field: &str, value: Value) -> ValidationResult<String> {
    match value {
        Value::String(text) => Ok(text),
        _ => Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a string".to_string(),
        }),
    }
}

fn name_value(value: Value) -> ValidationResult<String> {
    let name = text("name", value)?;
    validate_name(&name)?;
    Ok(name)
}

fn full_name_value(value: Value) -> ValidationResult<String> {
    let full_name = text("fullName", value)?;
    validate_full_name(&full_name)?;
    Ok(full_name)
}

fn party_type_value(value: Value) -> ValidationResult<PartyType> {
    parse_enum("partyType", &text("partyType", value)?)
}

fn inn_value(value: Value) -> ValidationResult<Option<String>> {
    normalize_inn(&text("inn", value)?)
}

fn identifier_value(field: &str, value: Value) -> ValidationResult<Uuid> {
    parse_identifier(field, &text(field, value)?)
}

/// Validates a create body. Reports every violated field, not just the first.
pub fn validate_new_client(draft: ClientDraft) -> Result<NewClient, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = match draft.name {
        Some(value) => errors.check(&body("name"), name_value(value)),
        None => {
            errors.push(body("name"), required("name"));
            None
        }
    };

    let full_name = draft
        .full_name
        .and_then(|value| errors.check(&body("fullName"), full_name_value(value)));

    let party_type = match draft.party_type {
        Some(value) => errors.check(&body("partyType"), party_type_value(value)),
        None => {
            errors.push(body("partyType"), required("partyType"));
            None
        }
    };

    let inn = draft
        .inn
        .and_then(|value| errors.check(&body("inn"), inn_value(value)))
        .flatten();

    let region_id = draft
        .region_id
        .and_then(|value| errors.check(&body("regionId"), identifier_value("regionId", value)));

    let parent_id = draft
        .parent_id
        .and_then(|value| errors.check(&body("parentId"), identifier_value("parentId", value)));

    let (Some(name), Some(party_type)) = (name, party_type) else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewClient {
        name,
        full_name,
        party_type,
        inn,
        region_id,
        parent_id,
    })
}

/// Validates a partial-update body.
///
/// `name` and `partyType` cannot be cleared; the other fields can.
pub fn validate_client_patch(draft: ClientPatchDraft) -> Result<ClientPatch, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut patch = ClientPatch::default();

    match draft.name {
        Some(Some(value)) => patch.name = errors.check(&body("name"), name_value(value)),
        Some(None) => errors.push(body("name"), not_nullable("name")),
        None => {}
    }

    match draft.full_name {
        Some(Some(value)) => {
            patch.full_name = errors
                .check(&body("fullName"), full_name_value(value))
                .map(Some);
        }
        Some(None) => patch.full_name = Some(None),
        None => {}
    }

    match draft.party_type {
        Some(Some(value)) => {
            patch.party_type = errors.check(&body("partyType"), party_type_value(value));
        }
        Some(None) => errors.push(body("partyType"), not_nullable("partyType")),
        None => {}
    }

    match draft.inn {
        Some(Some(value)) => patch.inn = errors.check(&body("inn"), inn_value(value)),
        Some(None) => patch.inn = Some(None),
        None => {}
    }

    match draft.region_id {
        Some(Some(value)) => {
            patch.region_id = errors
                .check(&body("regionId"), identifier_value("regionId", value))
                .map(Some);
        }
        Some(None) => patch.region_id = Some(None),
        None => {}
    }

    match draft.parent_id {
        Some(Some(value)) => {
            patch.parent_id = errors
                .check(&body("parentId"), identifier_value("parentId", value))
                .map(Some);
        }
        Some(None) => patch.parent_id = Some(None),
        None => {}
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(patch)
}

/// Validates list query parameters, filling in defaults for absent ones.
pub fn validate_list_params(params: ClientListParams) -> Result<ClientListQuery, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    // Matched verbatim, surrounding spaces included.
    let search = params.query.filter(|q| !q.is_empty());

    let parent_id = params
        .parent_id
        .and_then(|raw| errors.check(&query("parentId"), parse_identifier("parentId", &raw)));

    let region_id = params
        .region_id
        .and_then(|raw| errors.check(&query("regionId"), parse_identifier("regionId", &raw)));

    let party_type = params.party_type.and_then(|raw| {
        errors.check(&query("partyType"), parse_enum::<PartyType>("partyType", &raw))
    });

    let limit = match params.limit {
        Some(raw) => errors.check(&query("limit"), parse_limit(&raw)),
        None => Some(DEFAULT_PAGE_LIMIT),
    };

    let offset = match params.offset {
        Some(raw) => errors.check(&query("offset"), parse_offset(&raw)),
        None => Some(0),
    };

    let sort_by = match params.sort_by {
        Some(raw) => errors.check(&query("sortBy"), parse_enum::<ClientSortBy>("sortBy", &raw)),
        None => Some(ClientSortBy::default()),
    };

    let sort_order = match params.sort_order {
        Some(raw) => errors.check(&query("sortOrder"), parse_enum::<SortOrder>("sortOrder", &raw)),
        None => Some(SortOrder::default()),
    };

    let (Some(limit), Some(offset), Some(by), Some(order)) = (limit, offset, sort_by, sort_order)
    else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ClientListQuery {
        filter: ClientFilter {
            query: search,
            parent_id,
            region_id,
            party_type,
            root_only: false,
        },
        sort: ClientSort { by, order },
        page: Pagination { limit, offset },
    })
}

fn required(field: &str) -> ValidationError {
    ValidationError::Required {
        field: field.to_string(),
    }
}

fn not_nullable(field: &str) -> ValidationError {
    ValidationError::NotNullable {
        field: field.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn legal_draft(name: &str) -> ClientDraft {
        ClientDraft {
            name: Some(json!(name)),
            party_type: Some(json!("legal")),
            ..Default::default()
        }
    }

    #[test]
    fn test_inn_length_boundary() {
        assert!(normalize_inn(&"1".repeat(12)).is_ok());
        assert!(matches!(
            normalize_inn(&"1".repeat(13)),
            Err(ValidationError::TooLong { max: 12, .. })
        ));
        // Letters are fine, only the length is checked.
        assert!(normalize_inn("AB-12").is_ok());
    }

    #[test]
    fn test_lengths_count_characters() {
        assert!(validate_name(&"Я".repeat(255)).is_ok());
        assert!(validate_name(&"Я".repeat(256)).is_err());
        assert!(validate_full_name(&"x".repeat(512)).is_ok());
        assert!(validate_full_name(&"x".repeat(513)).is_err());
    }

    #[test]
    fn test_limit_and_offset() {
        assert_eq!(parse_limit("1").unwrap(), 1);
        assert_eq!(parse_limit("100").unwrap(), 100);
        assert!(parse_limit("0").is_err());
        assert!(parse_limit("101").is_err());
        assert!(parse_limit("ten").is_err());

        assert_eq!(parse_offset("0").unwrap(), 0);
        assert_eq!(parse_offset("5000000000").unwrap(), 5_000_000_000);
        assert!(matches!(
            parse_offset("-1"),
            Err(ValidationError::TooSmall { min: 0, .. })
        ));
    }

    #[test]
    fn test_new_client_minimal() {
        let client = validate_new_client(legal_draft("Acme")).unwrap();
        assert_eq!(client.name, "Acme");
        assert_eq!(client.party_type, PartyType::Legal);
        assert_eq!(client.inn, None);
        assert_eq!(client.parent_id, None);
    }

    #[test]
    fn test_new_client_reports_every_field() {
        let draft = ClientDraft {
            name: None,
            full_name: Some(json!("x".repeat(600))),
            party_type: Some(json!("Company")),
            inn: Some(json!("1234567890123")),
            region_id: Some(json!("nope")),
            parent_id: Some(json!("also-nope")),
        };
        let errors = validate_new_client(draft).unwrap_err();

        assert_eq!(errors.len(), 6);
        for location in [
            "body.name",
            "body.fullName",
            "body.partyType",
            "body.inn",
            "body.regionId",
            "body.parentId",
        ] {
            assert!(errors.has(location), "missing {location}");
        }
    }

    #[test]
    fn test_new_client_wrong_json_types_reported_per_field() {
        let draft = ClientDraft {
            name: Some(json!("x")),
            party_type: Some(json!("company")),
            inn: Some(json!(1234567890)),
            region_id: Some(json!(true)),
            ..Default::default()
        };
        let errors = validate_new_client(draft).unwrap_err();

        assert_eq!(errors.len(), 3);
        assert!(errors.has("body.partyType"));
        assert!(errors.has("body.regionId"));
        let inn = errors.iter().find(|e| e.location == "body.inn").unwrap();
        assert_eq!(inn.message(), "inn has invalid format: must be a string");
    }

    #[test]
    fn test_new_client_blank_inn_is_null() {
        let mut draft = legal_draft("Acme");
        draft.inn = Some(json!(""));
        assert_eq!(validate_new_client(draft).unwrap().inn, None);
    }

    #[test]
    fn test_patch_null_handling() {
        let draft = ClientPatchDraft {
            inn: Some(None),
            parent_id: Some(None),
            ..Default::default()
        };
        let patch = validate_client_patch(draft).unwrap();
        assert_eq!(patch.inn, Some(None));
        assert_eq!(patch.parent_id, Some(None));
        assert_eq!(patch.name, None);

        let draft = ClientPatchDraft {
            name: Some(None),
            party_type: Some(None),
            ..Default::default()
        };
        let errors = validate_client_patch(draft).unwrap_err();
        assert!(errors.has("body.name"));
        assert!(errors.has("body.partyType"));
    }

    #[test]
    fn test_patch_rejects_long_inn() {
        let draft = ClientPatchDraft {
            inn: Some(Some(json!("1234567890123"))),
            ..Default::default()
        };
        assert!(validate_client_patch(draft).unwrap_err().has("body.inn"));
    }

    #[test]
    fn test_patch_rejects_non_string_values() {
        let draft = ClientPatchDraft {
            name: Some(Some(json!(42))),
            parent_id: Some(Some(json!({ "id": "x" }))),
            full_name: Some(Some(json!("Acme LLC"))),
            ..Default::default()
        };
        let errors = validate_client_patch(draft).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.has("body.name"));
        assert!(errors.has("body.parentId"));
    }

    #[test]
    fn test_list_params_defaults() {
        let query = validate_list_params(ClientListParams::default()).unwrap();
        assert_eq!(query, ClientListQuery::default());
    }

    #[test]
    fn test_list_params_empty_query_is_no_filter() {
        let params = ClientListParams {
            query: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(validate_list_params(params).unwrap().filter.query, None);
    }

    #[test]
    fn test_list_params_parsing() {
        let params = ClientListParams {
            query: Some("  acme ".to_string()),
            party_type: Some("individual".to_string()),
            limit: Some("5".to_string()),
            offset: Some("10".to_string()),
            sort_by: Some("fullName".to_string()),
            sort_order: Some("asc".to_string()),
            ..Default::default()
        };
        let query = validate_list_params(params).unwrap();
        assert_eq!(query.filter.query.as_deref(), Some("  acme "));
        assert_eq!(query.filter.party_type, Some(PartyType::Individual));
        assert_eq!(query.page, Pagination { limit: 5, offset: 10 });
        assert_eq!(query.sort.by, ClientSortBy::FullName);
        assert_eq!(query.sort.order, SortOrder::Asc);
    }

    #[test]
    fn test_list_params_errors() {
        let params = ClientListParams {
            limit: Some("0".to_string()),
            sort_by: Some("colour".to_string()),
            parent_id: Some("x".to_string()),
            ..Default::default()
        };
        let errors = validate_list_params(params).unwrap_err();
        assert!(errors.has("query.limit"));
        assert!(errors.has("query.sortBy"));
        assert!(errors.has("query.parentId"));
    }

    #[test]
    fn test_path_id() {
        assert!(parse_path_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(parse_path_id("42").unwrap_err().has("path.clientId"));
    }
}

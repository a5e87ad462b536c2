//! # Request Drafts
//!
//! Raw, unvalidated request payloads exactly as they come off the wire.
//!
//! Body fields are held as raw JSON values so that deserialization only
//! fails on malformed JSON; wrong types, lengths and tokens are all found by
//! [`crate::validation`], which can then report every bad field at once.
//! Query parameters arrive as text and stay strings.
//!
//! Keys are camelCase on the wire; snake_case keys are accepted as aliases.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Body of a create request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDraft {
    pub name: Option<Value>,
    #[serde(alias = "full_name")]
    pub full_name: Option<Value>,
    #[serde(alias = "party_type")]
    pub party_type: Option<Value>,
    pub inn: Option<Value>,
    #[serde(alias = "region_id")]
    pub region_id: Option<Value>,
    #[serde(alias = "parent_id")]
    pub parent_id: Option<Value>,
}

/// Body of a partial update.
///
/// Outer `None`: key absent. `Some(None)`: key present with `null`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatchDraft {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<Value>>,
    #[serde(default, alias = "full_name", deserialize_with = "present")]
    pub full_name: Option<Option<Value>>,
    #[serde(default, alias = "party_type", deserialize_with = "present")]
    pub party_type: Option<Option<Value>>,
    #[serde(default, deserialize_with = "present")]
    pub inn: Option<Option<Value>>,
    #[serde(default, alias = "region_id", deserialize_with = "present")]
    pub region_id: Option<Option<Value>>,
    #[serde(default, alias = "parent_id", deserialize_with = "present")]
    pub parent_id: Option<Option<Value>>,
}

/// Query string of the list operations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientListParams {
    pub query: Option<String>,
    #[serde(alias = "parent_id")]
    pub parent_id: Option<String>,
    #[serde(alias = "region_id")]
    pub region_id: Option<String>,
    #[serde(alias = "party_type")]
    pub party_type: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
    #[serde(alias = "sort_by")]
    pub sort_by: Option<String>,
    #[serde(alias = "sort_order")]
    pub sort_order: Option<String>,
}

/// Only called when the key is present, so wrap whatever was there
/// (including `null`) in `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

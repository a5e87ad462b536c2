//! # Domain Types
//!
//! Core domain types used throughout the registry.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Client      │   │     Region      │   │   PartyType     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  client_id      │   │  id (UUID)      │   │  Individual     │       │
//! │  │  name (unique)  │   │  name           │   │  Legal          │       │
//! │  │  inn (unique?)  │   └─────────────────┘   └─────────────────┘       │
//! │  │  region_id ─────┼──► Region (soft reference)                        │
//! │  │  parent_id ─────┼──► Client (checked on write only)                 │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  Listing: ClientListQuery = ClientFilter + ClientSort + Pagination      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::codec::wire_enum;
use crate::DEFAULT_PAGE_LIMIT;

// =============================================================================
// Wire Enums
// =============================================================================

wire_enum! {
    /// Whether a client is a natural person or a legal entity.
    #[derive(TS)]
    #[ts(export, rename_all = "camelCase")]
    #[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
    #[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
    pub enum PartyType {
        /// Natural person.
        Individual => ("individual", "individual"),
        /// Company or other legal entity.
        Legal => ("legal", "legal"),
    }
}

wire_enum! {
    /// Direction of a sorted listing.
    #[derive(TS)]
    #[ts(export, rename_all = "camelCase")]
    pub enum SortOrder {
        Asc => ("asc", "asc"),
        Desc => ("desc", "desc"),
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Desc
    }
}

wire_enum! {
    /// Client field a listing can be ordered by.
    ///
    /// The canonical token of each variant is also its column name.
    #[derive(TS)]
    #[ts(export, rename_all = "camelCase")]
    pub enum ClientSortBy {
        CreatedAt => ("created_at", "createdAt"),
        UpdatedAt => ("updated_at", "updatedAt"),
        ClientId => ("client_id", "clientId"),
        Name => ("name", "name"),
        FullName => ("full_name", "fullName"),
        PartyType => ("party_type", "partyType"),
        Inn => ("inn", "inn"),
        RegionId => ("region_id", "regionId"),
        ParentId => ("parent_id", "parentId"),
    }
}

impl ClientSortBy {
    /// Column in the `clients` table this field is stored in.
    #[inline]
    pub fn column(self) -> &'static str {
        crate::codec::WireEnum::canonical(self)
    }
}

impl Default for ClientSortBy {
    fn default() -> Self {
        ClientSortBy::CreatedAt
    }
}

// =============================================================================
// Client
// =============================================================================

/// A registry entry: an individual or a legal entity.
///
/// Serializes in the wire shape (camelCase keys).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Client {
    /// Server-generated identifier, immutable.
    #[ts(as = "String")]
    pub client_id: Uuid,

    /// Short name, unique across the registry.
    pub name: String,

    /// Full legal name.
    pub full_name: Option<String>,

    pub party_type: PartyType,

    /// Tax identifier, unique among clients that have one.
    pub inn: Option<String>,

    #[ts(as = "Option<String>")]
    pub region_id: Option<Uuid>,

    /// Parent client. May dangle if the parent was deleted afterwards.
    #[ts(as = "Option<String>")]
    pub parent_id: Option<Uuid>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Region
// =============================================================================

/// Lookup entry for the region selector. Read-only for this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Region {
    #[ts(as = "String")]
    pub id: Uuid,
    pub name: String,
}

// =============================================================================
// Mutations
// =============================================================================

/// Validated fields for a new client.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClient {
    pub name: String,
    pub full_name: Option<String>,
    pub party_type: PartyType,
    pub inn: Option<String>,
    pub region_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
}

/// Validated partial update.
///
/// The outer `Option` means "field supplied"; for nullable fields the inner
/// `Option` carries the new value, `None` clearing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub full_name: Option<Option<String>>,
    pub party_type: Option<PartyType>,
    pub inn: Option<Option<String>>,
    pub region_id: Option<Option<Uuid>>,
    pub parent_id: Option<Option<Uuid>>,
}

impl ClientPatch {
    /// The INN being set, if the patch sets one (clearing does not count).
    pub fn new_inn(&self) -> Option<&str> {
        self.inn.as_ref().and_then(|inn| inn.as_deref())
    }

    /// The parent being set, if the patch sets one.
    pub fn new_parent_id(&self) -> Option<Uuid> {
        self.parent_id.flatten()
    }

    /// Copies every supplied field onto `client`. Timestamps are untouched.
    pub fn apply_to(&self, client: &mut Client) {
        if let Some(name) = &self.name {
            client.name = name.clone();
        }
        if let Some(full_name) = &self.full_name {
            client.full_name = full_name.clone();
        }
        if let Some(party_type) = self.party_type {
            client.party_type = party_type;
        }
        if let Some(inn) = &self.inn {
            client.inn = inn.clone();
        }
        if let Some(region_id) = self.region_id {
            client.region_id = region_id;
        }
        if let Some(parent_id) = self.parent_id {
            client.parent_id = parent_id;
        }
    }
}

// =============================================================================
// Listing
// =============================================================================

/// Row filter for client listings. Every set criterion must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientFilter {
    /// Substring of name, full name or INN.
    pub query: Option<String>,
    pub parent_id: Option<Uuid>,
    pub region_id: Option<Uuid>,
    pub party_type: Option<PartyType>,
    /// Only clients without a parent.
    pub root_only: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientSort {
    pub by: ClientSortBy,
    pub order: SortOrder,
}

/// Offset/limit window, applied after filtering and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u32,
    pub offset: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientListQuery {
    pub filter: ClientFilter,
    pub sort: ClientSort,
    pub page: Pagination,
}

/// One page of clients plus the filtered count before paging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClientPage {
    pub items: Vec<Client>,
    #[ts(as = "i32")]
    pub total: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

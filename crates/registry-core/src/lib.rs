//! # registry-core: Pure Domain Logic for the Client Registry
//!
//! This crate holds the domain model of the registry: clients, regions, the
//! wire enums and the structural validation that runs before any request is
//! allowed near the database. Nothing in here performs I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Client Registry Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP (registry-api)                          │   │
//! │  │    handlers ──► business rules ──► error formatter             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ registry-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   codec   │  │   types   │  │   input   │  │ validation│  │   │
//! │  │   │ WireEnum  │  │  Client   │  │  drafts   │  │  fields   │  │   │
//! │  │   │           │  │  Region   │  │ (raw req) │  │  limits   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  registry-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`codec`] - Canonical ↔ wire token mapping for fixed-value fields
//! - [`types`] - Domain types (Client, Region, list parameters, patches)
//! - [`input`] - Raw request drafts as they arrive from the wire
//! - [`validation`] - Field validation producing typed domain inputs
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use registry_core::codec::WireEnum;
//! use registry_core::PartyType;
//!
//! assert_eq!(PartyType::decode("legal").unwrap(), PartyType::Legal);
//! assert_eq!(PartyType::Individual.encode(), "individual");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod codec;
pub mod error;
pub mod input;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use codec::{InvalidEnumValue, WireEnum};
pub use error::{CoreError, CoreResult, ErrorKind, FieldError, ValidationError, ValidationErrors};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a client's short name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length of a client's full legal name, in characters.
pub const MAX_FULL_NAME_LEN: usize = 512;

/// Maximum length of a tax identifier (INN), in characters.
///
/// Russian INNs are 10 digits for organizations and 12 for individuals;
/// only the upper bound is enforced.
pub const MAX_INN_LEN: usize = 12;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Largest page a caller may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

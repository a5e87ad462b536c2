//! # Repository Module
//!
//! Database repository implementations for the registry.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Service (registry-api)                                                │
//! │       │                                                                 │
//! │       │  db.clients().find_by_inn("7700000000", None)                  │
//! │       ▼                                                                 │
//! │  ClientRepository                                                      │
//! │  ├── list(&self, query)                                                │
//! │  ├── get_by_id / exists                                                │
//! │  ├── find_by_name / find_by_inn                                        │
//! │  └── insert / update / delete                                          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ClientRepository`](client::ClientRepository) - Client CRUD, listing, uniqueness lookups
//! - [`RegionRepository`](region::RegionRepository) - Region lookup list and seeding

pub mod client;
pub mod region;

//! Service layer: business rules between the handlers and the repositories.

pub mod client_service;

pub use client_service::ClientService;

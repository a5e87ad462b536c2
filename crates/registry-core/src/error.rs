//! # Error Types
//!
//! Domain-specific error types for registry-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  registry-core errors (this file)                                      │
//! │  ├── CoreError         - Business rule failures                        │
//! │  ├── ValidationErrors  - Every rejected field of one request           │
//! │  └── ValidationError   - One rejected field                            │
//! │                                                                         │
//! │  registry-db errors (separate crate)                                   │
//! │  └── DbError           - Database operation failures                   │
//! │                                                                         │
//! │  HTTP errors (in app)                                                  │
//! │  └── ApiError          - What the client sees (serialized)             │
//! │                                                                         │
//! │  Flow: ValidationError → ValidationErrors → CoreError → ApiError       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::codec::InvalidEnumValue;

// =============================================================================
// Core Error
// =============================================================================

/// Broad category of a [`CoreError`], used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-constraint input.
    Validation,
    /// A referenced entity does not exist.
    NotFound,
    /// A uniqueness rule would be violated.
    Conflict,
}

/// Business rule failures and validation failures.
///
/// Raised the moment a rule is found to be violated; nothing is written
/// before the first failing check.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No client with the requested id.
    #[error("Client not found")]
    ClientNotFound,

    /// The `parentId` of a create or update does not resolve.
    #[error("Parent client not found")]
    ParentClientNotFound,

    /// Another client already uses this name.
    #[error("Client already exists")]
    ClientAlreadyExists,

    /// Another client already uses this INN.
    #[error("Client with this INN already exists")]
    ClientAlreadyExistsByInn,

    /// Structural validation failed (wraps every rejected field).
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

impl CoreError {
    /// Machine-readable name sent as `errorName`.
    pub fn error_name(&self) -> &'static str {
        match self {
            CoreError::ClientNotFound => "CLIENT_NOT_FOUND",
            CoreError::ParentClientNotFound => "PARENT_CLIENT_NOT_FOUND",
            CoreError::ClientAlreadyExists => "CLIENT_ALREADY_EXISTS",
            CoreError::ClientAlreadyExistsByInn => "CLIENT_ALREADY_EXISTS_BY_INN",
            CoreError::Validation(_) => "VALIDATION_ERROR",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::ClientNotFound | CoreError::ParentClientNotFound => ErrorKind::NotFound,
            CoreError::ClientAlreadyExists | CoreError::ClientAlreadyExistsByInn => {
                ErrorKind::Conflict
            }
            CoreError::Validation(_) => ErrorKind::Validation,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single rejected input field.
///
/// `field` is the wire name of the field (e.g. `inn`, `fullName`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing.
    #[error("{field} is required")]
    Required { field: String },

    /// A non-nullable field was explicitly set to null.
    #[error("{field} must not be null")]
    NotNullable { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be at least {min}")]
    TooSmall { field: String, min: i64 },

    /// Invalid format (e.g., invalid UUID, not an integer).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Token is not a member of the field's enum.
    #[error("{field}: {source}")]
    InvalidEnumValue {
        field: String,
        source: InvalidEnumValue,
    },
}

/// One entry of a validation failure: where and what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted location, e.g. `body.inn` or `query.limit`.
    pub location: String,
    pub error: ValidationError,
}

impl FieldError {
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

/// Every field rejected while validating one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("Validation error ({} field(s) rejected)", .errors.len())]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A failure with exactly one entry.
    pub fn single(location: impl Into<String>, error: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.push(location, error);
        errors
    }

    pub fn push(&mut self, location: impl Into<String>, error: ValidationError) {
        self.errors.push(FieldError {
            location: location.into(),
            error,
        });
    }

    /// Records the error of `result`, if any, and hands back the value.
    pub fn check<T>(&mut self, location: &str, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.push(location, error);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// True when some entry points at `location`.
    pub fn has(&self, location: &str) -> bool {
        self.errors.iter().any(|e| e.location == location)
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

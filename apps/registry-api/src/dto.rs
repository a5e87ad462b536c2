//! Response bodies that are not domain records.

use serde::{Deserialize, Serialize};

/// `{items: [...]}` wrapper for unpaged lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemsResponse<T> {
    pub items: Vec<T>,
}

impl<T> From<Vec<T>> for ItemsResponse<T> {
    fn from(items: Vec<T>) -> Self {
        ItemsResponse { items }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `unavailable`
    pub status: String,
}

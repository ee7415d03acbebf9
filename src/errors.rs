// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for inventory operations

use thiserror::Error;

use crate::dal::StoreError;
use crate::validation::ValidationError;

/// Errors that can occur while handling an inventory request
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Request or entity failed validation; nothing was persisted
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Row store error, propagated as-is
    #[error("Row store error: {0}")]
    Store(#[from] StoreError),

    /// Referenced resource does not exist
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl InventoryError {
    /// Whether the caller sent a request that must be rejected
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            InventoryError::Validation(_) | InventoryError::Serialization(_)
        )
    }
}

/// Result type for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;

impl From<serde_json::Error> for InventoryError {
    fn from(err: serde_json::Error) -> Self {
        InventoryError::Serialization(err.to_string())
    }
}

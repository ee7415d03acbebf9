// Copyright (c) 2025 - Cowboy AI, Inc.
//! Row Store Abstraction
//!
//! The persistence seam. A row store receives a table name, the table's column
//! schema and typed values, and runs insert/update/select/delete against its
//! backend. Connection pooling, transactions, timeouts and retries are the
//! implementation's concern; the core only propagates its errors.
//!
//! ```text
//! Request → validate → Table rows → insert_validate/update_validate → RowStore
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::query::{BasePage, Expression, PageError};
use crate::schema::{SchemaError, TableSchema};

use super::table::{Row, TableName};

/// Row store errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// Column unknown to the table or value of the wrong type
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Filter references a bad field or uses an unsupported comparison
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Page window rejected
    #[error("invalid page: {0}")]
    InvalidPage(#[from] PageError),

    /// Stored value cannot be turned back into an entity
    #[error("failed to decode column {column}: {reason}")]
    Decode { column: String, reason: String },

    /// Backend failure
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn decode(column: &str, reason: &str) -> Self {
        StoreError::Decode {
            column: column.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Store result type
pub type StoreResult<T> = Result<T, StoreError>;

/// Rows returned by a list call
///
/// For a count page `count` is set and `rows` is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListRows {
    pub count: Option<u64>,
    pub rows: Vec<Row>,
}

/// Row store trait for persisting validated entities
///
/// Implementations must:
/// - generate `id` on insert and return the ids in input order
/// - own the audit timestamps `created_at`/`updated_at`
/// - reject columns that are not part of the given schema
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Insert rows, returning their generated ids
    async fn insert(
        &self,
        table: TableName,
        schema: &TableSchema,
        rows: Vec<Row>,
    ) -> StoreResult<Vec<String>>;

    /// Set `values` on every row matching `filter`, returning the affected count
    async fn update(
        &self,
        table: TableName,
        schema: &TableSchema,
        filter: &Expression,
        values: Row,
    ) -> StoreResult<u64>;

    /// Select rows matching `filter` within `page`
    async fn list(
        &self,
        table: TableName,
        schema: &TableSchema,
        filter: &Expression,
        page: &BasePage,
    ) -> StoreResult<ListRows>;

    /// Delete rows matching `filter`, returning the affected count
    async fn delete(
        &self,
        table: TableName,
        schema: &TableSchema,
        filter: &Expression,
    ) -> StoreResult<u64>;
}

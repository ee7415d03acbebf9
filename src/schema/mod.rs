// Copyright (c) 2025 - Cowboy AI, Inc.
//! Column Descriptor Registry
//!
//! Declares, per stored entity, which columns are persisted, their semantic
//! types and the in-memory field each one binds to. Schemas are built once
//! (see the `LazyLock` statics next to each table) and never mutated.

pub mod column;
pub mod value;

pub use column::{merge_columns, ColumnDescriptor, ColumnType, SchemaError, TableSchema};
pub use value::Value;

/// Audit columns shared by every table
///
/// Written exclusively by the row store; request payloads never set them.
pub const AUDIT_COLUMNS: &[ColumnDescriptor] = &[
    ColumnDescriptor::same("creator", ColumnType::String),
    ColumnDescriptor::same("reviser", ColumnType::String),
    ColumnDescriptor::same("created_at", ColumnType::Time),
    ColumnDescriptor::same("updated_at", ColumnType::Time),
];

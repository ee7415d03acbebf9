// Copyright (c) 2025 - Cowboy AI, Inc.
//! Column Descriptors and Table Schemas
//!
//! A table's persisted shape is declared once as an ordered list of
//! [`ColumnDescriptor`]s and frozen into a [`TableSchema`] with
//! [`merge_columns`].
//!
//! # Merge Semantics
//!
//! ```text
//! merge([id, vendor, name], [name', creator]) = [id, vendor, name, creator]
//! ```
//!
//! Base columns come first, extension columns are appended, and a descriptor
//! whose column name was already seen is dropped (first occurrence wins).

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use super::value::Value;

/// Schema lookup error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("column {column} expects {expected} value, got {actual}")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        actual: &'static str,
    },
}

/// Semantic type of a stored column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Numeric,
    Boolean,
    Time,
    /// String restricted to an enumerated set (vendor, rule type)
    Enum,
    Json,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Numeric => "numeric",
            Self::Boolean => "boolean",
            Self::Time => "time",
            Self::Enum => "enum",
            Self::Json => "json",
        }
    }

    /// Whether `value` may be stored in a column of this type
    ///
    /// `Null` fits every column.
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (_, Value::Null)
                | (Self::String | Self::Enum, Value::String(_))
                | (Self::Numeric, Value::Numeric(_))
                | (Self::Boolean, Value::Boolean(_))
                | (Self::Time, Value::Time(_))
                | (Self::Json, _)
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One persisted column
///
/// `column` is the snake_case stored name, `named_c` is the in-memory field
/// name bound to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnDescriptor {
    pub column: Cow<'static, str>,
    pub named_c: Cow<'static, str>,
    pub column_type: ColumnType,
}

impl ColumnDescriptor {
    /// Declare a column whose field name differs from its column name
    pub const fn new(column: &'static str, named_c: &'static str, column_type: ColumnType) -> Self {
        Self {
            column: Cow::Borrowed(column),
            named_c: Cow::Borrowed(named_c),
            column_type,
        }
    }

    /// Declare a column whose field name equals its column name
    pub const fn same(column: &'static str, column_type: ColumnType) -> Self {
        Self::new(column, column, column_type)
    }

    /// Build a descriptor from runtime strings
    pub fn owned(column: impl Into<String>, named_c: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            column: Cow::Owned(column.into()),
            named_c: Cow::Owned(named_c.into()),
            column_type,
        }
    }
}

/// Frozen, ordered and deduplicated column set for one entity
///
/// Invariant: column names are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSchema {
    descriptors: Vec<ColumnDescriptor>,
}

/// Merge a base column set with an extension
///
/// # Rules
/// - Base columns first, extension columns appended, order preserved
/// - Later descriptors with an already seen column name are dropped
/// - Idempotent: `merge(merge(a, b), []) == merge(a, b)`
pub fn merge_columns(base: &[ColumnDescriptor], extension: &[ColumnDescriptor]) -> TableSchema {
    let mut seen: HashSet<&str> = HashSet::with_capacity(base.len() + extension.len());
    let mut descriptors = Vec::with_capacity(base.len() + extension.len());

    for descriptor in base.iter().chain(extension) {
        if seen.insert(descriptor.column.as_ref()) {
            descriptors.push(descriptor.clone());
        }
    }

    TableSchema { descriptors }
}

impl TableSchema {
    /// Extend this schema with more columns, same rules as [`merge_columns`]
    pub fn merge(&self, extension: &[ColumnDescriptor]) -> TableSchema {
        merge_columns(&self.descriptors, extension)
    }

    pub fn descriptors(&self) -> &[ColumnDescriptor] {
        &self.descriptors
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&ColumnDescriptor> {
        self.descriptors.iter().find(|d| d.column == column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn column_type(&self, column: &str) -> Option<ColumnType> {
        self.get(column).map(|d| d.column_type)
    }

    /// Stored column names in declaration order
    pub fn column_names(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.column.as_ref()).collect()
    }

    /// `id, vendor, ...` for select statements
    pub fn columns_expr(&self) -> String {
        self.column_names().join(", ")
    }

    /// Column list and `:named` placeholder list for an insert statement
    pub fn insert_named_expr(&self) -> (String, String) {
        let columns = self.columns_expr();
        let named = self
            .descriptors
            .iter()
            .map(|d| format!(":{}", d.named_c))
            .collect::<Vec<_>>()
            .join(", ");
        (columns, named)
    }

    /// `column = :named` assignments for the given columns
    pub fn update_named_expr(&self, columns: &[&str]) -> Result<String, SchemaError> {
        let assignments = columns
            .iter()
            .map(|column| {
                self.get(column)
                    .map(|d| format!("{} = :{}", d.column, d.named_c))
                    .ok_or_else(|| SchemaError::UnknownColumn(column.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(assignments.join(", "))
    }

    /// Check a value against the declared column type
    pub fn check_value(&self, column: &str, value: &Value) -> Result<(), SchemaError> {
        let descriptor = self
            .get(column)
            .ok_or_else(|| SchemaError::UnknownColumn(column.to_string()))?;

        if !descriptor.column_type.accepts(value) {
            return Err(SchemaError::TypeMismatch {
                column: column.to_string(),
                expected: descriptor.column_type,
                actual: value.type_name(),
            });
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TableSchema {
    type Item = &'a ColumnDescriptor;
    type IntoIter = std::slice::Iter<'a, ColumnDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

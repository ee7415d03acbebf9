// Copyright (c) 2025 - Cowboy AI, Inc.
//! Table Abstraction
//!
//! Every stored entity implements [`Table`]: it names its table, exposes its
//! frozen schema, converts to and from [`Row`]s, and validates itself on insert
//! and on update.
//!
//! Insert and update are two separate code paths because their required and
//! forbidden fields are asymmetric: `creator` is required on insert and
//! forbidden on update, `reviser` is required on update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::Vendor;
use crate::schema::{TableSchema, Value};
use crate::validation::ValidationResult;

use super::store::StoreError;

/// Stored table names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    GcpRegion,
    SecurityGroup,
    TCloudSecurityGroupRule,
    AwsSecurityGroupRule,
    HuaWeiSecurityGroupRule,
    AzureSecurityGroupRule,
}

impl TableName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GcpRegion => "gcp_region",
            Self::SecurityGroup => "security_group",
            Self::TCloudSecurityGroupRule => "tcloud_security_group_rule",
            Self::AwsSecurityGroupRule => "aws_security_group_rule",
            Self::HuaWeiSecurityGroupRule => "huawei_security_group_rule",
            Self::AzureSecurityGroupRule => "azure_security_group_rule",
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One stored row keyed by column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: BTreeMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style set
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.values.remove(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop `Null` entries, leaving only the columns an update should touch
    pub fn without_nulls(mut self) -> Self {
        self.values.retain(|_, v| !v.is_null());
        self
    }

    /// Required string column; `Null` or missing decodes as empty
    pub fn string(&self, column: &str) -> Result<String, StoreError> {
        Ok(self.opt_string(column)?.unwrap_or_default())
    }

    pub fn opt_string(&self, column: &str) -> Result<Option<String>, StoreError> {
        match self.values.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(StoreError::decode(column, other.type_name())),
        }
    }

    pub fn numeric(&self, column: &str) -> Result<i64, StoreError> {
        Ok(self.opt_numeric(column)?.unwrap_or_default())
    }

    pub fn opt_numeric(&self, column: &str) -> Result<Option<i64>, StoreError> {
        match self.values.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Numeric(n)) => Ok(Some(*n)),
            Some(other) => Err(StoreError::decode(column, other.type_name())),
        }
    }

    pub fn opt_time(&self, column: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
        match self.values.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Time(t)) => Ok(Some(*t)),
            Some(other) => Err(StoreError::decode(column, other.type_name())),
        }
    }

    /// JSON column holding an array of strings
    pub fn string_list(&self, column: &str) -> Result<Vec<String>, StoreError> {
        match self.values.get(column) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Json(json)) => serde_json::from_value(json.clone())
                .map_err(|e| StoreError::decode(column, &e.to_string())),
            Some(other) => Err(StoreError::decode(column, other.type_name())),
        }
    }

    pub fn vendor(&self) -> Result<Option<Vendor>, StoreError> {
        self.opt_string("vendor")?
            .map(|raw| raw.parse::<Vendor>())
            .transpose()
            .map_err(|e| StoreError::decode("vendor", &e.to_string()))
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A stored entity
pub trait Table: Sized {
    /// Table this entity lives in
    fn table_name() -> TableName;

    /// Frozen column schema
    fn schema() -> &'static TableSchema;

    /// Entity-level checks before an insert
    fn insert_validate(&self) -> ValidationResult;

    /// Entity-level checks before an update
    fn update_validate(&self) -> ValidationResult;

    /// Every schema column; unset optional fields become `Null`
    fn to_row(&self) -> Row;

    /// Only the columns an update writes
    ///
    /// Zero values mean "unchanged" and are left out, as are the columns the
    /// store or the insert path own.
    fn to_update_row(&self) -> Row;

    fn from_row(row: &Row) -> Result<Self, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_accessors() {
        let row = Row::new()
            .with("name", "web")
            .with("bk_biz_id", 3i64)
            .with("memo", None::<String>);

        assert_eq!(row.string("name").unwrap(), "web");
        assert_eq!(row.numeric("bk_biz_id").unwrap(), 3);
        assert_eq!(row.opt_string("memo").unwrap(), None);
        assert_eq!(row.string("missing").unwrap(), "");
        assert!(row.numeric("name").is_err());
    }

    #[test]
    fn test_without_nulls() {
        let row = Row::new().with("name", "web").with("memo", Value::Null);
        let row = row.without_nulls();
        assert_eq!(row.len(), 1);
        assert!(row.get("memo").is_none());
    }

    #[test]
    fn test_vendor_decoding() {
        let row = Row::new().with("vendor", "azure");
        assert_eq!(row.vendor().unwrap(), Some(Vendor::Azure));

        let row = Row::new().with("vendor", "nope");
        assert!(row.vendor().is_err());
    }
}

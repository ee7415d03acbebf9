// Copyright (c) 2025 - Cowboy AI, Inc.
//! Security Group Rule Tables
//!
//! One table per vendor. The common rule columns are shared; each
//! [`RuleShape`] appends its own columns, and the audit columns close the list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::SecurityGroupRuleType;
use crate::rule::RuleShape;
use crate::schema::{merge_columns, ColumnDescriptor, ColumnType, TableSchema, AUDIT_COLUMNS};
use crate::validation::constraints::{absent, max_len, must_be_empty, required_some};
use crate::validation::names::USER_MAX_LENGTH;
use crate::validation::{Validate, ValidationError, ValidationResult};

use super::store::StoreError;
use super::table::{Row, Table, TableName};

const CLOUD_ID_MAX_LENGTH: usize = 255;
const ID_MAX_LENGTH: usize = 64;
const REGION_MAX_LENGTH: usize = 20;

/// Columns every vendor's rule table carries
pub const RULE_BASE_COLUMNS: &[ColumnDescriptor] = &[
    ColumnDescriptor::same("id", ColumnType::String),
    ColumnDescriptor::same("cloud_id", ColumnType::String),
    ColumnDescriptor::same("security_group_id", ColumnType::String),
    ColumnDescriptor::same("cloud_security_group_id", ColumnType::String),
    ColumnDescriptor::same("account_id", ColumnType::String),
    ColumnDescriptor::same("region", ColumnType::String),
    ColumnDescriptor::new("type", "rule_type", ColumnType::Enum),
];

/// Rule base columns, then `extension`, then audit columns
pub fn rule_table_schema(extension: &[ColumnDescriptor]) -> TableSchema {
    merge_columns(RULE_BASE_COLUMNS, extension).merge(AUDIT_COLUMNS)
}

/// One stored rule of vendor shape `R`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityGroupRuleTable<R> {
    #[serde(default)]
    pub id: String,
    /// Rule id at the cloud, empty until synchronised
    #[serde(default)]
    pub cloud_id: String,
    #[serde(default)]
    pub security_group_id: String,
    #[serde(default)]
    pub cloud_security_group_id: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub region: String,
    #[serde(rename = "type", default)]
    pub rule_type: Option<SecurityGroupRuleType>,
    /// Vendor columns, serialized inline with the base columns
    #[serde(flatten)]
    pub spec: R,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub reviser: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl<R: RuleShape> SecurityGroupRuleTable<R> {
    fn validate_struct(&self) -> ValidationResult {
        must_be_empty("id", &self.id)?;
        max_len("cloud_id", &self.cloud_id, CLOUD_ID_MAX_LENGTH)?;
        max_len("security_group_id", &self.security_group_id, ID_MAX_LENGTH)?;
        max_len(
            "cloud_security_group_id",
            &self.cloud_security_group_id,
            CLOUD_ID_MAX_LENGTH,
        )?;
        max_len("account_id", &self.account_id, ID_MAX_LENGTH)?;
        max_len("region", &self.region, REGION_MAX_LENGTH)?;
        self.spec.validate()?;

        if let (Some(declared), Some(rule_type)) = (self.spec.declared_type(), self.rule_type) {
            if declared != rule_type {
                return Err(ValidationError::invariant(format!(
                    "rule type {declared} conflicts with {rule_type} rule set"
                )));
            }
        }

        max_len("creator", &self.creator, USER_MAX_LENGTH)?;
        max_len("reviser", &self.reviser, USER_MAX_LENGTH)?;
        absent("created_at", &self.created_at)?;
        absent("updated_at", &self.updated_at)
    }
}

impl<R: RuleShape> Table for SecurityGroupRuleTable<R> {
    fn table_name() -> TableName {
        R::table_name()
    }

    fn schema() -> &'static TableSchema {
        R::table_schema()
    }

    fn insert_validate(&self) -> ValidationResult {
        if self.security_group_id.is_empty() {
            return Err(ValidationError::invariant(
                "security group id can not be empty",
            ));
        }

        if self.account_id.is_empty() {
            return Err(ValidationError::invariant("account id can not be empty"));
        }

        required_some("type", &self.rule_type)?;

        if self.creator.is_empty() {
            return Err(ValidationError::invariant("creator can not be empty"));
        }

        self.validate_struct()
    }

    fn update_validate(&self) -> ValidationResult {
        self.validate_struct()?;

        if !self.creator.is_empty() {
            return Err(ValidationError::invariant("creator can not update"));
        }

        if self.reviser.is_empty() {
            return Err(ValidationError::invariant("reviser can not be empty"));
        }

        self.validate_struct()
    }

    fn to_row(&self) -> Row {
        let mut row = Row::new()
            .with("id", self.id.as_str())
            .with("cloud_id", self.cloud_id.as_str())
            .with("security_group_id", self.security_group_id.as_str())
            .with("cloud_security_group_id", self.cloud_security_group_id.as_str())
            .with("account_id", self.account_id.as_str())
            .with("region", self.region.as_str())
            .with("type", self.rule_type.map(|t| t.as_str()))
            .with("creator", self.creator.as_str())
            .with("reviser", self.reviser.as_str())
            .with("created_at", self.created_at)
            .with("updated_at", self.updated_at);
        self.spec.write_columns(&mut row);
        row
    }

    /// The whole vendor rule is rewritten; ownership and direction never change
    fn to_update_row(&self) -> Row {
        let mut row = Row::new().with("reviser", self.reviser.as_str());
        self.spec.write_columns(&mut row);
        row
    }

    fn from_row(row: &Row) -> Result<Self, StoreError> {
        let rule_type = row
            .opt_string("type")?
            .map(|raw| raw.parse::<SecurityGroupRuleType>())
            .transpose()
            .map_err(|e| StoreError::decode("type", &e))?;

        Ok(Self {
            id: row.string("id")?,
            cloud_id: row.string("cloud_id")?,
            security_group_id: row.string("security_group_id")?,
            cloud_security_group_id: row.string("cloud_security_group_id")?,
            account_id: row.string("account_id")?,
            region: row.string("region")?,
            rule_type,
            spec: R::read_columns(row)?,
            creator: row.string("creator")?,
            reviser: row.string("reviser")?,
            created_at: row.opt_time("created_at")?,
            updated_at: row.opt_time("updated_at")?,
        })
    }
}

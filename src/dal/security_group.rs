// Copyright (c) 2025 - Cowboy AI, Inc.
//! Security Group Table
//!
//! # Invariants
//!
//! 1. `vendor` is set and supports security groups
//! 2. `cloud_id`, `account_id` and `name` are non-empty on insert
//! 3. `bk_biz_id` is -1 (unassigned) or a business id; 0 on update leaves it unchanged

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::domain::Vendor;
use crate::schema::{merge_columns, ColumnDescriptor, ColumnType, TableSchema, AUDIT_COLUMNS};
use crate::validation::constraints::{absent, max_len, must_be_empty, optional, range};
use crate::validation::names::{
    validate_security_group_memo, validate_security_group_name, USER_MAX_LENGTH,
};
use crate::validation::{ValidationError, ValidationResult};

use super::store::StoreError;
use super::table::{Row, Table, TableName};

/// `bk_biz_id` of a security group not assigned to any business
pub const UNASSIGNED_BIZ_ID: i64 = -1;

const CLOUD_ID_MAX_LENGTH: usize = 255;
const REGION_MAX_LENGTH: usize = 20;
const ACCOUNT_ID_MAX_LENGTH: usize = 64;

const SECURITY_GROUP_COLUMNS: &[ColumnDescriptor] = &[
    ColumnDescriptor::same("id", ColumnType::String),
    ColumnDescriptor::same("vendor", ColumnType::Enum),
    ColumnDescriptor::same("cloud_id", ColumnType::String),
    ColumnDescriptor::same("bk_biz_id", ColumnType::Numeric),
    ColumnDescriptor::same("region", ColumnType::String),
    ColumnDescriptor::same("name", ColumnType::String),
    ColumnDescriptor::same("memo", ColumnType::String),
    ColumnDescriptor::same("account_id", ColumnType::String),
];

/// `security_group` columns
pub static SECURITY_GROUP_SCHEMA: LazyLock<TableSchema> =
    LazyLock::new(|| merge_columns(SECURITY_GROUP_COLUMNS, AUDIT_COLUMNS));

/// One row of `security_group`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupTable {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub vendor: Option<Vendor>,
    #[serde(default)]
    pub cloud_id: String,
    #[serde(default)]
    pub bk_biz_id: i64,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub reviser: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SecurityGroupTable {
    pub fn is_assigned(&self) -> bool {
        self.bk_biz_id > 0
    }

    fn validate_vendor(&self) -> ValidationResult {
        let Some(vendor) = self.vendor else {
            return Err(ValidationError::invariant("vendor can not be empty"));
        };
        if !vendor.supports_security_group_rules() {
            return Err(ValidationError::invariant(format!(
                "vendor {vendor} does not support security groups"
            )));
        }
        Ok(())
    }

    fn validate_struct(&self) -> ValidationResult {
        must_be_empty("id", &self.id)?;
        max_len("cloud_id", &self.cloud_id, CLOUD_ID_MAX_LENGTH)?;
        range("bk_biz_id", self.bk_biz_id, UNASSIGNED_BIZ_ID, i64::MAX)?;
        max_len("region", &self.region, REGION_MAX_LENGTH)?;
        if !self.name.is_empty() {
            validate_security_group_name(&self.name)?;
        }
        optional(&self.memo, |memo| validate_security_group_memo(memo))?;
        max_len("account_id", &self.account_id, ACCOUNT_ID_MAX_LENGTH)?;
        max_len("creator", &self.creator, USER_MAX_LENGTH)?;
        max_len("reviser", &self.reviser, USER_MAX_LENGTH)?;
        absent("created_at", &self.created_at)?;
        absent("updated_at", &self.updated_at)
    }
}

impl Table for SecurityGroupTable {
    fn table_name() -> TableName {
        TableName::SecurityGroup
    }

    fn schema() -> &'static TableSchema {
        &SECURITY_GROUP_SCHEMA
    }

    fn insert_validate(&self) -> ValidationResult {
        self.validate_vendor()?;

        if self.cloud_id.is_empty() {
            return Err(ValidationError::invariant("cloud id can not be empty"));
        }

        if self.account_id.is_empty() {
            return Err(ValidationError::invariant("account id can not be empty"));
        }

        if self.name.is_empty() {
            return Err(ValidationError::invariant("name can not be empty"));
        }

        if self.creator.is_empty() {
            return Err(ValidationError::invariant("creator can not be empty"));
        }

        if self.bk_biz_id == 0 {
            return Err(ValidationError::invariant(
                "bk_biz_id should be -1 or a business id",
            ));
        }

        self.validate_struct()
    }

    fn update_validate(&self) -> ValidationResult {
        self.validate_struct()?;
        self.validate_vendor()?;

        if !self.creator.is_empty() {
            return Err(ValidationError::invariant("creator can not update"));
        }

        if self.reviser.is_empty() {
            return Err(ValidationError::invariant("reviser can not be empty"));
        }

        self.validate_struct()
    }

    fn to_row(&self) -> Row {
        Row::new()
            .with("id", self.id.as_str())
            .with("vendor", self.vendor.map(|v| v.as_str()))
            .with("cloud_id", self.cloud_id.as_str())
            .with("bk_biz_id", self.bk_biz_id)
            .with("region", self.region.as_str())
            .with("name", self.name.as_str())
            .with("memo", self.memo.clone())
            .with("account_id", self.account_id.as_str())
            .with("creator", self.creator.as_str())
            .with("reviser", self.reviser.as_str())
            .with("created_at", self.created_at)
            .with("updated_at", self.updated_at)
    }

    fn to_update_row(&self) -> Row {
        let mut row = Row::new().with("reviser", self.reviser.as_str());
        if !self.name.is_empty() {
            row.set("name", self.name.as_str());
        }
        if let Some(memo) = &self.memo {
            row.set("memo", memo.as_str());
        }
        if self.bk_biz_id != 0 {
            row.set("bk_biz_id", self.bk_biz_id);
        }
        row
    }

    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.string("id")?,
            vendor: row.vendor()?,
            cloud_id: row.string("cloud_id")?,
            bk_biz_id: row.numeric("bk_biz_id")?,
            region: row.string("region")?,
            name: row.string("name")?,
            memo: row.opt_string("memo")?,
            account_id: row.string("account_id")?,
            creator: row.string("creator")?,
            reviser: row.string("reviser")?,
            created_at: row.opt_time("created_at")?,
            updated_at: row.opt_time("updated_at")?,
        })
    }
}

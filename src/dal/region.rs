// Copyright (c) 2025 - Cowboy AI, Inc.
//! GCP Region Table
//!
//! # Invariants
//!
//! 1. `vendor` is always [`Vendor::Gcp`]
//! 2. `region_id` is non-empty on insert
//! 3. `is_available` is 1 (available) or 2 (unavailable); on update 0 leaves
//!    the stored value unchanged

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::domain::Vendor;
use crate::schema::{merge_columns, ColumnDescriptor, ColumnType, TableSchema};
use crate::validation::constraints::{absent, max_len, must_be_empty, one_of_numeric};
use crate::validation::names::USER_MAX_LENGTH;
use crate::validation::{ValidationError, ValidationResult};

use super::store::StoreError;
use super::table::{Row, Table, TableName};

const REGION_ID_MAX_LENGTH: usize = 32;
const REGION_NAME_MAX_LENGTH: usize = 64;

const GCP_REGION_COLUMNS: &[ColumnDescriptor] = &[
    ColumnDescriptor::same("id", ColumnType::String),
    ColumnDescriptor::same("vendor", ColumnType::Enum),
    ColumnDescriptor::same("region_id", ColumnType::String),
    ColumnDescriptor::same("region_name", ColumnType::String),
    ColumnDescriptor::same("is_available", ColumnType::Numeric),
    ColumnDescriptor::same("creator", ColumnType::String),
    ColumnDescriptor::same("reviser", ColumnType::String),
    ColumnDescriptor::same("created_at", ColumnType::Time),
    ColumnDescriptor::same("updated_at", ColumnType::Time),
];

/// `gcp_region` columns
pub static GCP_REGION_SCHEMA: LazyLock<TableSchema> =
    LazyLock::new(|| merge_columns(&[], GCP_REGION_COLUMNS));

/// Availability of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionAvailability {
    Available = 1,
    Unavailable = 2,
}

impl RegionAvailability {
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Available),
            2 => Some(Self::Unavailable),
            _ => None,
        }
    }
}

/// One row of `gcp_region`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcpRegionTable {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub vendor: Option<Vendor>,
    #[serde(default)]
    pub region_id: String,
    #[serde(default)]
    pub region_name: String,
    /// 1 available, 2 unavailable, 0 unchanged (update only)
    #[serde(default)]
    pub is_available: i64,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub reviser: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl GcpRegionTable {
    /// A region ready for insert
    pub fn new(
        region_id: impl Into<String>,
        region_name: impl Into<String>,
        availability: RegionAvailability,
        creator: impl Into<String>,
    ) -> Self {
        Self {
            vendor: Some(Vendor::Gcp),
            region_id: region_id.into(),
            region_name: region_name.into(),
            is_available: availability.code(),
            creator: creator.into(),
            ..Self::default()
        }
    }

    pub fn availability(&self) -> Option<RegionAvailability> {
        RegionAvailability::from_code(self.is_available)
    }

    fn validate_vendor(&self) -> ValidationResult {
        match self.vendor {
            None => Err(ValidationError::invariant("vendor can not be empty")),
            Some(Vendor::Gcp) => Ok(()),
            Some(other) => Err(ValidationError::invariant(format!(
                "vendor should be gcp, but got {other}"
            ))),
        }
    }

    fn validate_struct(&self) -> ValidationResult {
        must_be_empty("id", &self.id)?;
        max_len("region_id", &self.region_id, REGION_ID_MAX_LENGTH)?;
        max_len("region_name", &self.region_name, REGION_NAME_MAX_LENGTH)?;
        if self.is_available != 0 {
            one_of_numeric("is_available", self.is_available, &[1, 2])?;
        }
        max_len("creator", &self.creator, USER_MAX_LENGTH)?;
        max_len("reviser", &self.reviser, USER_MAX_LENGTH)?;
        absent("created_at", &self.created_at)?;
        absent("updated_at", &self.updated_at)
    }
}

impl Table for GcpRegionTable {
    fn table_name() -> TableName {
        TableName::GcpRegion
    }

    fn schema() -> &'static TableSchema {
        &GCP_REGION_SCHEMA
    }

    fn insert_validate(&self) -> ValidationResult {
        self.validate_vendor()?;

        if self.region_id.is_empty() {
            return Err(ValidationError::invariant("region id can not be empty"));
        }

        if self.creator.is_empty() {
            return Err(ValidationError::invariant("creator can not be empty"));
        }

        if self.is_available == 0 {
            return Err(ValidationError::Required {
                field: "is_available",
            });
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
            .with("region_id", self.region_id.as_str())
            .with("region_name", self.region_name.as_str())
            .with("is_available", self.is_available)
            .with("creator", self.creator.as_str())
            .with("reviser", self.reviser.as_str())
            .with("created_at", self.created_at)
            .with("updated_at", self.updated_at)
    }

    fn to_update_row(&self) -> Row {
        let mut row = Row::new().with("reviser", self.reviser.as_str());
        if !self.region_name.is_empty() {
            row.set("region_name", self.region_name.as_str());
        }
        if self.is_available != 0 {
            row.set("is_available", self.is_available);
        }
        row
    }

    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.string("id")?,
            vendor: row.vendor()?,
            region_id: row.string("region_id")?,
            region_name: row.string("region_name")?,
            is_available: row.numeric("is_available")?,
            creator: row.string("creator")?,
            reviser: row.string("reviser")?,
            created_at: row.opt_time("created_at")?,
            updated_at: row.opt_time("updated_at")?,
        })
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Data access layer
//!
//! Stored entities ([`Table`] implementors), their frozen schemas, and the
//! [`RowStore`] seam they are persisted through.

pub mod memory;
pub mod region;
pub mod rule;
pub mod security_group;
pub mod store;
pub mod table;

pub use memory::InMemoryRowStore;
pub use region::{GcpRegionTable, RegionAvailability, GCP_REGION_SCHEMA};
pub use rule::{rule_table_schema, SecurityGroupRuleTable, RULE_BASE_COLUMNS};
pub use security_group::{SecurityGroupTable, SECURITY_GROUP_SCHEMA, UNASSIGNED_BIZ_ID};
pub use store::{ListRows, RowStore, StoreError, StoreResult};
pub use table::{Row, Table, TableName};

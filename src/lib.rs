// Copyright (c) 2025 - Cowboy AI, Inc.
//! Multi-cloud security group inventory core
//!
//! Vendor-polymorphic security group rules (TCloud, AWS, HuaWei, Azure), the
//! request validation layer in front of them, the row validator guarding
//! persistence, and the column schemas the row store persists through.
//!
//! # Layers
//!
//! ```text
//! request  → validation (structural + business rules, first error wins)
//!     ↓
//! service  → loads owners, checks vendors, builds rows
//!     ↓
//! dal      → Table::insert_validate / update_validate → RowStore
//!     ↓
//! schema   → frozen column descriptors per table
//! ```

pub mod config;
pub mod dal;
pub mod domain;
pub mod errors;
pub mod query;
pub mod request;
pub mod rule;
pub mod schema;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use config::InventoryConfig;
pub use dal::{InMemoryRowStore, RowStore, StoreError, Table};
pub use domain::{SecurityGroupRuleType, Vendor};
pub use errors::{InventoryError, InventoryResult};
pub use rule::{RuleShape, RuleUpdate, SecurityGroupRule};
pub use service::{Kit, SecurityGroupService};
pub use validation::{Validate, ValidationError, ValidationResult};

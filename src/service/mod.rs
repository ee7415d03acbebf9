// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Layer
//!
//! Orchestrates request validation, entity validation and the row store for
//! each API operation. Transport (HTTP routing, auth) stays outside.
//!
//! | Route | Method |
//! |---|---|
//! | `GET /security_groups` | [`SecurityGroupService::list_security_groups`] |
//! | `GET /security_groups/{id}/rules` | [`SecurityGroupService::list_rules`] |
//! | `PATCH /security_groups/{id}` | [`SecurityGroupService::update_security_group`] |
//! | `POST /security_groups/{id}/rules` | [`SecurityGroupService::create_rules`] |
//! | `PATCH /security_groups/{id}/rules/{rule_id}` | [`SecurityGroupService::update_rule`] |
//! | `DELETE /security_groups` | [`SecurityGroupService::batch_delete`] |
//! | `POST /security_groups/assign` | [`SecurityGroupService::assign_to_biz`] |
//!
//! # Example
//!
//! ```rust,ignore
//! use cloud_inventory::dal::InMemoryRowStore;
//! use cloud_inventory::service::{Kit, SecurityGroupService};
//!
//! let service = SecurityGroupService::new(InMemoryRowStore::new());
//! let kit = Kit::new("admin");
//! let ids = service.create_rules(&kit, &sg_id, request).await?;
//! ```

pub mod security_group;

pub use security_group::SecurityGroupService;

use uuid::Uuid;

/// Caller context carried through one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kit {
    /// Recorded as `creator`/`reviser`
    pub user: String,
    /// Attached to every log line of the operation
    pub correlation_id: Uuid,
}

impl Kit {
    pub fn new(user: impl Into<String>) -> Self {
        Self::with_correlation_id(user, Uuid::now_v7())
    }

    pub fn with_correlation_id(user: impl Into<String>, correlation_id: Uuid) -> Self {
        Self {
            user: user.into(),
            correlation_id,
        }
    }
}

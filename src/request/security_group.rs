// Copyright (c) 2025 - Cowboy AI, Inc.
//! Security group requests

use serde::{Deserialize, Serialize};

use crate::dal::SecurityGroupTable;
use crate::query::{BasePage, Expression, DEFAULT_MAX_PAGE_LIMIT};
use crate::validation::constraints::{each, required, required_some};
use crate::validation::names::{validate_security_group_memo, validate_security_group_name};
use crate::validation::{Validate, ValidationError, ValidationResult};

use super::BATCH_OPERATION_MAX_LIMIT;

/// List security groups matching a filter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityGroupListReq {
    #[serde(default)]
    pub filter: Option<Expression>,
    #[serde(default)]
    pub page: Option<BasePage>,
}

impl SecurityGroupListReq {
    pub fn new(filter: Expression, page: BasePage) -> Self {
        Self {
            filter: Some(filter),
            page: Some(page),
        }
    }

    /// Validate against a store-specific page ceiling
    pub fn validate_with(&self, max_page_limit: u32) -> ValidationResult {
        required_some("filter", &self.filter)?;
        let Some(page) = &self.page else {
            return Err(ValidationError::Required { field: "page" });
        };
        page.validate(max_page_limit)
            .map_err(|e| ValidationError::InvalidFormat {
                field: "page",
                reason: e.to_string(),
            })
    }
}

impl Validate for SecurityGroupListReq {
    fn validate(&self) -> ValidationResult {
        self.validate_with(DEFAULT_MAX_PAGE_LIMIT)
    }
}

/// Security groups found by a list call
///
/// A count page fills `count` only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityGroupListResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<SecurityGroupTable>,
}

/// Change the name and/or memo of a security group
///
/// An empty `name` is treated as absent. A present `memo`, even `""`, is
/// written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupUpdateReq {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl SecurityGroupUpdateReq {
    /// The new name, if one was given
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref()
    }
}

impl Validate for SecurityGroupUpdateReq {
    fn validate(&self) -> ValidationResult {
        if self.name().is_none() && self.memo.is_none() {
            return Err(ValidationError::business("name or memo is required"));
        }

        if let Some(name) = self.name() {
            validate_security_group_name(name)?;
        }

        if let Some(memo) = self.memo() {
            validate_security_group_memo(memo)?;
        }

        Ok(())
    }
}

/// Assign security groups to a business
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignSecurityGroupToBizReq {
    #[serde(default)]
    pub bk_biz_id: i64,
    #[serde(default)]
    pub security_group_ids: Vec<String>,
}

impl Validate for AssignSecurityGroupToBizReq {
    fn validate(&self) -> ValidationResult {
        if self.bk_biz_id <= 0 {
            return Err(ValidationError::business("bk_biz_id should >= 0"));
        }

        if self.security_group_ids.is_empty() {
            return Err(ValidationError::business("security group ids is required"));
        }

        if self.security_group_ids.len() > BATCH_OPERATION_MAX_LIMIT {
            return Err(ValidationError::business(format!(
                "security group ids should <= {BATCH_OPERATION_MAX_LIMIT}"
            )));
        }

        Ok(())
    }
}

/// Delete security groups by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupBatchDeleteReq {
    #[serde(default)]
    pub ids: Vec<String>,
}

impl Validate for SecurityGroupBatchDeleteReq {
    fn validate(&self) -> ValidationResult {
        if self.ids.is_empty() {
            return Err(ValidationError::Required { field: "ids" });
        }

        if self.ids.len() > BATCH_OPERATION_MAX_LIMIT {
            return Err(ValidationError::business(format!(
                "ids should <= {BATCH_OPERATION_MAX_LIMIT}"
            )));
        }

        each(&self.ids, |id| required("ids", id))
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Request Validation Layer
//!
//! Typed request payloads for the security group API. Every request
//! implements [`Validate`](crate::validation::Validate) and reports only the
//! first violation; nothing reaches the row store unless validation passed.

pub mod rule;
pub mod security_group;

pub use rule::{
    SecurityGroupRuleCreateReq, SecurityGroupRuleListReq, SecurityGroupRuleListResult,
    VendorRuleCreateReq, VendorRuleUpdateReq,
};
pub use security_group::{
    AssignSecurityGroupToBizReq, SecurityGroupBatchDeleteReq, SecurityGroupListReq,
    SecurityGroupListResult, SecurityGroupUpdateReq,
};

/// Upper bound on the ids accepted by one batch operation
pub const BATCH_OPERATION_MAX_LIMIT: usize = 100;

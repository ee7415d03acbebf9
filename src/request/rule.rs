// Copyright (c) 2025 - Cowboy AI, Inc.
//! Security group rule requests
//!
//! The create envelope is generic over one [`RuleShape`], so a single request
//! can only carry rules of one vendor. [`VendorRuleCreateReq`] and
//! [`VendorRuleUpdateReq`] pick the shape from a vendor known only at runtime.

use serde::{Deserialize, Serialize};

use crate::dal::SecurityGroupRuleTable;
use crate::domain::{SecurityGroupRuleType, Vendor};
use crate::query::{BasePage, PageWithoutSort, DEFAULT_MAX_PAGE_LIMIT};
use crate::rule::{
    AwsSGRuleUpdateReq, AwsSecurityGroupRule, AzureSGRuleUpdateReq, AzureSecurityGroupRule,
    HuaWeiSGRuleUpdateReq, HuaWeiSecurityGroupRule, RuleDecodeError, RuleShape,
    TCloudSGRuleUpdateReq, TCloudSecurityGroupRule,
};
use crate::validation::{Validate, ValidationError, ValidationResult};

/// List the rules of one security group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupRuleListReq {
    #[serde(default)]
    pub page: Option<PageWithoutSort>,
}

impl SecurityGroupRuleListReq {
    /// Validate against a store-specific page ceiling
    pub fn validate_with(&self, max_page_limit: u32) -> ValidationResult {
        let Some(page) = self.page else {
            return Err(ValidationError::Required { field: "page" });
        };
        BasePage::from(page)
            .validate(max_page_limit)
            .map_err(|e| ValidationError::InvalidFormat {
                field: "page",
                reason: e.to_string(),
            })
    }
}

impl Validate for SecurityGroupRuleListReq {
    fn validate(&self) -> ValidationResult {
        self.validate_with(DEFAULT_MAX_PAGE_LIMIT)
    }
}

/// Rules found by a list call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityGroupRuleListResult<R> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<SecurityGroupRuleTable<R>>,
}

impl<R> Default for SecurityGroupRuleListResult<R> {
    fn default() -> Self {
        Self {
            count: None,
            details: Vec::new(),
        }
    }
}

/// Create rules in one direction
///
/// Exactly one of the two sets must be non-empty. Rule values are checked
/// separately, one rule at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityGroupRuleCreateReq<R> {
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub egress_rule_set: Vec<R>,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub ingress_rule_set: Vec<R>,
}

impl<R> Default for SecurityGroupRuleCreateReq<R> {
    fn default() -> Self {
        Self {
            egress_rule_set: Vec::new(),
            ingress_rule_set: Vec::new(),
        }
    }
}

impl<R> SecurityGroupRuleCreateReq<R> {
    pub fn egress(rules: Vec<R>) -> Self {
        Self {
            egress_rule_set: rules,
            ingress_rule_set: Vec::new(),
        }
    }

    pub fn ingress(rules: Vec<R>) -> Self {
        Self {
            egress_rule_set: Vec::new(),
            ingress_rule_set: rules,
        }
    }

    /// Direction of the non-empty set, once validated
    pub fn rule_type(&self) -> Option<SecurityGroupRuleType> {
        match (self.egress_rule_set.is_empty(), self.ingress_rule_set.is_empty()) {
            (false, true) => Some(SecurityGroupRuleType::Egress),
            (true, false) => Some(SecurityGroupRuleType::Ingress),
            _ => None,
        }
    }

    pub fn rules(&self) -> &[R] {
        if self.egress_rule_set.is_empty() {
            &self.ingress_rule_set
        } else {
            &self.egress_rule_set
        }
    }

    pub fn into_rules(self) -> Vec<R> {
        if self.egress_rule_set.is_empty() {
            self.ingress_rule_set
        } else {
            self.egress_rule_set
        }
    }
}

impl<R> Validate for SecurityGroupRuleCreateReq<R> {
    fn validate(&self) -> ValidationResult {
        if self.egress_rule_set.is_empty() && self.ingress_rule_set.is_empty() {
            return Err(ValidationError::business(
                "egress rule or ingress rule is required",
            ));
        }

        if !self.egress_rule_set.is_empty() && !self.ingress_rule_set.is_empty() {
            return Err(ValidationError::business(
                "egress rule or ingress rule only one is allowed",
            ));
        }

        Ok(())
    }
}

/// Rule create request for a vendor chosen at runtime
#[derive(Debug, Clone, PartialEq)]
pub enum VendorRuleCreateReq {
    TCloud(SecurityGroupRuleCreateReq<TCloudSecurityGroupRule>),
    Aws(SecurityGroupRuleCreateReq<AwsSecurityGroupRule>),
    HuaWei(SecurityGroupRuleCreateReq<HuaWeiSecurityGroupRule>),
    Azure(SecurityGroupRuleCreateReq<AzureSecurityGroupRule>),
}

impl VendorRuleCreateReq {
    pub fn decode(vendor: Vendor, body: serde_json::Value) -> Result<Self, RuleDecodeError> {
        let req = match vendor {
            Vendor::TCloud => Self::TCloud(serde_json::from_value(body)?),
            Vendor::Aws => Self::Aws(serde_json::from_value(body)?),
            Vendor::HuaWei => Self::HuaWei(serde_json::from_value(body)?),
            Vendor::Azure => Self::Azure(serde_json::from_value(body)?),
            Vendor::Gcp => return Err(RuleDecodeError::Unsupported(vendor)),
        };
        Ok(req)
    }

    pub fn vendor(&self) -> Vendor {
        match self {
            Self::TCloud(_) => Vendor::TCloud,
            Self::Aws(_) => Vendor::Aws,
            Self::HuaWei(_) => Vendor::HuaWei,
            Self::Azure(_) => Vendor::Azure,
        }
    }
}

fn validate_create<R: RuleShape>(req: &SecurityGroupRuleCreateReq<R>) -> ValidationResult {
    req.validate()?;
    req.rules().validate()
}

/// Envelope cardinality first, then every rule's own constraints
impl Validate for VendorRuleCreateReq {
    fn validate(&self) -> ValidationResult {
        match self {
            Self::TCloud(req) => validate_create(req),
            Self::Aws(req) => validate_create(req),
            Self::HuaWei(req) => validate_create(req),
            Self::Azure(req) => validate_create(req),
        }
    }
}

/// Rule update request for a vendor chosen at runtime
#[derive(Debug, Clone, PartialEq)]
pub enum VendorRuleUpdateReq {
    TCloud(TCloudSGRuleUpdateReq),
    Aws(AwsSGRuleUpdateReq),
    HuaWei(HuaWeiSGRuleUpdateReq),
    Azure(AzureSGRuleUpdateReq),
}

impl VendorRuleUpdateReq {
    pub fn decode(vendor: Vendor, body: serde_json::Value) -> Result<Self, RuleDecodeError> {
        let req = match vendor {
            Vendor::TCloud => Self::TCloud(serde_json::from_value(body)?),
            Vendor::Aws => Self::Aws(serde_json::from_value(body)?),
            Vendor::HuaWei => Self::HuaWei(serde_json::from_value(body)?),
            Vendor::Azure => Self::Azure(serde_json::from_value(body)?),
            Vendor::Gcp => return Err(RuleDecodeError::Unsupported(vendor)),
        };
        Ok(req)
    }

    pub fn vendor(&self) -> Vendor {
        match self {
            Self::TCloud(_) => Vendor::TCloud,
            Self::Aws(_) => Vendor::Aws,
            Self::HuaWei(_) => Vendor::HuaWei,
            Self::Azure(_) => Vendor::Azure,
        }
    }
}

impl Validate for VendorRuleUpdateReq {
    fn validate(&self) -> ValidationResult {
        match self {
            Self::TCloud(req) => req.validate(),
            Self::Aws(req) => req.validate(),
            Self::HuaWei(req) => req.validate(),
            Self::Azure(req) => req.validate(),
        }
    }
}

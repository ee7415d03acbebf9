// Copyright (c) 2025 - Cowboy AI, Inc.
//! Security Group Rule Variant Model
//!
//! Each vendor describes a filtering rule differently, so there is one
//! concrete struct per vendor and no shared base struct:
//!
//! | Vendor | Shape |
//! |---|---|
//! | TCloud | [`TCloudSecurityGroupRule`] |
//! | AWS | [`AwsSecurityGroupRule`] |
//! | HuaWei | [`HuaWeiSecurityGroupRule`] |
//! | Azure | [`AzureSecurityGroupRule`] |
//!
//! The set is closed twice over:
//!
//! - [`RuleShape`] is sealed. Request envelopes are generic over it, so a
//!   single request can never mix shapes from different vendors.
//! - [`SecurityGroupRule`] is the sum type used where the vendor is only known
//!   at runtime; every vendor-specific branch is an exhaustive `match`.
//!
//! Shapes only declare constraints (their [`Validate`] impls); the checking
//! itself is done by the functions in [`crate::validation::constraints`].

pub mod aws;
pub mod azure;
pub mod huawei;
pub mod tcloud;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::dal::{Row, StoreError, TableName};
use crate::domain::{SecurityGroupRuleType, UnknownVendor, Vendor};
use crate::schema::{ColumnDescriptor, TableSchema};
use crate::validation::{Validate, ValidationResult};

pub use aws::{AwsSGRuleUpdateReq, AwsSecurityGroupRule};
pub use azure::{AzureSGRuleUpdateReq, AzureSecurityGroupRule};
pub use huawei::{HuaWeiSGRuleUpdateReq, HuaWeiSecurityGroupRule};
pub use tcloud::{TCloudSGRuleUpdateReq, TCloudSecurityGroupRule};

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::TCloudSecurityGroupRule {}
    impl Sealed for super::AwsSecurityGroupRule {}
    impl Sealed for super::HuaWeiSecurityGroupRule {}
    impl Sealed for super::AzureSecurityGroupRule {}
}

/// One vendor's rule shape
///
/// Implemented only by the four vendor structs in this module.
pub trait RuleShape:
    sealed::Sealed
    + Validate
    + Clone
    + Default
    + Debug
    + PartialEq
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Vendor this shape belongs to
    const VENDOR: Vendor;

    /// Table holding this vendor's rules
    fn table_name() -> TableName;

    /// Vendor-specific columns, appended to the common rule columns
    fn extension_columns() -> &'static [ColumnDescriptor];

    /// Full schema: common rule columns, vendor columns, audit columns
    fn table_schema() -> &'static TableSchema;

    /// Write the vendor-specific columns
    fn write_columns(&self, row: &mut Row);

    /// Read the vendor-specific columns
    fn read_columns(row: &Row) -> Result<Self, StoreError>;

    /// Direction carried inside the rule itself, if the vendor has one
    fn declared_type(&self) -> Option<SecurityGroupRuleType> {
        None
    }

    fn into_rule(self) -> SecurityGroupRule;
}

/// Partial update payload for one vendor's rule
///
/// Absent fields leave the stored value untouched.
pub trait RuleUpdate: Validate + DeserializeOwned + Debug + Send + Sync {
    type Rule: RuleShape;

    /// Overlay the present fields onto `rule`
    fn apply(&self, rule: &mut Self::Rule);
}

/// A rule of any supported vendor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "vendor", rename_all = "lowercase")]
pub enum SecurityGroupRule {
    TCloud(TCloudSecurityGroupRule),
    Aws(AwsSecurityGroupRule),
    HuaWei(HuaWeiSecurityGroupRule),
    Azure(AzureSecurityGroupRule),
}

impl SecurityGroupRule {
    pub fn vendor(&self) -> Vendor {
        match self {
            Self::TCloud(_) => Vendor::TCloud,
            Self::Aws(_) => Vendor::Aws,
            Self::HuaWei(_) => Vendor::HuaWei,
            Self::Azure(_) => Vendor::Azure,
        }
    }

    /// Decode a single rule body for a vendor known at runtime
    pub fn from_json(vendor: Vendor, body: serde_json::Value) -> Result<Self, RuleDecodeError> {
        let rule = match vendor {
            Vendor::TCloud => Self::TCloud(serde_json::from_value(body)?),
            Vendor::Aws => Self::Aws(serde_json::from_value(body)?),
            Vendor::HuaWei => Self::HuaWei(serde_json::from_value(body)?),
            Vendor::Azure => Self::Azure(serde_json::from_value(body)?),
            Vendor::Gcp => return Err(RuleDecodeError::Unsupported(vendor)),
        };
        Ok(rule)
    }
}

impl Validate for SecurityGroupRule {
    fn validate(&self) -> ValidationResult {
        match self {
            Self::TCloud(rule) => rule.validate(),
            Self::Aws(rule) => rule.validate(),
            Self::HuaWei(rule) => rule.validate(),
            Self::Azure(rule) => rule.validate(),
        }
    }
}

impl From<TCloudSecurityGroupRule> for SecurityGroupRule {
    fn from(rule: TCloudSecurityGroupRule) -> Self {
        Self::TCloud(rule)
    }
}

impl From<AwsSecurityGroupRule> for SecurityGroupRule {
    fn from(rule: AwsSecurityGroupRule) -> Self {
        Self::Aws(rule)
    }
}

impl From<HuaWeiSecurityGroupRule> for SecurityGroupRule {
    fn from(rule: HuaWeiSecurityGroupRule) -> Self {
        Self::HuaWei(rule)
    }
}

impl From<AzureSecurityGroupRule> for SecurityGroupRule {
    fn from(rule: AzureSecurityGroupRule) -> Self {
        Self::Azure(rule)
    }
}

/// Failure to turn a JSON body into a vendor's rule type
#[derive(Debug, thiserror::Error)]
pub enum RuleDecodeError {
    #[error("security group rules are not supported for vendor {0}")]
    Unsupported(Vendor),

    #[error(transparent)]
    UnknownVendor(#[from] UnknownVendor),

    #[error("invalid rule body: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_dispatches_on_vendor() {
        let rule = SecurityGroupRule::from_json(
            Vendor::Aws,
            json!({"ipv4_cidr": "10.0.0.0/8", "from_port": 22, "to_port": 22, "protocol": "tcp"}),
        )
        .unwrap();
        assert_eq!(rule.vendor(), Vendor::Aws);
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn test_gcp_has_no_rule_shape() {
        let err = SecurityGroupRule::from_json(Vendor::Gcp, json!({})).unwrap_err();
        assert!(matches!(err, RuleDecodeError::Unsupported(Vendor::Gcp)));
    }

    #[test]
    fn test_tagged_serialization() {
        let rule: SecurityGroupRule = TCloudSecurityGroupRule {
            action: "ACCEPT".to_string(),
            ..Default::default()
        }
        .into();
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["vendor"], "tcloud");
        assert_eq!(json["action"], "ACCEPT");
    }
}

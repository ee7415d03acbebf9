// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cloud Vendor and Rule Direction Taxonomy
//!
//! Stored as lowercase strings in every table's `vendor` column.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported vendor: {0}")]
pub struct UnknownVendor(pub String);

/// Cloud vendors known to the inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    /// Tencent Cloud
    TCloud,
    /// Amazon Web Services
    Aws,
    /// Google Cloud Platform
    Gcp,
    /// Microsoft Azure
    Azure,
    /// HuaWei Cloud
    HuaWei,
}

impl Vendor {
    /// Every recognised vendor
    pub const ALL: [Vendor; 5] = [
        Vendor::TCloud,
        Vendor::Aws,
        Vendor::Gcp,
        Vendor::Azure,
        Vendor::HuaWei,
    ];

    /// Get the canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TCloud => "tcloud",
            Self::Aws => "aws",
            Self::Gcp => "gcp",
            Self::Azure => "azure",
            Self::HuaWei => "huawei",
        }
    }

    /// Whether security group rules can be managed for this vendor
    pub fn supports_security_group_rules(&self) -> bool {
        matches!(
            self,
            Self::TCloud | Self::Aws | Self::Azure | Self::HuaWei
        )
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = UnknownVendor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|vendor| vendor.as_str() == s)
            .ok_or_else(|| UnknownVendor(s.to_string()))
    }
}

/// Direction of a security group rule
///
/// Azure stores this per rule and does not allow changing it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityGroupRuleType {
    Egress,
    Ingress,
}

impl SecurityGroupRuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Egress => "egress",
            Self::Ingress => "ingress",
        }
    }
}

impl fmt::Display for SecurityGroupRuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SecurityGroupRuleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "egress" => Ok(Self::Egress),
            "ingress" => Ok(Self::Ingress),
            other => Err(format!("unknown security group rule type: {other}")),
        }
    }
}

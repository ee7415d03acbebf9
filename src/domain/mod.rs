// Copyright (c) 2025 - Cowboy AI, Inc.
//! Inventory Domain Models
//!
//! Value objects shared by rules, requests and tables.
//!
//! # Value Objects with Invariants
//!
//! - [`Vendor`] - Cloud vendor taxonomy (`tcloud`, `aws`, `gcp`, `azure`, `huawei`)
//! - [`SecurityGroupRuleType`] - Rule direction (egress/ingress)
//! - [`IpCidr`] - IPv4/IPv6 with optional CIDR prefix
//! - [`PortRange`] - Inclusive port range (1-65535)
//! - [`PortSpec`] - `ALL` or a comma separated list of port ranges

pub mod network;
pub mod vendor;

pub use network::{IpCidr, NetworkError, PortRange, PortSpec};
pub use vendor::{SecurityGroupRuleType, UnknownVendor, Vendor};

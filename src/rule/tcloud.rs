// Copyright (c) 2025 - Cowboy AI, Inc.
//! TCloud security group rules

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::dal::rule::rule_table_schema;
use crate::dal::{Row, StoreError, TableName};
use crate::domain::Vendor;
use crate::schema::{ColumnDescriptor, ColumnType, TableSchema};
use crate::validation::constraints::{
    ipv4_cidr, ipv6_cidr, max_len, one_of_ignore_case, optional, port_spec, protocol, required,
};
use crate::validation::names::MEMO_MAX_LENGTH;
use crate::validation::{Validate, ValidationResult};

use super::{RuleShape, RuleUpdate, SecurityGroupRule};

const PROTOCOLS: &[&str] = &["tcp", "udp", "icmp", "icmpv6", "gre", "all"];
const ACTIONS: &[&str] = &["ACCEPT", "DROP"];
const TARGET_ID_MAX_LENGTH: usize = 255;

const TCLOUD_RULE_COLUMNS: &[ColumnDescriptor] = &[
    ColumnDescriptor::same("protocol", ColumnType::String),
    ColumnDescriptor::same("port", ColumnType::String),
    ColumnDescriptor::same("ipv4_cidr", ColumnType::String),
    ColumnDescriptor::same("ipv6_cidr", ColumnType::String),
    ColumnDescriptor::same("cloud_target_security_group_id", ColumnType::String),
    ColumnDescriptor::same("action", ColumnType::String),
    ColumnDescriptor::same("memo", ColumnType::String),
];

static TCLOUD_RULE_SCHEMA: LazyLock<TableSchema> =
    LazyLock::new(|| rule_table_schema(TCLOUD_RULE_COLUMNS));

/// TCloud rule
///
/// `port` is `ALL`, a port, a range `n-m` or a comma separated list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TCloudSecurityGroupRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_target_security_group_id: Option<String>,
    /// `ACCEPT` or `DROP`
    #[serde(default)]
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl TCloudSecurityGroupRule {
    fn validate_optional_fields(&self) -> ValidationResult {
        optional(&self.protocol, |p| protocol("protocol", p, PROTOCOLS))?;
        optional(&self.port, |p| port_spec("port", p, true))?;
        optional(&self.ipv4_cidr, |c| ipv4_cidr("ipv4_cidr", c))?;
        optional(&self.ipv6_cidr, |c| ipv6_cidr("ipv6_cidr", c))?;
        optional(&self.cloud_target_security_group_id, |id| {
            max_len("cloud_target_security_group_id", id, TARGET_ID_MAX_LENGTH)
        })?;
        optional(&self.memo, |m| max_len("memo", m, MEMO_MAX_LENGTH))
    }
}

impl Validate for TCloudSecurityGroupRule {
    fn validate(&self) -> ValidationResult {
        self.validate_optional_fields()?;
        required("action", &self.action)?;
        one_of_ignore_case("action", &self.action, ACTIONS)
    }
}

impl RuleShape for TCloudSecurityGroupRule {
    const VENDOR: Vendor = Vendor::TCloud;

    fn table_name() -> TableName {
        TableName::TCloudSecurityGroupRule
    }

    fn extension_columns() -> &'static [ColumnDescriptor] {
        TCLOUD_RULE_COLUMNS
    }

    fn table_schema() -> &'static TableSchema {
        &TCLOUD_RULE_SCHEMA
    }

    fn write_columns(&self, row: &mut Row) {
        row.set("protocol", self.protocol.clone());
        row.set("port", self.port.clone());
        row.set("ipv4_cidr", self.ipv4_cidr.clone());
        row.set("ipv6_cidr", self.ipv6_cidr.clone());
        row.set(
            "cloud_target_security_group_id",
            self.cloud_target_security_group_id.clone(),
        );
        row.set("action", self.action.as_str());
        row.set("memo", self.memo.clone());
    }

    fn read_columns(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            protocol: row.opt_string("protocol")?,
            port: row.opt_string("port")?,
            ipv4_cidr: row.opt_string("ipv4_cidr")?,
            ipv6_cidr: row.opt_string("ipv6_cidr")?,
            cloud_target_security_group_id: row.opt_string("cloud_target_security_group_id")?,
            action: row.string("action")?,
            memo: row.opt_string("memo")?,
        })
    }

    fn into_rule(self) -> SecurityGroupRule {
        SecurityGroupRule::TCloud(self)
    }
}

/// Partial update of a TCloud rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TCloudSGRuleUpdateReq {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_target_security_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl Validate for TCloudSGRuleUpdateReq {
    fn validate(&self) -> ValidationResult {
        optional(&self.protocol, |p| protocol("protocol", p, PROTOCOLS))?;
        optional(&self.port, |p| port_spec("port", p, true))?;
        optional(&self.ipv4_cidr, |c| ipv4_cidr("ipv4_cidr", c))?;
        optional(&self.ipv6_cidr, |c| ipv6_cidr("ipv6_cidr", c))?;
        optional(&self.cloud_target_security_group_id, |id| {
            max_len("cloud_target_security_group_id", id, TARGET_ID_MAX_LENGTH)
        })?;
        optional(&self.action, |a| one_of_ignore_case("action", a, ACTIONS))?;
        optional(&self.memo, |m| max_len("memo", m, MEMO_MAX_LENGTH))
    }
}

impl RuleUpdate for TCloudSGRuleUpdateReq {
    type Rule = TCloudSecurityGroupRule;

    fn apply(&self, rule: &mut TCloudSecurityGroupRule) {
        if self.protocol.is_some() {
            rule.protocol.clone_from(&self.protocol);
        }
        if self.port.is_some() {
            rule.port.clone_from(&self.port);
        }
        if self.ipv4_cidr.is_some() {
            rule.ipv4_cidr.clone_from(&self.ipv4_cidr);
        }
        if self.ipv6_cidr.is_some() {
            rule.ipv6_cidr.clone_from(&self.ipv6_cidr);
        }
        if self.cloud_target_security_group_id.is_some() {
            rule.cloud_target_security_group_id
                .clone_from(&self.cloud_target_security_group_id);
        }
        if let Some(action) = &self.action {
            rule.action.clone_from(action);
        }
        if self.memo.is_some() {
            rule.memo.clone_from(&self.memo);
        }
    }
}

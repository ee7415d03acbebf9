// Copyright (c) 2025 - Cowboy AI, Inc.
//! HuaWei security group rules

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::dal::rule::rule_table_schema;
use crate::dal::{Row, StoreError, TableName};
use crate::domain::Vendor;
use crate::schema::{ColumnDescriptor, ColumnType, TableSchema};
use crate::validation::constraints::{
    ip_cidr, max_len, one_of, one_of_ignore_case, optional, port_spec, protocol, range,
};
use crate::validation::names::MEMO_MAX_LENGTH;
use crate::validation::{Validate, ValidationResult};

use super::{RuleShape, RuleUpdate, SecurityGroupRule};

const ETHERTYPES: &[&str] = &["IPv4", "IPv6"];
const PROTOCOLS: &[&str] = &["tcp", "udp", "icmp", "icmpv6"];
const ACTIONS: &[&str] = &["allow", "deny"];
const MIN_PRIORITY: i64 = 1;
const MAX_PRIORITY: i64 = 100;
const REMOTE_GROUP_ID_MAX_LENGTH: usize = 255;

const HUAWEI_RULE_COLUMNS: &[ColumnDescriptor] = &[
    ColumnDescriptor::same("memo", ColumnType::String),
    ColumnDescriptor::same("protocol", ColumnType::String),
    ColumnDescriptor::same("ethertype", ColumnType::String),
    ColumnDescriptor::same("cloud_remote_group_id", ColumnType::String),
    ColumnDescriptor::same("remote_ip_prefix", ColumnType::String),
    ColumnDescriptor::same("port", ColumnType::String),
    ColumnDescriptor::same("action", ColumnType::String),
    ColumnDescriptor::same("priority", ColumnType::Numeric),
];

static HUAWEI_RULE_SCHEMA: LazyLock<TableSchema> =
    LazyLock::new(|| rule_table_schema(HUAWEI_RULE_COLUMNS));

/// HuaWei rule
///
/// A `priority` of 0 leaves the cloud default in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuaWeiSecurityGroupRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethertype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_remote_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_ip_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default)]
    pub priority: i64,
}

fn validate_priority(priority: i64) -> ValidationResult {
    if priority == 0 {
        return Ok(());
    }
    range("priority", priority, MIN_PRIORITY, MAX_PRIORITY)
}

impl Validate for HuaWeiSecurityGroupRule {
    fn validate(&self) -> ValidationResult {
        optional(&self.memo, |m| max_len("memo", m, MEMO_MAX_LENGTH))?;
        optional(&self.protocol, |p| protocol("protocol", p, PROTOCOLS))?;
        optional(&self.ethertype, |e| one_of("ethertype", e, ETHERTYPES))?;
        optional(&self.cloud_remote_group_id, |id| {
            max_len("cloud_remote_group_id", id, REMOTE_GROUP_ID_MAX_LENGTH)
        })?;
        optional(&self.remote_ip_prefix, |c| ip_cidr("remote_ip_prefix", c))?;
        optional(&self.port, |p| port_spec("port", p, false))?;
        optional(&self.action, |a| one_of_ignore_case("action", a, ACTIONS))?;
        validate_priority(self.priority)
    }
}

impl RuleShape for HuaWeiSecurityGroupRule {
    const VENDOR: Vendor = Vendor::HuaWei;

    fn table_name() -> TableName {
        TableName::HuaWeiSecurityGroupRule
    }

    fn extension_columns() -> &'static [ColumnDescriptor] {
        HUAWEI_RULE_COLUMNS
    }

    fn table_schema() -> &'static TableSchema {
        &HUAWEI_RULE_SCHEMA
    }

    fn write_columns(&self, row: &mut Row) {
        row.set("memo", self.memo.clone());
        row.set("protocol", self.protocol.clone());
        row.set("ethertype", self.ethertype.clone());
        row.set("cloud_remote_group_id", self.cloud_remote_group_id.clone());
        row.set("remote_ip_prefix", self.remote_ip_prefix.clone());
        row.set("port", self.port.clone());
        row.set("action", self.action.clone());
        row.set("priority", self.priority);
    }

    fn read_columns(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            memo: row.opt_string("memo")?,
            protocol: row.opt_string("protocol")?,
            ethertype: row.opt_string("ethertype")?,
            cloud_remote_group_id: row.opt_string("cloud_remote_group_id")?,
            remote_ip_prefix: row.opt_string("remote_ip_prefix")?,
            port: row.opt_string("port")?,
            action: row.opt_string("action")?,
            priority: row.numeric("priority")?,
        })
    }

    fn into_rule(self) -> SecurityGroupRule {
        SecurityGroupRule::HuaWei(self)
    }
}

/// Partial update of a HuaWei rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuaWeiSGRuleUpdateReq {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethertype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_remote_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_ip_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

impl Validate for HuaWeiSGRuleUpdateReq {
    fn validate(&self) -> ValidationResult {
        optional(&self.memo, |m| max_len("memo", m, MEMO_MAX_LENGTH))?;
        optional(&self.protocol, |p| protocol("protocol", p, PROTOCOLS))?;
        optional(&self.ethertype, |e| one_of("ethertype", e, ETHERTYPES))?;
        optional(&self.cloud_remote_group_id, |id| {
            max_len("cloud_remote_group_id", id, REMOTE_GROUP_ID_MAX_LENGTH)
        })?;
        optional(&self.remote_ip_prefix, |c| ip_cidr("remote_ip_prefix", c))?;
        optional(&self.port, |p| port_spec("port", p, false))?;
        optional(&self.action, |a| one_of_ignore_case("action", a, ACTIONS))?;
        optional(&self.priority, |p| range("priority", *p, MIN_PRIORITY, MAX_PRIORITY))
    }
}

impl RuleUpdate for HuaWeiSGRuleUpdateReq {
    type Rule = HuaWeiSecurityGroupRule;

    fn apply(&self, rule: &mut HuaWeiSecurityGroupRule) {
        let fields = [
            (&self.memo, &mut rule.memo),
            (&self.protocol, &mut rule.protocol),
            (&self.ethertype, &mut rule.ethertype),
            (&self.cloud_remote_group_id, &mut rule.cloud_remote_group_id),
            (&self.remote_ip_prefix, &mut rule.remote_ip_prefix),
            (&self.port, &mut rule.port),
            (&self.action, &mut rule.action),
        ];
        for (update, current) in fields {
            if update.is_some() {
                current.clone_from(update);
            }
        }
        if let Some(priority) = self.priority {
            rule.priority = priority;
        }
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! AWS security group rules

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::dal::rule::rule_table_schema;
use crate::dal::{Row, StoreError, TableName};
use crate::domain::Vendor;
use crate::schema::{ColumnDescriptor, ColumnType, TableSchema};
use crate::validation::constraints::{ipv4_cidr, ipv6_cidr, max_len, optional, protocol, range};
use crate::validation::names::MEMO_MAX_LENGTH;
use crate::validation::{Validate, ValidationError, ValidationResult};

use super::{RuleShape, RuleUpdate, SecurityGroupRule};

/// Port value meaning "every port"
pub const ALL: i64 = -1;

/// Protocol value meaning "every protocol"
pub const ALL_PROTOCOLS: &str = "-1";

const PROTOCOLS: &[&str] = &["tcp", "udp", "icmp", "icmpv6"];
const MAX_PORT: i64 = 65535;
const TARGET_ID_MAX_LENGTH: usize = 255;

const AWS_RULE_COLUMNS: &[ColumnDescriptor] = &[
    ColumnDescriptor::same("ipv4_cidr", ColumnType::String),
    ColumnDescriptor::same("ipv6_cidr", ColumnType::String),
    ColumnDescriptor::same("memo", ColumnType::String),
    ColumnDescriptor::same("from_port", ColumnType::Numeric),
    ColumnDescriptor::same("to_port", ColumnType::Numeric),
    ColumnDescriptor::same("protocol", ColumnType::String),
    ColumnDescriptor::same("cloud_target_security_group_id", ColumnType::String),
];

static AWS_RULE_SCHEMA: LazyLock<TableSchema> =
    LazyLock::new(|| rule_table_schema(AWS_RULE_COLUMNS));

/// AWS rule
///
/// `from_port`/`to_port` of -1 mean every port; `protocol` of `-1` means
/// every protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsSecurityGroupRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default)]
    pub from_port: i64,
    #[serde(default)]
    pub to_port: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_target_security_group_id: Option<String>,
}

fn validate_protocol(value: &str) -> ValidationResult {
    if value == ALL_PROTOCOLS {
        return Ok(());
    }
    protocol("protocol", value, PROTOCOLS)
}

fn validate_port(field: &'static str, value: i64) -> ValidationResult {
    range(field, value, ALL, MAX_PORT)
}

impl Validate for AwsSecurityGroupRule {
    fn validate(&self) -> ValidationResult {
        optional(&self.ipv4_cidr, |c| ipv4_cidr("ipv4_cidr", c))?;
        optional(&self.ipv6_cidr, |c| ipv6_cidr("ipv6_cidr", c))?;
        optional(&self.memo, |m| max_len("memo", m, MEMO_MAX_LENGTH))?;
        validate_port("from_port", self.from_port)?;
        validate_port("to_port", self.to_port)?;

        if self.from_port != ALL && self.to_port != ALL && self.from_port > self.to_port {
            return Err(ValidationError::InvalidFormat {
                field: "to_port",
                reason: format!(
                    "from_port {} is greater than to_port {}",
                    self.from_port, self.to_port
                ),
            });
        }

        optional(&self.protocol, |p| validate_protocol(p))?;
        optional(&self.cloud_target_security_group_id, |id| {
            max_len("cloud_target_security_group_id", id, TARGET_ID_MAX_LENGTH)
        })
    }
}

impl RuleShape for AwsSecurityGroupRule {
    const VENDOR: Vendor = Vendor::Aws;

    fn table_name() -> TableName {
        TableName::AwsSecurityGroupRule
    }

    fn extension_columns() -> &'static [ColumnDescriptor] {
        AWS_RULE_COLUMNS
    }

    fn table_schema() -> &'static TableSchema {
        &AWS_RULE_SCHEMA
    }

    fn write_columns(&self, row: &mut Row) {
        row.set("ipv4_cidr", self.ipv4_cidr.clone());
        row.set("ipv6_cidr", self.ipv6_cidr.clone());
        row.set("memo", self.memo.clone());
        row.set("from_port", self.from_port);
        row.set("to_port", self.to_port);
        row.set("protocol", self.protocol.clone());
        row.set(
            "cloud_target_security_group_id",
            self.cloud_target_security_group_id.clone(),
        );
    }

    fn read_columns(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            ipv4_cidr: row.opt_string("ipv4_cidr")?,
            ipv6_cidr: row.opt_string("ipv6_cidr")?,
            memo: row.opt_string("memo")?,
            from_port: row.numeric("from_port")?,
            to_port: row.numeric("to_port")?,
            protocol: row.opt_string("protocol")?,
            cloud_target_security_group_id: row.opt_string("cloud_target_security_group_id")?,
        })
    }

    fn into_rule(self) -> SecurityGroupRule {
        SecurityGroupRule::Aws(self)
    }
}

/// Partial update of an AWS rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsSGRuleUpdateReq {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_port: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_port: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_target_security_group_id: Option<String>,
}

impl Validate for AwsSGRuleUpdateReq {
    fn validate(&self) -> ValidationResult {
        optional(&self.ipv4_cidr, |c| ipv4_cidr("ipv4_cidr", c))?;
        optional(&self.ipv6_cidr, |c| ipv6_cidr("ipv6_cidr", c))?;
        optional(&self.memo, |m| max_len("memo", m, MEMO_MAX_LENGTH))?;
        optional(&self.from_port, |p| validate_port("from_port", *p))?;
        optional(&self.to_port, |p| validate_port("to_port", *p))?;
        optional(&self.protocol, |p| validate_protocol(p))?;
        optional(&self.cloud_target_security_group_id, |id| {
            max_len("cloud_target_security_group_id", id, TARGET_ID_MAX_LENGTH)
        })
    }
}

impl RuleUpdate for AwsSGRuleUpdateReq {
    type Rule = AwsSecurityGroupRule;

    fn apply(&self, rule: &mut AwsSecurityGroupRule) {
        if self.ipv4_cidr.is_some() {
            rule.ipv4_cidr.clone_from(&self.ipv4_cidr);
        }
        if self.ipv6_cidr.is_some() {
            rule.ipv6_cidr.clone_from(&self.ipv6_cidr);
        }
        if self.memo.is_some() {
            rule.memo.clone_from(&self.memo);
        }
        if let Some(port) = self.from_port {
            rule.from_port = port;
        }
        if let Some(port) = self.to_port {
            rule.to_port = port;
        }
        if self.protocol.is_some() {
            rule.protocol.clone_from(&self.protocol);
        }
        if self.cloud_target_security_group_id.is_some() {
            rule.cloud_target_security_group_id
                .clone_from(&self.cloud_target_security_group_id);
        }
    }
}

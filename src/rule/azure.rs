// Copyright (c) 2025 - Cowboy AI, Inc.
//! Azure security group rules
//!
//! Addresses, ports and peer groups each come in a single and a list form,
//! mirroring the Azure network security rule resource. The rule direction
//! (`type`) is fixed at creation.

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::dal::rule::rule_table_schema;
use crate::dal::{Row, StoreError, TableName};
use crate::domain::{SecurityGroupRuleType, Vendor};
use crate::schema::{ColumnDescriptor, ColumnType, TableSchema, Value};
use crate::validation::constraints::{
    each, max_len, one_of, optional, range, required, wildcard_port_range,
};
use crate::validation::names::MEMO_MAX_LENGTH;
use crate::validation::{Validate, ValidationResult};

use super::{RuleShape, RuleUpdate, SecurityGroupRule};

const NAME_MAX_LENGTH: usize = 80;
const PREFIX_MAX_LENGTH: usize = 255;
const PROTOCOLS: &[&str] = &["*", "Tcp", "Udp", "Icmp", "Esp", "Ah"];
const ACCESS: &[&str] = &["Allow", "Deny"];
const MIN_PRIORITY: i64 = 100;
const MAX_PRIORITY: i64 = 4096;

const AZURE_RULE_COLUMNS: &[ColumnDescriptor] = &[
    ColumnDescriptor::same("name", ColumnType::String),
    ColumnDescriptor::same("memo", ColumnType::String),
    ColumnDescriptor::same("destination_address_prefix", ColumnType::String),
    ColumnDescriptor::same("destination_address_prefixes", ColumnType::Json),
    ColumnDescriptor::same("cloud_destination_security_group_ids", ColumnType::Json),
    ColumnDescriptor::same("destination_port_range", ColumnType::String),
    ColumnDescriptor::same("destination_port_ranges", ColumnType::Json),
    ColumnDescriptor::same("protocol", ColumnType::String),
    ColumnDescriptor::same("source_address_prefix", ColumnType::String),
    ColumnDescriptor::same("source_address_prefixes", ColumnType::Json),
    ColumnDescriptor::same("cloud_source_security_group_ids", ColumnType::Json),
    ColumnDescriptor::same("source_port_range", ColumnType::String),
    ColumnDescriptor::same("source_port_ranges", ColumnType::Json),
    ColumnDescriptor::same("priority", ColumnType::Numeric),
    ColumnDescriptor::same("access", ColumnType::String),
];

static AZURE_RULE_SCHEMA: LazyLock<TableSchema> =
    LazyLock::new(|| rule_table_schema(AZURE_RULE_COLUMNS));

/// Azure rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzureSecurityGroupRule {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_address_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destination_address_prefixes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cloud_destination_security_group_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_port_range: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destination_port_ranges: Vec<String>,
    #[serde(default)]
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_address_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_address_prefixes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cloud_source_security_group_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port_range: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_port_ranges: Vec<String>,
    #[serde(default)]
    pub priority: i64,
    /// Direction; must agree with the rule set it is created in
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<SecurityGroupRuleType>,
    #[serde(default)]
    pub access: String,
}

fn address_prefix(field: &'static str, prefix: &str) -> ValidationResult {
    required(field, prefix)?;
    max_len(field, prefix, PREFIX_MAX_LENGTH)
}

fn address_prefixes(field: &'static str, prefixes: &[String]) -> ValidationResult {
    each(prefixes, |p| address_prefix(field, p))
}

fn port_ranges(field: &'static str, ranges: &[String]) -> ValidationResult {
    each(ranges, |r| wildcard_port_range(field, r))
}

fn security_group_ids(field: &'static str, ids: &[String]) -> ValidationResult {
    each(ids, |id| address_prefix(field, id))
}

impl Validate for AzureSecurityGroupRule {
    fn validate(&self) -> ValidationResult {
        required("name", &self.name)?;
        max_len("name", &self.name, NAME_MAX_LENGTH)?;
        optional(&self.memo, |m| max_len("memo", m, MEMO_MAX_LENGTH))?;

        optional(&self.destination_address_prefix, |p| {
            address_prefix("destination_address_prefix", p)
        })?;
        address_prefixes("destination_address_prefixes", &self.destination_address_prefixes)?;
        security_group_ids(
            "cloud_destination_security_group_ids",
            &self.cloud_destination_security_group_ids,
        )?;
        optional(&self.destination_port_range, |r| {
            wildcard_port_range("destination_port_range", r)
        })?;
        port_ranges("destination_port_ranges", &self.destination_port_ranges)?;

        required("protocol", &self.protocol)?;
        one_of("protocol", &self.protocol, PROTOCOLS)?;

        optional(&self.source_address_prefix, |p| {
            address_prefix("source_address_prefix", p)
        })?;
        address_prefixes("source_address_prefixes", &self.source_address_prefixes)?;
        security_group_ids(
            "cloud_source_security_group_ids",
            &self.cloud_source_security_group_ids,
        )?;
        optional(&self.source_port_range, |r| {
            wildcard_port_range("source_port_range", r)
        })?;
        port_ranges("source_port_ranges", &self.source_port_ranges)?;

        range("priority", self.priority, MIN_PRIORITY, MAX_PRIORITY)?;
        required("access", &self.access)?;
        one_of("access", &self.access, ACCESS)
    }
}

fn list_value(values: &[String]) -> Value {
    if values.is_empty() {
        return Value::Null;
    }
    Value::Json(serde_json::Value::from(values.to_vec()))
}

impl RuleShape for AzureSecurityGroupRule {
    const VENDOR: Vendor = Vendor::Azure;

    fn table_name() -> TableName {
        TableName::AzureSecurityGroupRule
    }

    fn extension_columns() -> &'static [ColumnDescriptor] {
        AZURE_RULE_COLUMNS
    }

    fn table_schema() -> &'static TableSchema {
        &AZURE_RULE_SCHEMA
    }

    fn write_columns(&self, row: &mut Row) {
        row.set("name", self.name.as_str());
        row.set("memo", self.memo.clone());
        row.set(
            "destination_address_prefix",
            self.destination_address_prefix.clone(),
        );
        row.set(
            "destination_address_prefixes",
            list_value(&self.destination_address_prefixes),
        );
        row.set(
            "cloud_destination_security_group_ids",
            list_value(&self.cloud_destination_security_group_ids),
        );
        row.set("destination_port_range", self.destination_port_range.clone());
        row.set(
            "destination_port_ranges",
            list_value(&self.destination_port_ranges),
        );
        row.set("protocol", self.protocol.as_str());
        row.set("source_address_prefix", self.source_address_prefix.clone());
        row.set(
            "source_address_prefixes",
            list_value(&self.source_address_prefixes),
        );
        row.set(
            "cloud_source_security_group_ids",
            list_value(&self.cloud_source_security_group_ids),
        );
        row.set("source_port_range", self.source_port_range.clone());
        row.set("source_port_ranges", list_value(&self.source_port_ranges));
        row.set("priority", self.priority);
        row.set("access", self.access.as_str());
    }

    /// The direction lives in the common `type` column, not here
    fn read_columns(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            name: row.string("name")?,
            memo: row.opt_string("memo")?,
            destination_address_prefix: row.opt_string("destination_address_prefix")?,
            destination_address_prefixes: row.string_list("destination_address_prefixes")?,
            cloud_destination_security_group_ids: row
                .string_list("cloud_destination_security_group_ids")?,
            destination_port_range: row.opt_string("destination_port_range")?,
            destination_port_ranges: row.string_list("destination_port_ranges")?,
            protocol: row.string("protocol")?,
            source_address_prefix: row.opt_string("source_address_prefix")?,
            source_address_prefixes: row.string_list("source_address_prefixes")?,
            cloud_source_security_group_ids: row.string_list("cloud_source_security_group_ids")?,
            source_port_range: row.opt_string("source_port_range")?,
            source_port_ranges: row.string_list("source_port_ranges")?,
            priority: row.numeric("priority")?,
            rule_type: None,
            access: row.string("access")?,
        })
    }

    fn declared_type(&self) -> Option<SecurityGroupRuleType> {
        self.rule_type
    }

    fn into_rule(self) -> SecurityGroupRule {
        SecurityGroupRule::Azure(self)
    }
}

/// Partial update of an Azure rule
///
/// There is no `type` field: an Azure rule cannot change direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AzureSGRuleUpdateReq {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_address_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_address_prefixes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_destination_security_group_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_port_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_port_ranges: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_address_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_address_prefixes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_source_security_group_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port_ranges: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
}

impl Validate for AzureSGRuleUpdateReq {
    fn validate(&self) -> ValidationResult {
        optional(&self.name, |n| {
            required("name", n)?;
            max_len("name", n, NAME_MAX_LENGTH)
        })?;
        optional(&self.memo, |m| max_len("memo", m, MEMO_MAX_LENGTH))?;
        optional(&self.destination_address_prefix, |p| {
            address_prefix("destination_address_prefix", p)
        })?;
        optional(&self.destination_address_prefixes, |p| {
            address_prefixes("destination_address_prefixes", p)
        })?;
        optional(&self.cloud_destination_security_group_ids, |ids| {
            security_group_ids("cloud_destination_security_group_ids", ids)
        })?;
        optional(&self.destination_port_range, |r| {
            wildcard_port_range("destination_port_range", r)
        })?;
        optional(&self.destination_port_ranges, |r| {
            port_ranges("destination_port_ranges", r)
        })?;
        optional(&self.protocol, |p| one_of("protocol", p, PROTOCOLS))?;
        optional(&self.source_address_prefix, |p| {
            address_prefix("source_address_prefix", p)
        })?;
        optional(&self.source_address_prefixes, |p| {
            address_prefixes("source_address_prefixes", p)
        })?;
        optional(&self.cloud_source_security_group_ids, |ids| {
            security_group_ids("cloud_source_security_group_ids", ids)
        })?;
        optional(&self.source_port_range, |r| {
            wildcard_port_range("source_port_range", r)
        })?;
        optional(&self.source_port_ranges, |r| port_ranges("source_port_ranges", r))?;
        optional(&self.priority, |p| {
            range("priority", *p, MIN_PRIORITY, MAX_PRIORITY)
        })?;
        optional(&self.access, |a| one_of("access", a, ACCESS))
    }
}

fn overlay<T: Clone>(update: &Option<T>, current: &mut T) {
    if let Some(value) = update {
        current.clone_from(value);
    }
}

fn overlay_optional<T: Clone>(update: &Option<T>, current: &mut Option<T>) {
    if update.is_some() {
        current.clone_from(update);
    }
}

impl RuleUpdate for AzureSGRuleUpdateReq {
    type Rule = AzureSecurityGroupRule;

    fn apply(&self, rule: &mut AzureSecurityGroupRule) {
        overlay(&self.name, &mut rule.name);
        overlay_optional(&self.memo, &mut rule.memo);
        overlay_optional(
            &self.destination_address_prefix,
            &mut rule.destination_address_prefix,
        );
        overlay(
            &self.destination_address_prefixes,
            &mut rule.destination_address_prefixes,
        );
        overlay(
            &self.cloud_destination_security_group_ids,
            &mut rule.cloud_destination_security_group_ids,
        );
        overlay_optional(&self.destination_port_range, &mut rule.destination_port_range);
        overlay(&self.destination_port_ranges, &mut rule.destination_port_ranges);
        overlay(&self.protocol, &mut rule.protocol);
        overlay_optional(&self.source_address_prefix, &mut rule.source_address_prefix);
        overlay(&self.source_address_prefixes, &mut rule.source_address_prefixes);
        overlay(
            &self.cloud_source_security_group_ids,
            &mut rule.cloud_source_security_group_ids,
        );
        overlay_optional(&self.source_port_range, &mut rule.source_port_range);
        overlay(&self.source_port_ranges, &mut rule.source_port_ranges);
        overlay(&self.priority, &mut rule.priority);
        overlay(&self.access, &mut rule.access);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    fn rule() -> AzureSecurityGroupRule {
        AzureSecurityGroupRule {
            name: "allow-https".to_string(),
            source_address_prefix: Some("Internet".to_string()),
            destination_port_range: Some("443".to_string()),
            source_port_range: Some("*".to_string()),
            protocol: "Tcp".to_string(),
            priority: 300,
            access: "Allow".to_string(),
            ..AzureSecurityGroupRule::default()
        }
    }

    #[test]
    fn test_valid_rule() {
        assert!(rule().validate().is_ok());
    }

    #[test]
    fn test_name_and_protocol_required() {
        let mut r = rule();
        r.name.clear();
        assert_eq!(
            r.validate().unwrap_err(),
            ValidationError::Required { field: "name" }
        );

        let mut r = rule();
        r.protocol.clear();
        assert_eq!(
            r.validate().unwrap_err(),
            ValidationError::Required { field: "protocol" }
        );
    }

    #[test]
    fn test_name_ceiling() {
        let mut r = rule();
        r.name = "n".repeat(81);
        assert!(r.validate().is_err());
    }

    #[test_case(99, false ; "below")]
    #[test_case(100, true ; "lowest")]
    #[test_case(4096, true ; "highest")]
    #[test_case(4097, false ; "above")]
    fn test_priority(priority: i64, ok: bool) {
        let mut r = rule();
        r.priority = priority;
        assert_eq!(r.validate().is_ok(), ok);
    }

    #[test]
    fn test_protocol_and_access_are_case_sensitive() {
        let mut r = rule();
        r.protocol = "tcp".to_string();
        assert!(r.validate().is_err());

        let mut r = rule();
        r.access = "allow".to_string();
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_port_range_lists() {
        let mut r = rule();
        r.destination_port_ranges = vec!["80".to_string(), "8000-8100".to_string()];
        assert!(r.validate().is_ok());

        r.destination_port_ranges.push("80,443".to_string());
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_type_decodes_from_json() {
        let r: AzureSecurityGroupRule = serde_json::from_value(json!({
            "name": "deny-all", "protocol": "*", "priority": 4096,
            "access": "Deny", "type": "egress"
        }))
        .unwrap();
        assert_eq!(r.declared_type(), Some(SecurityGroupRuleType::Egress));
    }

    #[test]
    fn test_update_has_no_type() {
        let result: Result<AzureSGRuleUpdateReq, _> =
            serde_json::from_value(json!({"type": "ingress"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_apply() {
        let update = AzureSGRuleUpdateReq {
            priority: Some(200),
            source_address_prefixes: Some(vec!["10.0.0.0/8".to_string()]),
            ..AzureSGRuleUpdateReq::default()
        };
        assert!(update.validate().is_ok());

        let mut r = rule();
        update.apply(&mut r);
        assert_eq!(r.priority, 200);
        assert_eq!(r.source_address_prefixes, vec!["10.0.0.0/8".to_string()]);
        assert_eq!(r.name, "allow-https");
    }

    #[test]
    fn test_list_columns_round_trip_through_row() {
        let mut r = rule();
        r.cloud_source_security_group_ids = vec!["/subscriptions/x/asg/web".to_string()];
        let mut row = Row::new();
        r.write_columns(&mut row);
        assert_eq!(AzureSecurityGroupRule::read_columns(&row).unwrap(), r);
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Request Validation Tests
//!
//! Decodes request bodies the way they arrive over the wire and checks the
//! verdict of each validator. `None` means the request is accepted.

mod fixtures;

use fixtures::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

use cloud_inventory::request::{
    AssignSecurityGroupToBizReq, SecurityGroupBatchDeleteReq, SecurityGroupListReq,
    SecurityGroupRuleListReq, SecurityGroupUpdateReq, VendorRuleCreateReq, VendorRuleUpdateReq,
};
use cloud_inventory::rule::RuleDecodeError;
use cloud_inventory::validation::ErrorKind;
use cloud_inventory::{Validate, ValidationResult, Vendor};

fn verdict(result: ValidationResult) -> Option<ErrorKind> {
    result.err().map(|err| err.kind())
}

fn create_verdict(vendor: Vendor, body: Value) -> Option<ErrorKind> {
    let req = VendorRuleCreateReq::decode(vendor, body).expect("body should decode");
    assert_eq!(req.vendor(), vendor);
    verdict(req.validate())
}

fn update_verdict(vendor: Vendor, body: Value) -> Option<ErrorKind> {
    let req = VendorRuleUpdateReq::decode(vendor, body).expect("body should decode");
    verdict(req.validate())
}

// ============================================================================
// Rule Create Requests
// ============================================================================

#[test_case(Vendor::TCloud, json!({"ingress_rule_set": [{"protocol": "tcp", "port": "8080-8090", "ipv4_cidr": "10.0.0.0/8", "action": "accept"}]}), None ; "tcloud port range")]
#[test_case(Vendor::TCloud, json!({"egress_rule_set": [{"port": "22", "action": "REJECT"}]}), Some(ErrorKind::Structural) ; "tcloud unknown action")]
#[test_case(Vendor::TCloud, json!({"egress_rule_set": [{"port": "22"}]}), Some(ErrorKind::Structural) ; "tcloud missing action")]
#[test_case(Vendor::Aws, json!({"ingress_rule_set": [{"protocol": "-1", "from_port": -1, "to_port": -1, "ipv4_cidr": "0.0.0.0/0"}]}), None ; "aws all traffic")]
#[test_case(Vendor::Aws, json!({"ingress_rule_set": [{"protocol": "6", "from_port": 22, "to_port": 22}]}), None ; "aws numeric protocol")]
#[test_case(Vendor::Aws, json!({"ingress_rule_set": [{"protocol": "tcp", "from_port": 65536, "to_port": 65536}]}), Some(ErrorKind::Structural) ; "aws port above range")]
#[test_case(Vendor::HuaWei, json!({"egress_rule_set": [{"ethertype": "IPv6", "remote_ip_prefix": "::/0", "action": "deny", "priority": 0}]}), None ; "huawei cloud default priority")]
#[test_case(Vendor::HuaWei, json!({"egress_rule_set": [{"ethertype": "ipv4", "priority": 1}]}), Some(ErrorKind::Structural) ; "huawei ethertype is case sensitive")]
#[test_case(Vendor::HuaWei, json!({"egress_rule_set": [{"port": "ALL", "priority": 1}]}), Some(ErrorKind::Structural) ; "huawei has no ALL port")]
#[test_case(Vendor::Azure, json!({"ingress_rule_set": [{"name": "allow-web", "protocol": "*", "priority": 4096, "access": "Allow", "destination_port_ranges": ["80", "443", "8000-8100"]}]}), None ; "azure port ranges")]
#[test_case(Vendor::Azure, json!({"ingress_rule_set": [{"name": "allow-web", "protocol": "Tcp", "priority": 99, "access": "Allow"}]}), Some(ErrorKind::Structural) ; "azure priority below range")]
#[test_case(Vendor::Azure, json!({"ingress_rule_set": [{"protocol": "Tcp", "priority": 100, "access": "Allow"}]}), Some(ErrorKind::Structural) ; "azure missing name")]
fn test_create_rule_bodies(vendor: Vendor, body: Value, expected: Option<ErrorKind>) {
    assert_eq!(create_verdict(vendor, body), expected);
}

#[test_case(json!({}), "egress rule or ingress rule is required" ; "no sets")]
#[test_case(json!({"egress_rule_set": [], "ingress_rule_set": []}), "egress rule or ingress rule is required" ; "empty sets")]
#[test_case(json!({"egress_rule_set": [{"action": "ACCEPT"}], "ingress_rule_set": [{"action": "ACCEPT"}]}), "egress rule or ingress rule only one is allowed" ; "both sets")]
fn test_create_envelope_cardinality(body: Value, message: &str) {
    let req = VendorRuleCreateReq::decode(Vendor::TCloud, body).unwrap();
    let err = req.validate().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BusinessRule);
    assert_eq!(err.to_string(), message);
}

#[test]
fn test_envelope_is_checked_before_rules() {
    let body = json!({
        "egress_rule_set": [{"action": "nope"}],
        "ingress_rule_set": [{"action": "nope"}],
    });
    let err = VendorRuleCreateReq::decode(Vendor::TCloud, body)
        .unwrap()
        .validate()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BusinessRule);
}

#[test]
fn test_gcp_rules_are_unsupported() {
    let err = VendorRuleCreateReq::decode(Vendor::Gcp, json!({})).unwrap_err();
    assert!(matches!(err, RuleDecodeError::Unsupported(Vendor::Gcp)));

    let err = VendorRuleUpdateReq::decode(Vendor::Gcp, json!({})).unwrap_err();
    assert!(matches!(err, RuleDecodeError::Unsupported(Vendor::Gcp)));
}

#[test]
fn test_fixture_rules_are_valid() {
    let rules = [
        cloud_inventory::SecurityGroupRule::from(tcloud_ssh_rule()),
        tcloud_drop_all_rule().into(),
        aws_https_rule().into(),
        huawei_mysql_rule().into(),
        azure_rdp_rule(None).into(),
    ];
    for rule in &rules {
        assert_eq!(rule.validate(), Ok(()), "{rule:?}");
    }
}

// ============================================================================
// Rule Update Requests
// ============================================================================

#[test_case(Vendor::TCloud, json!({}), None ; "tcloud empty update")]
#[test_case(Vendor::TCloud, json!({"action": "drop", "port": "ALL"}), None ; "tcloud action and port")]
#[test_case(Vendor::Aws, json!({"to_port": -2}), Some(ErrorKind::Structural) ; "aws port below range")]
#[test_case(Vendor::HuaWei, json!({"priority": 100}), None ; "huawei top priority")]
#[test_case(Vendor::HuaWei, json!({"priority": 0}), Some(ErrorKind::Structural) ; "huawei update cannot reset priority")]
#[test_case(Vendor::Azure, json!({"access": "Deny", "priority": 200}), None ; "azure access and priority")]
#[test_case(Vendor::Azure, json!({"protocol": "Gre"}), Some(ErrorKind::Structural) ; "azure unknown protocol")]
fn test_update_rule_bodies(vendor: Vendor, body: Value, expected: Option<ErrorKind>) {
    assert_eq!(update_verdict(vendor, body), expected);
}

#[test]
fn test_azure_update_cannot_change_direction() {
    let err = VendorRuleUpdateReq::decode(Vendor::Azure, json!({"type": "egress"})).unwrap_err();
    assert!(matches!(err, RuleDecodeError::Json(_)));
}

// ============================================================================
// Security Group Requests
// ============================================================================

#[test_case(json!({"filter": {"op": "and", "rules": []}, "page": {"count": true}}), None ; "count page")]
#[test_case(json!({"filter": {"op": "and", "rules": []}, "page": {"limit": 500}}), None ; "max page")]
#[test_case(json!({"filter": {"op": "and", "rules": []}, "page": {"limit": 501}}), Some(ErrorKind::Structural) ; "page too large")]
#[test_case(json!({"page": {"limit": 10}}), Some(ErrorKind::Structural) ; "missing filter")]
#[test_case(json!({"filter": {"op": "and", "rules": []}}), Some(ErrorKind::Structural) ; "missing page")]
fn test_list_bodies(body: Value, expected: Option<ErrorKind>) {
    let req: SecurityGroupListReq = serde_json::from_value(body).unwrap();
    assert_eq!(verdict(req.validate()), expected);
}

#[test_case(json!({"page": {"count": false, "start": 0, "limit": 10}}), None ; "page given")]
#[test_case(json!({"page": {"count": false, "start": 0, "limit": 0}}), Some(ErrorKind::Structural) ; "page without limit")]
#[test_case(json!({"page": {"count": false, "start": 0, "limit": 501}}), Some(ErrorKind::Structural) ; "rule page too large")]
#[test_case(json!({}), Some(ErrorKind::Structural) ; "page missing")]
#[test_case(json!({"page": null}), Some(ErrorKind::Structural) ; "page null")]
fn test_list_rule_bodies(body: Value, expected: Option<ErrorKind>) {
    let req: SecurityGroupRuleListReq = serde_json::from_value(body).unwrap();
    assert_eq!(verdict(req.validate()), expected);
}

#[test_case(json!({"name": "web"}), None ; "name only")]
#[test_case(json!({"memo": ""}), None ; "empty memo is a change")]
#[test_case(json!({"name": ""}), Some(ErrorKind::BusinessRule) ; "empty name is absent")]
#[test_case(json!({"name": null, "memo": null}), Some(ErrorKind::BusinessRule) ; "nulls are absent")]
#[test_case(json!({"name": "bad name"}), Some(ErrorKind::Structural) ; "name with space")]
fn test_update_bodies(body: Value, expected: Option<ErrorKind>) {
    let req: SecurityGroupUpdateReq = serde_json::from_value(body).unwrap();
    assert_eq!(verdict(req.validate()), expected);
}

#[test_case(BIZ_ID, 1, None ; "one group")]
#[test_case(BIZ_ID, 100, None ; "at limit")]
#[test_case(BIZ_ID, 101, Some("security group ids should <= 100") ; "over limit")]
#[test_case(BIZ_ID, 0, Some("security group ids is required") ; "no groups")]
#[test_case(-1, 1, Some("bk_biz_id should >= 0") ; "unassigned biz")]
fn test_assign_bodies(bk_biz_id: i64, groups: usize, expected: Option<&str>) {
    let req = AssignSecurityGroupToBizReq {
        bk_biz_id,
        security_group_ids: (0..groups).map(|i| format!("{i:08}")).collect(),
    };
    assert_eq!(req.validate().err().map(|e| e.to_string()).as_deref(), expected);
}

#[test]
fn test_batch_delete_rejects_blank_id() {
    let req: SecurityGroupBatchDeleteReq =
        serde_json::from_value(json!({"ids": ["00000001", ""]})).unwrap();
    assert_eq!(verdict(req.validate()), Some(ErrorKind::Structural));
}

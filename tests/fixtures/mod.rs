// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cloud-inventory
//!
//! Deterministic security groups, rules and caller contexts. Correlation ids
//! are fixed constants; only the row store generates ids and timestamps.
#![allow(dead_code)]

use uuid::Uuid;

use cloud_inventory::dal::{SecurityGroupTable, UNASSIGNED_BIZ_ID};
use cloud_inventory::domain::{SecurityGroupRuleType, Vendor};
use cloud_inventory::query::PageWithoutSort;
use cloud_inventory::request::SecurityGroupRuleListReq;
use cloud_inventory::rule::{
    AwsSecurityGroupRule, AzureSecurityGroupRule, HuaWeiSecurityGroupRule,
    TCloudSecurityGroupRule,
};
use cloud_inventory::service::Kit;

pub const CORRELATION_ID_1: &str = "01934f4a-c001-7000-8000-00000000c001";
pub const CORRELATION_ID_2: &str = "01934f4a-c002-7000-8000-00000000c002";

pub const ADMIN: &str = "admin";
pub const OPERATOR: &str = "ops";

pub const ACCOUNT_ID: &str = "acc-00000001";
pub const BIZ_ID: i64 = 2005;

/// Parse a fixed UUID from a constant string
pub fn parse_uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).expect("Invalid UUID in test fixture")
}

pub fn admin_kit() -> Kit {
    Kit::with_correlation_id(ADMIN, parse_uuid(CORRELATION_ID_1))
}

pub fn operator_kit() -> Kit {
    Kit::with_correlation_id(OPERATOR, parse_uuid(CORRELATION_ID_2))
}

/// Unassigned security group of `vendor`, ready to be created
pub fn security_group_fixture(vendor: Vendor, name: &str) -> SecurityGroupTable {
    let (cloud_id, region) = match vendor {
        Vendor::TCloud => (format!("sg-{name}"), "ap-guangzhou"),
        Vendor::Aws => (format!("sg-0a1b2c3d{name}"), "us-east-1"),
        Vendor::HuaWei => (format!("hw-{name}"), "cn-north-4"),
        Vendor::Azure => (format!("/nsg/{name}"), "eastasia"),
        Vendor::Gcp => (format!("fw-{name}"), "asia-east1"),
    };

    SecurityGroupTable {
        vendor: Some(vendor),
        cloud_id,
        bk_biz_id: UNASSIGNED_BIZ_ID,
        region: region.to_string(),
        name: name.to_string(),
        memo: None,
        account_id: ACCOUNT_ID.to_string(),
        ..SecurityGroupTable::default()
    }
}

pub fn tcloud_ssh_rule() -> TCloudSecurityGroupRule {
    TCloudSecurityGroupRule {
        protocol: Some("tcp".to_string()),
        port: Some("22".to_string()),
        ipv4_cidr: Some("10.0.0.0/8".to_string()),
        action: "ACCEPT".to_string(),
        memo: Some("ssh from office".to_string()),
        ..TCloudSecurityGroupRule::default()
    }
}

pub fn tcloud_drop_all_rule() -> TCloudSecurityGroupRule {
    TCloudSecurityGroupRule {
        protocol: Some("all".to_string()),
        port: Some("ALL".to_string()),
        ipv6_cidr: Some("::/0".to_string()),
        action: "DROP".to_string(),
        ..TCloudSecurityGroupRule::default()
    }
}

pub fn aws_https_rule() -> AwsSecurityGroupRule {
    AwsSecurityGroupRule {
        ipv4_cidr: Some("0.0.0.0/0".to_string()),
        from_port: 443,
        to_port: 443,
        protocol: Some("tcp".to_string()),
        ..AwsSecurityGroupRule::default()
    }
}

pub fn huawei_mysql_rule() -> HuaWeiSecurityGroupRule {
    HuaWeiSecurityGroupRule {
        protocol: Some("tcp".to_string()),
        ethertype: Some("IPv4".to_string()),
        remote_ip_prefix: Some("192.168.0.0/16".to_string()),
        port: Some("3306".to_string()),
        action: Some("allow".to_string()),
        priority: 1,
        ..HuaWeiSecurityGroupRule::default()
    }
}

pub fn azure_rdp_rule(rule_type: Option<SecurityGroupRuleType>) -> AzureSecurityGroupRule {
    AzureSecurityGroupRule {
        name: "deny-rdp".to_string(),
        destination_port_range: Some("3389".to_string()),
        source_port_range: Some("*".to_string()),
        source_address_prefix: Some("Internet".to_string()),
        protocol: "Tcp".to_string(),
        priority: 110,
        rule_type,
        access: "Deny".to_string(),
        ..AzureSecurityGroupRule::default()
    }
}

/// First page of rules, large enough for every fixture
pub fn all_rules() -> SecurityGroupRuleListReq {
    SecurityGroupRuleListReq {
        page: Some(PageWithoutSort {
            count: false,
            start: 0,
            limit: 100,
        }),
    }
}

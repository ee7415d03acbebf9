// Copyright (c) 2025 - Cowboy AI, Inc.
//! Request Properties
//!
//! For all request shapes:
//! - a rule create request is valid only with exactly one non-empty set
//! - batch operations accept at most 100 ids
//! - a rejected create leaves the row store untouched

use proptest::prelude::*;

use cloud_inventory::dal::{InMemoryRowStore, TableName};
use cloud_inventory::domain::Vendor;
use cloud_inventory::request::{
    AssignSecurityGroupToBizReq, SecurityGroupBatchDeleteReq, SecurityGroupRuleCreateReq,
    BATCH_OPERATION_MAX_LIMIT,
};
use cloud_inventory::rule::TCloudSecurityGroupRule;
use cloud_inventory::{SecurityGroupService, Validate};

use crate::fixtures::*;

// ============================================================================
// Strategies
// ============================================================================

fn tcloud_rules(max: usize) -> impl Strategy<Value = Vec<TCloudSecurityGroupRule>> {
    prop::collection::vec(
        prop_oneof![Just(tcloud_ssh_rule()), Just(tcloud_drop_all_rule())],
        0..max,
    )
}

fn ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{i:08}")).collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_exactly_one_rule_set(egress in tcloud_rules(4), ingress in tcloud_rules(4)) {
        let one_set = egress.is_empty() != ingress.is_empty();
        let req = SecurityGroupRuleCreateReq {
            egress_rule_set: egress,
            ingress_rule_set: ingress,
        };

        prop_assert_eq!(req.validate().is_ok(), one_set);
        prop_assert_eq!(req.rule_type().is_some(), one_set);
    }

    #[test]
    fn prop_batch_limit(count in 1usize..=150) {
        let within = count <= BATCH_OPERATION_MAX_LIMIT;

        let delete = SecurityGroupBatchDeleteReq { ids: ids(count) };
        prop_assert_eq!(delete.validate().is_ok(), within);

        let assign = AssignSecurityGroupToBizReq {
            bk_biz_id: BIZ_ID,
            security_group_ids: ids(count),
        };
        prop_assert_eq!(assign.validate().is_ok(), within);
    }

    #[test]
    fn prop_rejected_create_writes_nothing(
        egress in tcloud_rules(3),
        ingress in tcloud_rules(3),
        broken in any::<bool>(),
    ) {
        let service = SecurityGroupService::new(InMemoryRowStore::new());
        let kit = admin_kit();

        let mut req = SecurityGroupRuleCreateReq {
            egress_rule_set: egress,
            ingress_rule_set: ingress,
        };
        if broken {
            let set = if req.egress_rule_set.is_empty() {
                &mut req.ingress_rule_set
            } else {
                &mut req.egress_rule_set
            };
            set.push(TCloudSecurityGroupRule {
                action: "REJECT".to_string(),
                ..tcloud_ssh_rule()
            });
        }
        let accepted = req.validate().is_ok() && !broken;
        let submitted = req.rules().len();

        let written = tokio_test::block_on(async {
            let sg = service
                .create_security_group(&kit, security_group_fixture(Vendor::TCloud, "prop"))
                .await
                .unwrap();
            let result = service.create_rules(&kit, &sg, req).await;
            prop_assert_eq!(result.is_ok(), accepted);
            Ok(service.store().row_count(TableName::TCloudSecurityGroupRule).await)
        })?;

        let expected = if accepted { submitted } else { 0 };
        prop_assert_eq!(written, expected);
    }
}

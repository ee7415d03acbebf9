// Copyright (c) 2025 - Cowboy AI, Inc.
//! Security Group Service
//!
//! # Call Pattern
//!
//! ```text
//! Request → validate → load security group → vendor check
//!         → build Table rows → insert_validate/update_validate → RowStore
//! ```
//!
//! Every step before the store call is fallible and aborts the call, so a
//! rejected request never writes anything.

use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::config::InventoryConfig;
use crate::dal::{
    RowStore, SecurityGroupRuleTable, SecurityGroupTable, StoreError, Table, TableName,
    SECURITY_GROUP_SCHEMA, UNASSIGNED_BIZ_ID,
};
use crate::domain::Vendor;
use crate::errors::{InventoryError, InventoryResult};
use crate::query::{AtomRule, BasePage, Expression, FieldOp};
use crate::request::{
    AssignSecurityGroupToBizReq, SecurityGroupBatchDeleteReq, SecurityGroupListReq,
    SecurityGroupListResult, SecurityGroupRuleCreateReq, SecurityGroupRuleListReq,
    SecurityGroupRuleListResult, SecurityGroupUpdateReq,
};
use crate::rule::{
    AwsSecurityGroupRule, AzureSecurityGroupRule, HuaWeiSecurityGroupRule, RuleShape, RuleUpdate,
    TCloudSecurityGroupRule,
};
use crate::validation::{Validate, ValidationError, ValidationResult};

use super::Kit;

const SECURITY_GROUP: &str = "security group";
const SECURITY_GROUP_RULE: &str = "security group rule";

/// Security group operations over a [`RowStore`]
pub struct SecurityGroupService<S> {
    store: S,
    config: InventoryConfig,
}

impl<S: RowStore> SecurityGroupService<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, InventoryConfig::default())
    }

    pub fn with_config(store: S, config: InventoryConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    /// List security groups matching the request filter
    pub async fn list_security_groups(
        &self,
        kit: &Kit,
        req: &SecurityGroupListReq,
    ) -> InventoryResult<SecurityGroupListResult> {
        check(kit, req.validate_with(self.config.max_page_limit))?;
        let (Some(filter), Some(page)) = (&req.filter, &req.page) else {
            return Err(ValidationError::Required { field: "filter" }.into());
        };

        let listed = self
            .store
            .list(TableName::SecurityGroup, &SECURITY_GROUP_SCHEMA, filter, page)
            .await?;

        let details = listed
            .rows
            .iter()
            .map(SecurityGroupTable::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            correlation_id = %kit.correlation_id,
            returned = details.len(),
            "Listed security groups"
        );

        Ok(SecurityGroupListResult {
            count: listed.count,
            details,
        })
    }

    /// Fetch one security group
    pub async fn get_security_group(&self, id: &str) -> InventoryResult<SecurityGroupTable> {
        let mut found = self.load_security_groups(&[id.to_string()]).await?;
        found.pop().ok_or_else(|| not_found(SECURITY_GROUP, id))
    }

    /// Record a security group discovered at a cloud, returning its id
    ///
    /// `creator` and `reviser` are taken from the caller.
    pub async fn create_security_group(
        &self,
        kit: &Kit,
        mut security_group: SecurityGroupTable,
    ) -> InventoryResult<String> {
        security_group.creator.clone_from(&kit.user);
        security_group.reviser.clone_from(&kit.user);
        check(kit, security_group.insert_validate())?;

        let mut ids = self
            .store
            .insert(
                SecurityGroupTable::table_name(),
                SecurityGroupTable::schema(),
                vec![security_group.to_row()],
            )
            .await?;

        let id = ids
            .pop()
            .ok_or_else(|| StoreError::Backend("insert returned no id".to_string()))?;

        info!(correlation_id = %kit.correlation_id, id = %id, "Created security group");
        Ok(id)
    }

    /// Change name and/or memo of a security group
    pub async fn update_security_group(
        &self,
        kit: &Kit,
        id: &str,
        req: &SecurityGroupUpdateReq,
    ) -> InventoryResult<()> {
        check(kit, req.validate())?;
        let current = self.get_security_group(id).await?;

        let update = SecurityGroupTable {
            vendor: current.vendor,
            name: req.name().unwrap_or_default().to_string(),
            memo: req.memo.clone(),
            reviser: kit.user.clone(),
            ..SecurityGroupTable::default()
        };
        check(kit, update.update_validate())?;

        self.store
            .update(
                SecurityGroupTable::table_name(),
                SecurityGroupTable::schema(),
                &Expression::equal("id", id),
                update.to_update_row(),
            )
            .await?;

        info!(correlation_id = %kit.correlation_id, id = %id, "Updated security group");
        Ok(())
    }

    /// Assign unassigned security groups to a business, returning the count
    pub async fn assign_to_biz(
        &self,
        kit: &Kit,
        req: &AssignSecurityGroupToBizReq,
    ) -> InventoryResult<u64> {
        check(kit, req.validate())?;
        let groups = self.require_security_groups(&req.security_group_ids).await?;

        for group in &groups {
            if group.bk_biz_id != UNASSIGNED_BIZ_ID {
                return Err(rejected(
                    kit,
                    ValidationError::business(format!(
                        "security group {} already assigned to biz {}",
                        group.id, group.bk_biz_id
                    )),
                ));
            }

            let update = SecurityGroupTable {
                vendor: group.vendor,
                bk_biz_id: req.bk_biz_id,
                reviser: kit.user.clone(),
                ..SecurityGroupTable::default()
            };
            check(kit, update.update_validate())?;
        }

        let values = SecurityGroupTable {
            bk_biz_id: req.bk_biz_id,
            reviser: kit.user.clone(),
            ..SecurityGroupTable::default()
        }
        .to_update_row();

        // Only rows still unassigned at write time are moved
        let filter = Expression::in_values("id", req.security_group_ids.iter().cloned()).with(
            AtomRule::new("bk_biz_id", FieldOp::Eq, UNASSIGNED_BIZ_ID),
        );
        let affected = self
            .store
            .update(
                SecurityGroupTable::table_name(),
                SecurityGroupTable::schema(),
                &filter,
                values,
            )
            .await?;

        let expected = groups.len() as u64;
        if affected != expected {
            return Err(rejected(
                kit,
                ValidationError::business(format!(
                    "security groups were assigned concurrently, {affected} of {expected} assigned to biz {}",
                    req.bk_biz_id
                )),
            ));
        }

        info!(
            correlation_id = %kit.correlation_id,
            bk_biz_id = req.bk_biz_id,
            affected,
            "Assigned security groups"
        );
        Ok(affected)
    }

    /// Delete security groups and their rules, returning the groups deleted
    pub async fn batch_delete(
        &self,
        kit: &Kit,
        req: &SecurityGroupBatchDeleteReq,
    ) -> InventoryResult<u64> {
        check(kit, req.validate())?;
        let groups = self.require_security_groups(&req.ids).await?;

        let vendors: HashSet<Vendor> = groups.iter().filter_map(|g| g.vendor).collect();
        for vendor in vendors {
            let ids: Vec<String> = groups
                .iter()
                .filter(|g| g.vendor == Some(vendor))
                .map(|g| g.id.clone())
                .collect();
            let removed = self.delete_rules_of(vendor, &ids).await?;
            debug!(
                correlation_id = %kit.correlation_id,
                vendor = %vendor,
                removed,
                "Deleted security group rules"
            );
        }

        let deleted = self
            .store
            .delete(
                SecurityGroupTable::table_name(),
                SecurityGroupTable::schema(),
                &Expression::in_values("id", req.ids.iter().cloned()),
            )
            .await?;

        info!(correlation_id = %kit.correlation_id, deleted, "Deleted security groups");
        Ok(deleted)
    }

    /// List the rules of one security group
    pub async fn list_rules<R: RuleShape>(
        &self,
        kit: &Kit,
        security_group_id: &str,
        req: &SecurityGroupRuleListReq,
    ) -> InventoryResult<SecurityGroupRuleListResult<R>> {
        check(kit, req.validate_with(self.config.max_page_limit))?;
        let group = self.get_security_group(security_group_id).await?;
        check(kit, vendor_matches::<R>(&group))?;

        let page: BasePage = req.page.unwrap_or_default().into();
        let listed = self
            .store
            .list(
                R::table_name(),
                R::table_schema(),
                &Expression::equal("security_group_id", security_group_id),
                &page,
            )
            .await?;

        let details = listed
            .rows
            .iter()
            .map(SecurityGroupRuleTable::<R>::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SecurityGroupRuleListResult {
            count: listed.count,
            details,
        })
    }

    /// Create rules in one direction, returning their ids in request order
    pub async fn create_rules<R: RuleShape>(
        &self,
        kit: &Kit,
        security_group_id: &str,
        req: SecurityGroupRuleCreateReq<R>,
    ) -> InventoryResult<Vec<String>> {
        check(kit, req.validate())?;
        check(kit, req.rules().validate())?;
        let Some(rule_type) = req.rule_type() else {
            return Err(ValidationError::business("egress rule or ingress rule is required").into());
        };

        let group = self.get_security_group(security_group_id).await?;
        check(kit, vendor_matches::<R>(&group))?;

        let tables: Vec<SecurityGroupRuleTable<R>> = req
            .into_rules()
            .into_iter()
            .map(|spec| SecurityGroupRuleTable {
                security_group_id: group.id.clone(),
                cloud_security_group_id: group.cloud_id.clone(),
                account_id: group.account_id.clone(),
                region: group.region.clone(),
                rule_type: Some(rule_type),
                spec,
                creator: kit.user.clone(),
                reviser: kit.user.clone(),
                ..SecurityGroupRuleTable::default()
            })
            .collect();

        for table in &tables {
            check(kit, table.insert_validate())?;
        }

        let ids = self
            .store
            .insert(
                R::table_name(),
                R::table_schema(),
                tables.iter().map(Table::to_row).collect(),
            )
            .await?;

        info!(
            correlation_id = %kit.correlation_id,
            vendor = %R::VENDOR,
            security_group_id = %security_group_id,
            rule_type = %rule_type,
            count = ids.len(),
            "Created security group rules"
        );
        Ok(ids)
    }

    /// Apply a partial update to one rule of a security group
    pub async fn update_rule<U: RuleUpdate>(
        &self,
        kit: &Kit,
        security_group_id: &str,
        rule_id: &str,
        req: &U,
    ) -> InventoryResult<()> {
        check(kit, req.validate())?;
        let group = self.get_security_group(security_group_id).await?;
        check(kit, vendor_matches::<U::Rule>(&group))?;

        let filter = Expression::equal("id", rule_id).with(AtomRule::new(
            "security_group_id",
            FieldOp::Eq,
            security_group_id,
        ));
        let listed = self
            .store
            .list(
                U::Rule::table_name(),
                U::Rule::table_schema(),
                &filter,
                &BasePage::new(0, 1),
            )
            .await?;
        let Some(row) = listed.rows.first() else {
            return Err(not_found(SECURITY_GROUP_RULE, rule_id));
        };
        let current = SecurityGroupRuleTable::<U::Rule>::from_row(row)?;

        let mut spec = current.spec;
        req.apply(&mut spec);

        let update = SecurityGroupRuleTable {
            rule_type: current.rule_type,
            spec,
            reviser: kit.user.clone(),
            ..SecurityGroupRuleTable::default()
        };
        check(kit, update.update_validate())?;

        self.store
            .update(
                U::Rule::table_name(),
                U::Rule::table_schema(),
                &filter,
                update.to_update_row(),
            )
            .await?;

        info!(
            correlation_id = %kit.correlation_id,
            vendor = %U::Rule::VENDOR,
            rule_id = %rule_id,
            "Updated security group rule"
        );
        Ok(())
    }

    async fn load_security_groups(&self, ids: &[String]) -> InventoryResult<Vec<SecurityGroupTable>> {
        let mut seen = HashSet::new();
        let ids: Vec<&String> = ids.iter().filter(|id| seen.insert(*id)).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        // Each chunk fits in one page under the store's ceiling
        let chunk = ids.len().min(self.config.max_page_limit.max(1) as usize);
        let mut groups = Vec::with_capacity(ids.len());

        for batch in ids.chunks(chunk) {
            let limit = u32::try_from(batch.len()).unwrap_or(u32::MAX);
            let listed = self
                .store
                .list(
                    SecurityGroupTable::table_name(),
                    SecurityGroupTable::schema(),
                    &Expression::in_values("id", batch.iter().map(|id| id.as_str())),
                    &BasePage::new(0, limit),
                )
                .await?;

            for row in &listed.rows {
                groups.push(SecurityGroupTable::from_row(row)?);
            }
        }

        Ok(groups)
    }

    /// Load every id or fail on the first one missing
    async fn require_security_groups(
        &self,
        ids: &[String],
    ) -> InventoryResult<Vec<SecurityGroupTable>> {
        let groups = self.load_security_groups(ids).await?;
        let found: HashSet<&str> = groups.iter().map(|g| g.id.as_str()).collect();
        if let Some(missing) = ids.iter().find(|id| !found.contains(id.as_str())) {
            return Err(not_found(SECURITY_GROUP, missing));
        }
        Ok(groups)
    }

    async fn delete_rules_of(&self, vendor: Vendor, security_group_ids: &[String]) -> InventoryResult<u64> {
        match vendor {
            Vendor::TCloud => self.delete_rules::<TCloudSecurityGroupRule>(security_group_ids).await,
            Vendor::Aws => self.delete_rules::<AwsSecurityGroupRule>(security_group_ids).await,
            Vendor::HuaWei => self.delete_rules::<HuaWeiSecurityGroupRule>(security_group_ids).await,
            Vendor::Azure => self.delete_rules::<AzureSecurityGroupRule>(security_group_ids).await,
            Vendor::Gcp => Ok(0),
        }
    }

    async fn delete_rules<R: RuleShape>(&self, security_group_ids: &[String]) -> InventoryResult<u64> {
        Ok(self
            .store
            .delete(
                R::table_name(),
                R::table_schema(),
                &Expression::in_values("security_group_id", security_group_ids.iter().cloned()),
            )
            .await?)
    }
}

fn vendor_matches<R: RuleShape>(group: &SecurityGroupTable) -> ValidationResult {
    match group.vendor {
        Some(vendor) if vendor == R::VENDOR => Ok(()),
        Some(vendor) => Err(ValidationError::business(format!(
            "security group {} belongs to {vendor}, rules are for {}",
            group.id,
            R::VENDOR
        ))),
        None => Err(ValidationError::invariant("vendor can not be empty")),
    }
}

fn not_found(kind: &'static str, id: &str) -> InventoryError {
    InventoryError::NotFound {
        kind,
        id: id.to_string(),
    }
}

fn rejected(kit: &Kit, err: ValidationError) -> InventoryError {
    warn!(
        correlation_id = %kit.correlation_id,
        kind = ?err.kind(),
        error = %err,
        "Request rejected"
    );
    InventoryError::Validation(err)
}

fn check(kit: &Kit, result: ValidationResult) -> InventoryResult<()> {
    result.map_err(|err| rejected(kit, err))
}

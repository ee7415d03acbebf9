// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-Memory Row Store
//!
//! Keeps every table as a vector of rows behind a tokio `RwLock`. Used by the
//! tests and by embedders that do not need durable storage.
//!
//! Behaves like a SQL-backed store at the seam:
//! - ids are generated (UUID v7, so insertion order is id order)
//! - `created_at`/`updated_at` are stamped here
//! - every column and filter field is checked against the table schema

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::config::InventoryConfig;
use crate::query::{AtomRule, BasePage, Expression, FieldOp, FilterRule, LogicOp, Order};
use crate::query::DEFAULT_MAX_PAGE_LIMIT;
use crate::schema::{SchemaError, TableSchema, Value};

use super::store::{ListRows, RowStore, StoreError, StoreResult};
use super::table::{Row, TableName};

/// Row store holding everything in process memory
#[derive(Debug)]
pub struct InMemoryRowStore {
    tables: RwLock<HashMap<TableName, Vec<Row>>>,
    max_page_limit: u32,
}

impl Default for InMemoryRowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRowStore {
    pub fn new() -> Self {
        Self::with_max_page_limit(DEFAULT_MAX_PAGE_LIMIT)
    }

    pub fn with_max_page_limit(max_page_limit: u32) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            max_page_limit,
        }
    }

    pub fn from_config(config: &InventoryConfig) -> Self {
        Self::with_max_page_limit(config.max_page_limit)
    }

    /// Number of rows currently stored in `table`
    pub async fn row_count(&self, table: TableName) -> usize {
        self.tables
            .read()
            .await
            .get(&table)
            .map_or(0, Vec::len)
    }
}

fn check_row(schema: &TableSchema, row: &Row) -> StoreResult<()> {
    for (column, value) in row.iter() {
        schema.check_value(column, value)?;
    }
    Ok(())
}

fn check_filter(schema: &TableSchema, filter: &Expression) -> StoreResult<()> {
    for field in filter.fields() {
        if !schema.contains(field) {
            return Err(SchemaError::UnknownColumn(field.to_string()).into());
        }
    }
    Ok(())
}

fn matches(filter: &Expression, row: &Row) -> StoreResult<bool> {
    let mut outcomes = filter.rules.iter().map(|rule| match rule {
        FilterRule::Atom(atom) => matches_atom(atom, row),
        FilterRule::Expression(nested) => matches(nested, row),
    });

    match filter.op {
        LogicOp::And => {
            for outcome in outcomes.by_ref() {
                if !outcome? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        LogicOp::Or => {
            if filter.rules.is_empty() {
                return Ok(true);
            }
            for outcome in outcomes.by_ref() {
                if outcome? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

/// Evaluate `filter` against every row before anything is mutated
fn select(filter: &Expression, rows: &[Row]) -> StoreResult<Vec<bool>> {
    rows.iter().map(|row| matches(filter, row)).collect()
}

fn matches_atom(atom: &AtomRule, row: &Row) -> StoreResult<bool> {
    let value = row.get(&atom.field).unwrap_or(&Value::Null);

    let matched = match atom.op {
        FieldOp::Eq => value.matches_json(&atom.value),
        FieldOp::Neq => !value.matches_json(&atom.value),
        FieldOp::Gt => compare(value, &atom.value) == Some(Ordering::Greater),
        FieldOp::Gte => matches!(
            compare(value, &atom.value),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        FieldOp::Lt => compare(value, &atom.value) == Some(Ordering::Less),
        FieldOp::Lte => matches!(
            compare(value, &atom.value),
            Some(Ordering::Less | Ordering::Equal)
        ),
        FieldOp::In | FieldOp::Nin => {
            let JsonValue::Array(options) = &atom.value else {
                return Err(StoreError::InvalidFilter(format!(
                    "{} expects an array value",
                    atom.field
                )));
            };
            let found = options.iter().any(|option| value.matches_json(option));
            found == (atom.op == FieldOp::In)
        }
        FieldOp::Cs | FieldOp::Cis => {
            let JsonValue::String(needle) = &atom.value else {
                return Err(StoreError::InvalidFilter(format!(
                    "{} expects a string value",
                    atom.field
                )));
            };
            let haystack = value.as_str().unwrap_or_default();
            if atom.op == FieldOp::Cs {
                haystack.contains(needle.as_str())
            } else {
                haystack.to_lowercase().contains(&needle.to_lowercase())
            }
        }
    };

    Ok(matched)
}

fn compare(value: &Value, other: &JsonValue) -> Option<Ordering> {
    match (value, other) {
        (Value::Numeric(a), JsonValue::Number(b)) => b.as_i64().map(|b| a.cmp(&b)),
        (Value::String(a), JsonValue::String(b)) => Some(a.as_str().cmp(b.as_str())),
        (Value::Time(a), JsonValue::String(b)) => DateTime::parse_from_rfc3339(b)
            .ok()
            .map(|b| a.cmp(&b.with_timezone(&Utc))),
        _ => None,
    }
}

/// Total order used for sorting; `Null` sorts first
fn sort_order(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Numeric(a), Value::Numeric(b)) => a.cmp(b),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Time(a), Value::Time(b)) => a.cmp(b),
        (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
        (a, b) => a.type_name().cmp(b.type_name()),
    }
}

#[async_trait]
impl RowStore for InMemoryRowStore {
    async fn insert(
        &self,
        table: TableName,
        schema: &TableSchema,
        rows: Vec<Row>,
    ) -> StoreResult<Vec<String>> {
        for row in &rows {
            check_row(schema, row)?;
        }

        let now = Utc::now();
        let mut ids = Vec::with_capacity(rows.len());
        let mut stored = Vec::with_capacity(rows.len());

        for mut row in rows {
            let id = Uuid::now_v7().to_string();
            for column in schema.column_names() {
                if row.get(column).is_none() {
                    row.set(column, Value::Null);
                }
            }
            row.set("id", id.as_str());
            if schema.contains("created_at") {
                row.set("created_at", now);
                row.set("updated_at", now);
            }
            ids.push(id);
            stored.push(row);
        }

        self.tables
            .write()
            .await
            .entry(table)
            .or_default()
            .extend(stored);

        debug!(table = %table, count = ids.len(), "Inserted rows");
        Ok(ids)
    }

    async fn update(
        &self,
        table: TableName,
        schema: &TableSchema,
        filter: &Expression,
        values: Row,
    ) -> StoreResult<u64> {
        check_filter(schema, filter)?;
        check_row(schema, &values)?;
        if values.get("id").is_some() {
            return Err(StoreError::InvalidFilter("id can not be updated".to_string()));
        }

        let now = Utc::now();
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table).or_default();
        let selected = select(filter, rows)?;
        let mut affected = 0;

        for (row, _) in rows.iter_mut().zip(&selected).filter(|(_, hit)| **hit) {
            for (column, value) in values.iter() {
                row.set(column, value.clone());
            }
            if schema.contains("updated_at") {
                row.set("updated_at", now);
            }
            affected += 1;
        }

        debug!(table = %table, affected, "Updated rows");
        Ok(affected)
    }

    async fn list(
        &self,
        table: TableName,
        schema: &TableSchema,
        filter: &Expression,
        page: &BasePage,
    ) -> StoreResult<ListRows> {
        page.validate(self.max_page_limit)?;
        check_filter(schema, filter)?;
        if let Some(sort) = &page.sort {
            if !schema.contains(sort) {
                return Err(SchemaError::UnknownColumn(sort.clone()).into());
            }
        }

        let tables = self.tables.read().await;
        let mut selected = Vec::new();
        for row in tables.get(&table).into_iter().flatten() {
            if matches(filter, row)? {
                selected.push(row);
            }
        }

        if page.count {
            debug!(table = %table, count = selected.len(), "Counted rows");
            return Ok(ListRows {
                count: Some(selected.len() as u64),
                rows: Vec::new(),
            });
        }

        if let Some(sort) = &page.sort {
            selected.sort_by(|a, b| {
                let ordering = sort_order(
                    a.get(sort).unwrap_or(&Value::Null),
                    b.get(sort).unwrap_or(&Value::Null),
                );
                match page.order {
                    Some(Order::Desc) => ordering.reverse(),
                    _ => ordering,
                }
            });
        }

        let rows: Vec<Row> = selected
            .into_iter()
            .skip(page.start as usize)
            .take(page.limit as usize)
            .cloned()
            .collect();

        debug!(table = %table, returned = rows.len(), "Listed rows");
        Ok(ListRows { count: None, rows })
    }

    async fn delete(
        &self,
        table: TableName,
        schema: &TableSchema,
        filter: &Expression,
    ) -> StoreResult<u64> {
        check_filter(schema, filter)?;

        let mut tables = self.tables.write().await;
        let rows = tables.entry(table).or_default();

        let selected = select(filter, rows)?;
        let before = rows.len();
        let mut hits = selected.iter();
        rows.retain(|_| !hits.next().copied().unwrap_or(false));
        let removed = (before - rows.len()) as u64;

        debug!(table = %table, removed, "Deleted rows");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dal::security_group::SECURITY_GROUP_SCHEMA;
    use crate::query::PageError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sg_row(name: &str, biz: i64) -> Row {
        Row::new()
            .with("vendor", "tcloud")
            .with("cloud_id", format!("sg-{name}"))
            .with("name", name)
            .with("bk_biz_id", biz)
            .with("account_id", "acc-0001")
            .with("creator", "admin")
    }

    async fn seeded() -> (InMemoryRowStore, Vec<String>) {
        let store = InMemoryRowStore::new();
        let ids = store
            .insert(
                TableName::SecurityGroup,
                &SECURITY_GROUP_SCHEMA,
                vec![sg_row("web", -1), sg_row("db", 7), sg_row("cache", 7)],
            )
            .await
            .unwrap();
        (store, ids)
    }

    #[tokio::test]
    async fn test_insert_generates_ids_and_timestamps() {
        let (store, ids) = seeded().await;
        assert_eq!(ids.len(), 3);
        assert_eq!(store.row_count(TableName::SecurityGroup).await, 3);

        let listed = store
            .list(
                TableName::SecurityGroup,
                &SECURITY_GROUP_SCHEMA,
                &Expression::equal("id", ids[0].as_str()),
                &BasePage::new(0, 10),
            )
            .await
            .unwrap();
        let row = &listed.rows[0];
        assert_eq!(row.string("name").unwrap(), "web");
        assert!(row.opt_time("created_at").unwrap().is_some());
        assert_eq!(row.get("memo"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_insert_rejects_unknown_column() {
        let store = InMemoryRowStore::new();
        let err = store
            .insert(
                TableName::SecurityGroup,
                &SECURITY_GROUP_SCHEMA,
                vec![sg_row("web", -1).with("colour", "blue")],
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::Schema(SchemaError::UnknownColumn("colour".to_string()))
        );
        assert_eq!(store.row_count(TableName::SecurityGroup).await, 0);
    }

    #[tokio::test]
    async fn test_list_filters_and_counts() {
        let (store, _) = seeded().await;
        let filter = Expression::equal("bk_biz_id", 7);

        let counted = store
            .list(
                TableName::SecurityGroup,
                &SECURITY_GROUP_SCHEMA,
                &filter,
                &BasePage::count_only(),
            )
            .await
            .unwrap();
        assert_eq!(counted.count, Some(2));
        assert!(counted.rows.is_empty());

        let listed = store
            .list(
                TableName::SecurityGroup,
                &SECURITY_GROUP_SCHEMA,
                &filter,
                &BasePage::new(0, 10).sorted("name", Order::Asc),
            )
            .await
            .unwrap();
        let names: Vec<String> = listed
            .rows
            .iter()
            .map(|r| r.string("name").unwrap())
            .collect();
        assert_eq!(names, vec!["cache", "db"]);
    }

    #[tokio::test]
    async fn test_nested_filter() {
        let (store, _) = seeded().await;
        let filter: Expression = serde_json::from_value(json!({
            "op": "or",
            "rules": [
                {"field": "name", "op": "cis", "value": "WE"},
                {"op": "and", "rules": [
                    {"field": "bk_biz_id", "op": "gt", "value": 0},
                    {"field": "name", "op": "nin", "value": ["db"]}
                ]}
            ]
        }))
        .unwrap();

        let listed = store
            .list(
                TableName::SecurityGroup,
                &SECURITY_GROUP_SCHEMA,
                &filter,
                &BasePage::new(0, 10).sorted("name", Order::Desc),
            )
            .await
            .unwrap();
        let names: Vec<String> = listed
            .rows
            .iter()
            .map(|r| r.string("name").unwrap())
            .collect();
        assert_eq!(names, vec!["web", "cache"]);
    }

    #[tokio::test]
    async fn test_page_window() {
        let (store, _) = seeded().await;
        let listed = store
            .list(
                TableName::SecurityGroup,
                &SECURITY_GROUP_SCHEMA,
                &Expression::all(),
                &BasePage::new(1, 1),
            )
            .await
            .unwrap();
        assert_eq!(listed.rows.len(), 1);
        assert_eq!(listed.rows[0].string("name").unwrap(), "db");
    }

    #[tokio::test]
    async fn test_page_limit_enforced() {
        let store = InMemoryRowStore::with_max_page_limit(2);
        let err = store
            .list(
                TableName::SecurityGroup,
                &SECURITY_GROUP_SCHEMA,
                &Expression::all(),
                &BasePage::new(0, 3),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::InvalidPage(PageError::LimitTooLarge { max: 2, actual: 3 })
        );
    }

    #[tokio::test]
    async fn test_unknown_filter_field() {
        let (store, _) = seeded().await;
        let err = store
            .delete(
                TableName::SecurityGroup,
                &SECURITY_GROUP_SCHEMA,
                &Expression::equal("colour", "blue"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Schema(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (store, ids) = seeded().await;

        let affected = store
            .update(
                TableName::SecurityGroup,
                &SECURITY_GROUP_SCHEMA,
                &Expression::in_values("id", ids[..2].to_vec()),
                Row::new().with("bk_biz_id", 9i64).with("reviser", "ops"),
            )
            .await
            .unwrap();
        assert_eq!(affected, 2);

        let removed = store
            .delete(
                TableName::SecurityGroup,
                &SECURITY_GROUP_SCHEMA,
                &Expression::equal("bk_biz_id", 9),
            )
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.row_count(TableName::SecurityGroup).await, 1);
    }

    #[tokio::test]
    async fn test_update_rejects_wrong_type() {
        let (store, _) = seeded().await;
        let err = store
            .update(
                TableName::SecurityGroup,
                &SECURITY_GROUP_SCHEMA,
                &Expression::all(),
                Row::new().with("bk_biz_id", "nine"),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Schema(SchemaError::TypeMismatch { .. })
        ));
    }
}

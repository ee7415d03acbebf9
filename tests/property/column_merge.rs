// Copyright (c) 2025 - Cowboy AI, Inc.
//! Column Merge Properties
//!
//! For all base/extension column sets:
//! - merged names are unique
//! - the first descriptor with a given name wins
//! - merging is idempotent

use proptest::prelude::*;
use std::collections::HashSet;

use cloud_inventory::schema::{merge_columns, ColumnDescriptor, ColumnType, TableSchema};

// ============================================================================
// Strategies
// ============================================================================

fn column_type_strategy() -> impl Strategy<Value = ColumnType> {
    prop_oneof![
        Just(ColumnType::String),
        Just(ColumnType::Numeric),
        Just(ColumnType::Boolean),
        Just(ColumnType::Time),
        Just(ColumnType::Enum),
        Just(ColumnType::Json),
    ]
}

/// Small name alphabet so collisions between base and extension are common
fn descriptor_strategy() -> impl Strategy<Value = ColumnDescriptor> {
    ("[a-f]{1,2}", column_type_strategy())
        .prop_map(|(name, column_type)| ColumnDescriptor::owned(name.clone(), name, column_type))
}

fn columns_strategy() -> impl Strategy<Value = Vec<ColumnDescriptor>> {
    prop::collection::vec(descriptor_strategy(), 0..12)
}

fn names(schema: &TableSchema) -> Vec<String> {
    schema.iter().map(|d| d.column.to_string()).collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_merged_names_are_unique(base in columns_strategy(), ext in columns_strategy()) {
        let merged = merge_columns(&base, &ext);
        let unique: HashSet<String> = names(&merged).into_iter().collect();

        prop_assert_eq!(unique.len(), merged.len());

        let expected: HashSet<String> = base
            .iter()
            .chain(&ext)
            .map(|d| d.column.to_string())
            .collect();
        prop_assert_eq!(unique, expected);
    }

    #[test]
    fn prop_first_descriptor_wins(base in columns_strategy(), ext in columns_strategy()) {
        let merged = merge_columns(&base, &ext);

        for descriptor in merged.iter() {
            let first = base
                .iter()
                .chain(&ext)
                .find(|d| d.column == descriptor.column);
            prop_assert_eq!(first, Some(descriptor));
        }
    }

    #[test]
    fn prop_merge_is_idempotent(base in columns_strategy(), ext in columns_strategy()) {
        let merged = merge_columns(&base, &ext);

        prop_assert_eq!(&merged.merge(&[]), &merged);
        prop_assert_eq!(&merged.merge(&ext), &merged);
        prop_assert_eq!(&merge_columns(merged.descriptors(), merged.descriptors()), &merged);
    }

    #[test]
    fn prop_base_order_is_preserved(base in columns_strategy(), ext in columns_strategy()) {
        let merged = names(&merge_columns(&base, &ext));
        let base_only = names(&merge_columns(&base, &[]));

        prop_assert_eq!(&merged[..base_only.len()], &base_only[..]);
    }
}

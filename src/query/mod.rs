// Copyright (c) 2025 - Cowboy AI, Inc.
//! Query descriptors shared by list requests and the row store

pub mod filter;
pub mod page;

pub use filter::{AtomRule, Expression, FieldOp, FilterRule, LogicOp};
pub use page::{BasePage, Order, PageError, PageWithoutSort, DEFAULT_MAX_PAGE_LIMIT};

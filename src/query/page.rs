// Copyright (c) 2025 - Cowboy AI, Inc.
//! Paging descriptors

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default upper bound on `limit` for one page
pub const DEFAULT_MAX_PAGE_LIMIT: u32 = 500;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("count page should not set start, limit or sort")]
    CountWithWindow,

    #[error("page limit is required")]
    MissingLimit,

    #[error("page limit should <= {max}, but got {actual}")]
    LimitTooLarge { max: u32, actual: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Order {
    Asc,
    Desc,
}

/// Page with optional sort
///
/// `count: true` asks only for the total number of matching rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasePage {
    #[serde(default)]
    pub count: bool,
    #[serde(default)]
    pub start: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
}

impl BasePage {
    pub fn new(start: u32, limit: u32) -> Self {
        Self {
            start,
            limit,
            ..Self::default()
        }
    }

    pub fn count_only() -> Self {
        Self {
            count: true,
            ..Self::default()
        }
    }

    pub fn sorted(mut self, field: impl Into<String>, order: Order) -> Self {
        self.sort = Some(field.into());
        self.order = Some(order);
        self
    }

    /// Check the window against the store's maximum page size
    pub fn validate(&self, max_limit: u32) -> Result<(), PageError> {
        if self.count {
            if self.start != 0 || self.limit != 0 || self.sort.is_some() {
                return Err(PageError::CountWithWindow);
            }
            return Ok(());
        }

        if self.limit == 0 {
            return Err(PageError::MissingLimit);
        }

        if self.limit > max_limit {
            return Err(PageError::LimitTooLarge {
                max: max_limit,
                actual: self.limit,
            });
        }

        Ok(())
    }
}

/// Page used where the order is fixed by the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWithoutSort {
    #[serde(default)]
    pub count: bool,
    #[serde(default)]
    pub start: u32,
    #[serde(default)]
    pub limit: u32,
}

impl From<PageWithoutSort> for BasePage {
    fn from(page: PageWithoutSort) -> Self {
        Self {
            count: page.count,
            start: page.start,
            limit: page.limit,
            sort: None,
            order: None,
        }
    }
}

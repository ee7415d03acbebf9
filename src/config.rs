// Copyright (c) 2025 - Cowboy AI, Inc.
//! Inventory configuration
//!
//! | Variable | Default |
//! |---|---|
//! | `INVENTORY_MAX_PAGE_LIMIT` | 500 |
//! | `INVENTORY_LOG` | `info` |

use serde::{Deserialize, Serialize};

use crate::errors::{InventoryError, InventoryResult};
use crate::query::DEFAULT_MAX_PAGE_LIMIT;

pub const MAX_PAGE_LIMIT_ENV: &str = "INVENTORY_MAX_PAGE_LIMIT";
pub const LOG_FILTER_ENV: &str = "INVENTORY_LOG";

/// Runtime settings for the service and the in-memory row store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Largest `limit` a list page may ask for
    #[serde(default = "default_max_page_limit")]
    pub max_page_limit: u32,

    /// `tracing_subscriber::EnvFilter` directive used by the binary
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_max_page_limit() -> u32 {
    DEFAULT_MAX_PAGE_LIMIT
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            max_page_limit: default_max_page_limit(),
            log_filter: default_log_filter(),
        }
    }
}

impl InventoryConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> InventoryResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> InventoryResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(MAX_PAGE_LIMIT_ENV) {
            let limit: u32 = raw.trim().parse().map_err(|_| {
                InventoryError::Configuration(format!(
                    "{MAX_PAGE_LIMIT_ENV} should be a positive integer, but got {raw:?}"
                ))
            })?;
            if limit == 0 {
                return Err(InventoryError::Configuration(format!(
                    "{MAX_PAGE_LIMIT_ENV} should be > 0"
                )));
            }
            config.max_page_limit = limit;
        }

        if let Some(filter) = lookup(LOG_FILTER_ENV).filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }

        Ok(config)
    }
}

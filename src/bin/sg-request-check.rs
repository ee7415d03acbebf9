// Copyright (c) 2025 - Cowboy AI, Inc.
//! Security Group Request Checker
//!
//! Validates one request body read from stdin and prints `ok` or the first
//! violation.
//!
//! ```text
//! sg-request-check <kind> [vendor] < request.json
//!
//! kinds: list | list-rules | update | create-rules | update-rule | delete | assign
//! ```
//!
//! `create-rules` and `update-rule` need the vendor (`tcloud`, `aws`,
//! `huawei`, `azure`). Exits with status 1 when the request is rejected.

use anyhow::{bail, Context, Result};
use cloud_inventory::{
    request::{
        AssignSecurityGroupToBizReq, SecurityGroupBatchDeleteReq, SecurityGroupListReq,
        SecurityGroupRuleListReq, SecurityGroupUpdateReq, VendorRuleCreateReq,
        VendorRuleUpdateReq,
    },
    InventoryConfig, Validate, ValidationResult, Vendor,
};
use serde::de::DeserializeOwned;
use std::io::Read;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: sg-request-check <list|list-rules|update|create-rules|update-rule|delete|assign> [vendor] < request.json";

fn decode<T: DeserializeOwned>(body: serde_json::Value) -> Result<T> {
    serde_json::from_value(body).context("Failed to decode request body")
}

fn vendor_arg(vendor: Option<&String>) -> Result<Vendor> {
    let raw = vendor.context("vendor argument is required for this kind")?;
    raw.parse::<Vendor>().context("Unknown vendor")
}

fn check(
    kind: &str,
    vendor: Option<&String>,
    body: serde_json::Value,
    config: &InventoryConfig,
) -> Result<ValidationResult> {
    let result = match kind {
        "list" => decode::<SecurityGroupListReq>(body)?.validate_with(config.max_page_limit),
        "list-rules" => {
            decode::<SecurityGroupRuleListReq>(body)?.validate_with(config.max_page_limit)
        }
        "update" => decode::<SecurityGroupUpdateReq>(body)?.validate(),
        "delete" => decode::<SecurityGroupBatchDeleteReq>(body)?.validate(),
        "assign" => decode::<AssignSecurityGroupToBizReq>(body)?.validate(),
        "create-rules" => VendorRuleCreateReq::decode(vendor_arg(vendor)?, body)?.validate(),
        "update-rule" => VendorRuleUpdateReq::decode(vendor_arg(vendor)?, body)?.validate(),
        other => bail!("unknown request kind {other:?}\n{USAGE}"),
    };
    Ok(result)
}

fn main() -> Result<()> {
    let config = InventoryConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(kind) = args.first() else {
        bail!(USAGE);
    };

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read request from stdin")?;
    let body: serde_json::Value =
        serde_json::from_str(&input).context("Request body is not valid JSON")?;

    debug!(kind = %kind, "Checking request");

    match check(kind, args.get(1), body, &config)? {
        Ok(()) => {
            info!(kind = %kind, "Request accepted");
            println!("ok");
            Ok(())
        }
        Err(err) => {
            info!(kind = %kind, error_kind = ?err.kind(), "Request rejected");
            println!("{err}");
            std::process::exit(1);
        }
    }
}

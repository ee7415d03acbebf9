// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Field Constraint Functions
//!
//! Each function checks exactly one constraint on one field and names the
//! field in its error. They are combined with `?` inside aggregate
//! `validate` routines, which therefore stop at the first failure.
//!
//! # Design Principles
//!
//! - **Pure Functions**: No I/O, no mutations, deterministic
//! - **Composable**: Small functions that combine
//! - **Serialization-agnostic**: Operate on plain values, not on JSON

use std::str::FromStr;

use crate::domain::{IpCidr, PortRange, PortSpec};

use super::{ValidationError, ValidationResult};

/// String must be non-empty
pub fn required(field: &'static str, value: &str) -> ValidationResult {
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

/// Option must be `Some`
pub fn required_some<T>(field: &'static str, value: &Option<T>) -> ValidationResult {
    if value.is_none() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

/// Collection must contain at least one element
pub fn required_items<T>(field: &'static str, values: &[T]) -> ValidationResult {
    if values.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

/// Character count must not exceed `max`
pub fn max_len(field: &'static str, value: &str, max: usize) -> ValidationResult {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}

/// Collection must not hold more than `max` elements
pub fn max_items<T>(field: &'static str, values: &[T], max: usize) -> ValidationResult {
    if values.len() > max {
        return Err(ValidationError::TooLong {
            field,
            max,
            actual: values.len(),
        });
    }
    Ok(())
}

/// Field must not be set by the caller
pub fn must_be_empty(field: &'static str, value: &str) -> ValidationResult {
    if !value.is_empty() {
        return Err(ValidationError::MustBeEmpty { field });
    }
    Ok(())
}

/// Option must be `None`
pub fn absent<T>(field: &'static str, value: &Option<T>) -> ValidationResult {
    if value.is_some() {
        return Err(ValidationError::MustBeEmpty { field });
    }
    Ok(())
}

/// Inclusive numeric range
pub fn range(field: &'static str, value: i64, min: i64, max: i64) -> ValidationResult {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

/// Exact, case-sensitive match against an enumerated set
pub fn one_of(field: &'static str, value: &str, allowed: &[&str]) -> ValidationResult {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(not_one_of(field, value, allowed))
}

/// Case-insensitive match against an enumerated set
pub fn one_of_ignore_case(field: &'static str, value: &str, allowed: &[&str]) -> ValidationResult {
    if allowed.iter().any(|option| option.eq_ignore_ascii_case(value)) {
        return Ok(());
    }
    Err(not_one_of(field, value, allowed))
}

/// Numeric value must be one of an enumerated set
pub fn one_of_numeric(field: &'static str, value: i64, allowed: &[i64]) -> ValidationResult {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ValidationError::NotOneOf {
        field,
        allowed: allowed
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        value: value.to_string(),
    })
}

fn not_one_of(field: &'static str, value: &str, allowed: &[&str]) -> ValidationError {
    ValidationError::NotOneOf {
        field,
        allowed: allowed.join(", "),
        value: value.to_string(),
    }
}

/// IPv4 address with optional prefix
pub fn ipv4_cidr(field: &'static str, value: &str) -> ValidationResult {
    IpCidr::ipv4(value)
        .map(|_| ())
        .map_err(|e| format_error(field, e))
}

/// IPv6 address with optional prefix
pub fn ipv6_cidr(field: &'static str, value: &str) -> ValidationResult {
    IpCidr::ipv6(value)
        .map(|_| ())
        .map_err(|e| format_error(field, e))
}

/// IPv4 or IPv6 address with optional prefix
pub fn ip_cidr(field: &'static str, value: &str) -> ValidationResult {
    IpCidr::new(value)
        .map(|_| ())
        .map_err(|e| format_error(field, e))
}

/// `ALL` (when `allow_all`), a port, a range, or a comma separated list of them
pub fn port_spec(field: &'static str, value: &str, allow_all: bool) -> ValidationResult {
    let spec = PortSpec::from_str(value).map_err(|e| format_error(field, e))?;
    if spec.is_all() && !allow_all {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: format!("{} is not accepted here", PortSpec::ALL),
        });
    }
    Ok(())
}

/// `*`, a port, or a single range
pub fn wildcard_port_range(field: &'static str, value: &str) -> ValidationResult {
    if value == "*" {
        return Ok(());
    }
    PortRange::from_str(value)
        .map(|_| ())
        .map_err(|e| format_error(field, e))
}

/// Protocol given by name (matched case-insensitively) or IANA number
pub fn protocol(field: &'static str, value: &str, names: &[&str]) -> ValidationResult {
    if let Ok(number) = value.parse::<i64>() {
        return range(field, number, 0, 255);
    }
    one_of_ignore_case(field, value, names)
}

/// Run `check` only when the optional field is present
pub fn optional<T, F>(value: &Option<T>, check: F) -> ValidationResult
where
    F: FnOnce(&T) -> ValidationResult,
{
    match value {
        Some(inner) => check(inner),
        None => Ok(()),
    }
}

/// Run `check` on every element, stopping at the first failure
pub fn each<T, F>(values: &[T], mut check: F) -> ValidationResult
where
    F: FnMut(&T) -> ValidationResult,
{
    values.iter().try_for_each(|value| check(value))
}

fn format_error(field: &'static str, err: impl std::fmt::Display) -> ValidationError {
    ValidationError::InvalidFormat {
        field,
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_required() {
        assert!(required("name", "sg").is_ok());
        assert_eq!(
            required("name", "").unwrap_err(),
            ValidationError::Required { field: "name" }
        );
        assert!(required_some::<u8>("page", &None).is_err());
        assert!(required_items::<u8>("ids", &[]).is_err());
    }

    #[test]
    fn test_max_len_counts_characters() {
        assert!(max_len("memo", "安全组", 3).is_ok());
        assert!(max_len("memo", "安全组规则", 3).is_err());
    }

    #[test]
    fn test_max_items() {
        assert!(max_items("ids", &[1, 2, 3], 3).is_ok());
        assert!(max_items("ids", &[1, 2, 3, 4], 3).is_err());
    }

    #[test_case(-1, true ; "lower bound")]
    #[test_case(65535, true ; "upper bound")]
    #[test_case(-2, false ; "below")]
    #[test_case(65536, false ; "above")]
    fn test_range(value: i64, ok: bool) {
        assert_eq!(range("from_port", value, -1, 65535).is_ok(), ok);
    }

    #[test]
    fn test_one_of() {
        assert!(one_of("access", "Allow", &["Allow", "Deny"]).is_ok());
        assert!(one_of("access", "allow", &["Allow", "Deny"]).is_err());
        assert!(one_of_ignore_case("protocol", "TCP", &["tcp", "udp"]).is_ok());
        assert!(one_of_numeric("is_available", 2, &[1, 2]).is_ok());
        assert!(one_of_numeric("is_available", -1, &[1, 2]).is_err());
    }

    #[test_case("0.0.0.0/0", true ; "any v4")]
    #[test_case("10.0.0.1", true ; "host")]
    #[test_case("::/0", false ; "v6 in v4 field")]
    #[test_case("10.0.0.0/40", false ; "bad prefix")]
    fn test_ipv4_cidr(value: &str, ok: bool) {
        assert_eq!(ipv4_cidr("ipv4_cidr", value).is_ok(), ok);
    }

    #[test]
    fn test_port_spec() {
        assert!(port_spec("port", "ALL", true).is_ok());
        assert!(port_spec("port", "ALL", false).is_err());
        assert!(port_spec("port", "22,80-90", false).is_ok());
        assert!(port_spec("port", "22;80", true).is_err());
    }

    #[test]
    fn test_wildcard_port_range() {
        assert!(wildcard_port_range("source_port_range", "*").is_ok());
        assert!(wildcard_port_range("source_port_range", "443").is_ok());
        assert!(wildcard_port_range("source_port_range", "1-1024").is_ok());
        assert!(wildcard_port_range("source_port_range", "80,443").is_err());
    }

    #[test]
    fn test_protocol() {
        assert!(protocol("protocol", "tcp", &["tcp"]).is_ok());
        assert!(protocol("protocol", "6", &["tcp"]).is_ok());
        assert!(protocol("protocol", "256", &["tcp"]).is_err());
        assert!(protocol("protocol", "sctp", &["tcp"]).is_err());
    }

    #[test]
    fn test_optional_and_each() {
        let memo: Option<String> = None;
        assert!(optional(&memo, |m| max_len("memo", m, 1)).is_ok());

        let memo = Some("too long".to_string());
        assert!(optional(&memo, |m| max_len("memo", m, 1)).is_err());

        let ranges = vec!["80".to_string(), "x".to_string()];
        assert!(each(&ranges, |r| wildcard_port_range("port", r)).is_err());
    }
}

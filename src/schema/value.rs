// Copyright (c) 2025 - Cowboy AI, Inc.
//! Typed column values exchanged with the row store

use chrono::{DateTime, Utc};

/// A single stored value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Numeric(i64),
    Boolean(bool),
    Time(DateTime<Utc>),
    Json(serde_json::Value),
    Null,
}

impl Value {
    /// Name used in type mismatch errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Numeric(_) => "numeric",
            Value::Boolean(_) => "boolean",
            Value::Time(_) => "time",
            Value::Json(_) => "json",
            Value::Null => "null",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Numeric(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Time(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Loose equality used by filter evaluation
    ///
    /// Numbers compare with JSON numbers, strings with JSON strings.
    pub fn matches_json(&self, other: &serde_json::Value) -> bool {
        match (self, other) {
            (Value::String(a), serde_json::Value::String(b)) => a == b,
            (Value::Numeric(a), serde_json::Value::Number(b)) => b.as_i64() == Some(*a),
            (Value::Boolean(a), serde_json::Value::Bool(b)) => a == b,
            (Value::Time(a), serde_json::Value::String(b)) => {
                DateTime::parse_from_rfc3339(b).is_ok_and(|b| b.with_timezone(&Utc) == *a)
            }
            (Value::Json(a), b) => a == b,
            (Value::Null, serde_json::Value::Null) => true,
            _ => false,
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Numeric(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Numeric(i64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Time(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::Json(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some(5i64)), Value::Numeric(5));
    }

    #[test]
    fn test_matches_json() {
        assert!(Value::from("sg-1").matches_json(&json!("sg-1")));
        assert!(Value::Numeric(3).matches_json(&json!(3)));
        assert!(!Value::Numeric(3).matches_json(&json!("3")));
        assert!(Value::Null.matches_json(&json!(null)));
    }
}

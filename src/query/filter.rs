// Copyright (c) 2025 - Cowboy AI, Inc.
//! Filter Expressions
//!
//! ```json
//! {"op": "and", "rules": [
//!     {"field": "vendor", "op": "eq", "value": "tcloud"},
//!     {"op": "or", "rules": [...]}
//! ]}
//! ```
//!
//! Requests only carry expressions; evaluating them is the row store's job.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// How the rules of an expression combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicOp {
    And,
    Or,
}

/// Comparison applied by an atom rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Nin,
    /// Contains substring
    Cs,
    /// Contains substring, case-insensitive
    Cis,
}

/// `field op value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomRule {
    pub field: String,
    pub op: FieldOp,
    pub value: JsonValue,
}

impl AtomRule {
    pub fn new(field: impl Into<String>, op: FieldOp, value: impl Into<JsonValue>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}

/// Either an atom or a nested expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterRule {
    Atom(AtomRule),
    Expression(Expression),
}

/// Boolean combination of filter rules
///
/// An `and` expression without rules matches everything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub op: LogicOp,
    #[serde(default)]
    pub rules: Vec<FilterRule>,
}

impl Expression {
    /// Matches every row
    pub fn all() -> Self {
        Self {
            op: LogicOp::And,
            rules: Vec::new(),
        }
    }

    /// `field == value`
    pub fn equal(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::and(vec![AtomRule::new(field, FieldOp::Eq, value)])
    }

    /// `field IN values`
    pub fn in_values<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<JsonValue>,
    {
        let values: Vec<JsonValue> = values.into_iter().map(Into::into).collect();
        Self::and(vec![AtomRule::new(field, FieldOp::In, values)])
    }

    /// Conjunction of atom rules
    pub fn and(rules: Vec<AtomRule>) -> Self {
        Self {
            op: LogicOp::And,
            rules: rules.into_iter().map(FilterRule::Atom).collect(),
        }
    }

    /// Add another rule to this expression
    pub fn with(mut self, rule: impl Into<FilterRule>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// Every field referenced anywhere in the expression
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, fields: &mut Vec<&'a str>) {
        for rule in &self.rules {
            match rule {
                FilterRule::Atom(atom) => fields.push(atom.field.as_str()),
                FilterRule::Expression(nested) => nested.collect_fields(fields),
            }
        }
    }
}

impl From<AtomRule> for FilterRule {
    fn from(rule: AtomRule) -> Self {
        FilterRule::Atom(rule)
    }
}

impl From<Expression> for FilterRule {
    fn from(expr: Expression) -> Self {
        FilterRule::Expression(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_deserialize_nested() {
        let expr: Expression = serde_json::from_value(json!({
            "op": "and",
            "rules": [
                {"field": "vendor", "op": "eq", "value": "tcloud"},
                {"op": "or", "rules": [
                    {"field": "name", "op": "cs", "value": "web"},
                    {"field": "bk_biz_id", "op": "in", "value": [1, 2]}
                ]}
            ]
        }))
        .unwrap();

        assert_eq!(expr.op, LogicOp::And);
        assert_eq!(expr.fields(), vec!["vendor", "name", "bk_biz_id"]);
        assert!(matches!(expr.rules[1], FilterRule::Expression(_)));
    }

    #[test]
    fn test_builders() {
        let expr = Expression::in_values("id", ["sg-1", "sg-2"])
            .with(AtomRule::new("vendor", FieldOp::Eq, "aws"));
        assert_eq!(expr.fields(), vec!["id", "vendor"]);
        assert!(Expression::all().rules.is_empty());
    }
}

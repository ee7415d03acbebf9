// Copyright (c) 2025 - Cowboy AI, Inc.
//! Structural Validation
//!
//! Field constraints are plain functions instead of struct tags. Every request
//! and entity composes them inside its own `validate` routine and returns the
//! first violation it finds.
//!
//! # Error Taxonomy
//!
//! - **Structural**: required field missing, length/range/format violated
//! - **Business rule**: mutual exclusivity, cardinality, immutable fields
//! - **Entity invariant**: storage invariants checked at the persistence boundary
//!
//! All three travel through the same [`ValidationError`] channel; [`ValidationError::kind`]
//! tells them apart.

pub mod constraints;
pub mod names;

use serde::{Deserialize, Serialize};

/// Validation result with detailed error information
pub type ValidationResult = Result<(), ValidationError>;

/// Validation error with context
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field is missing or empty
    #[error("{field} is required")]
    Required { field: &'static str },

    /// String length ceiling exceeded (counted in characters)
    #[error("{field} length should <= {max}, but got {actual}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// Numeric value outside its permitted range
    #[error("{field} should be in [{min}, {max}], but got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },

    /// Value is not one of the enumerated options
    #[error("{field} should be one of [{allowed}], but got {value}")]
    NotOneOf {
        field: &'static str,
        allowed: String,
        value: String,
    },

    /// Value does not match the expected format
    #[error("{field} is invalid: {reason}")]
    InvalidFormat { field: &'static str, reason: String },

    /// Field must not be set by the caller
    #[error("{field} should be empty")]
    MustBeEmpty { field: &'static str },

    /// Cross-field business rule violated
    #[error("{0}")]
    BusinessRule(String),

    /// Entity would break a storage invariant
    #[error("{0}")]
    Invariant(String),
}

/// Category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Structural,
    BusinessRule,
    EntityInvariant,
}

impl ValidationError {
    /// Build a business rule error
    pub fn business(message: impl Into<String>) -> Self {
        ValidationError::BusinessRule(message.into())
    }

    /// Build an entity invariant error
    pub fn invariant(message: impl Into<String>) -> Self {
        ValidationError::Invariant(message.into())
    }

    /// Category of this failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::BusinessRule(_) => ErrorKind::BusinessRule,
            ValidationError::Invariant(_) => ErrorKind::EntityInvariant,
            ValidationError::Required { .. }
            | ValidationError::TooLong { .. }
            | ValidationError::OutOfRange { .. }
            | ValidationError::NotOneOf { .. }
            | ValidationError::InvalidFormat { .. }
            | ValidationError::MustBeEmpty { .. } => ErrorKind::Structural,
        }
    }
}

/// Anything that can check its own constraints
///
/// Implementations stop at the first violation.
pub trait Validate {
    fn validate(&self) -> ValidationResult;
}

impl<T: Validate> Validate for [T] {
    fn validate(&self) -> ValidationResult {
        self.iter().try_for_each(Validate::validate)
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> ValidationResult {
        self.as_slice().validate()
    }
}

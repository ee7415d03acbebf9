// Copyright (c) 2025 - Cowboy AI, Inc.
//! Security Group Name and Memo Rules

use super::constraints::max_len;
use super::{ValidationError, ValidationResult};

/// Maximum length of a security group name (characters)
pub const SECURITY_GROUP_NAME_MAX_LENGTH: usize = 60;

/// Maximum length of any memo field (characters)
pub const MEMO_MAX_LENGTH: usize = 255;

/// Maximum length of creator/reviser user names
pub const USER_MAX_LENGTH: usize = 64;

/// Validate a security group name
///
/// # Rules
/// - 1 to 60 characters
/// - Letters (any script), digits, `-`, `_` and `.`
/// - Must start with a letter or digit
pub fn validate_security_group_name(name: &str) -> ValidationResult {
    const FIELD: &str = "name";

    let Some(first) = name.chars().next() else {
        return Err(ValidationError::Required { field: FIELD });
    };

    max_len(FIELD, name, SECURITY_GROUP_NAME_MAX_LENGTH)?;

    if !first.is_alphanumeric() {
        return Err(ValidationError::InvalidFormat {
            field: FIELD,
            reason: "should start with a letter or digit".to_string(),
        });
    }

    if let Some(ch) = name
        .chars()
        .find(|ch| !(ch.is_alphanumeric() || matches!(ch, '-' | '_' | '.')))
    {
        return Err(ValidationError::InvalidFormat {
            field: FIELD,
            reason: format!("invalid character {ch:?}"),
        });
    }

    Ok(())
}

/// Validate a security group memo
///
/// An empty memo is valid: it clears the existing one.
pub fn validate_security_group_memo(memo: &str) -> ValidationResult {
    max_len("memo", memo, MEMO_MAX_LENGTH)
}

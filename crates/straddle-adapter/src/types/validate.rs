/*
[INPUT]:  Params and models built by callers or decoded from responses
[OUTPUT]: InvalidData errors naming the offending field path
[POS]:    Data layer - client-side shape checks
[UPDATE]: When required fields or value formats change
*/

use std::collections::BTreeMap;

use super::field::Nullable;
use crate::http::{Result, StraddleError};

/// Shape checks that serde alone cannot express.
pub trait Validate {
    /// Validate `self`, reporting failures relative to `path` (dotted, may be empty).
    fn validate_at(&self, path: &str) -> Result<()>;

    fn validate(&self) -> Result<()> {
        self.validate_at("")
    }
}

impl<T: Validate> Validate for Option<T> {
    fn validate_at(&self, path: &str) -> Result<()> {
        match self {
            Some(value) => value.validate_at(path),
            None => Ok(()),
        }
    }
}

impl<T: Validate> Validate for Nullable<T> {
    fn validate_at(&self, path: &str) -> Result<()> {
        match self {
            Nullable::Value(value) => value.validate_at(path),
            _ => Ok(()),
        }
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate_at(&self, path: &str) -> Result<()> {
        for (index, item) in self.iter().enumerate() {
            item.validate_at(&format!("{path}[{index}]"))?;
        }
        Ok(())
    }
}

impl<T: Validate> Validate for BTreeMap<String, T> {
    fn validate_at(&self, path: &str) -> Result<()> {
        for (key, item) in self {
            item.validate_at(&field_path(path, key))?;
        }
        Ok(())
    }
}

/// Join a parent path and a member name.
pub(crate) fn field_path(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{parent}.{field}")
    }
}

pub(crate) fn require_non_empty(parent: &str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StraddleError::invalid(
            field_path(parent, field),
            "must not be empty",
        ));
    }
    Ok(())
}

pub(crate) fn require_email(parent: &str, field: &str, value: &str) -> Result<()> {
    require_non_empty(parent, field, value)?;
    let valid = value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid {
        return Err(StraddleError::invalid(
            field_path(parent, field),
            format!("`{value}` is not an email address"),
        ));
    }
    Ok(())
}

/// Digits with optional `-` separators, exactly `digits` digits in total.
pub(crate) fn require_digits(parent: &str, field: &str, value: &str, digits: usize) -> Result<()> {
    let only_allowed = value.chars().all(|c| c.is_ascii_digit() || c == '-');
    let count = value.chars().filter(char::is_ascii_digit).count();
    if !only_allowed || count != digits {
        return Err(StraddleError::invalid(
            field_path(parent, field),
            format!("expected {digits} digits"),
        ));
    }
    Ok(())
}

pub(crate) fn require_positive(parent: &str, field: &str, value: Option<u32>) -> Result<()> {
    if value == Some(0) {
        return Err(StraddleError::invalid(
            field_path(parent, field),
            "must be at least 1",
        ));
    }
    Ok(())
}

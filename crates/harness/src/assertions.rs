//! Assertion primitives used by scenarios
//!
//! Each check returns `Ok(())` on success and a [`HarnessError::Assertion`]
//! carrying a readable diagnostic on violation.

use std::fmt::Display;

use crate::error::{HarnessError, HarnessResult};

pub fn ensure(condition: bool, message: Option<&str>) -> HarnessResult<()> {
    if condition {
        Ok(())
    } else {
        Err(HarnessError::Assertion(
            message.unwrap_or("Assertion failed").to_string(),
        ))
    }
}

pub fn ensure_true(condition: bool, message: Option<&str>) -> HarnessResult<()> {
    ensure(condition, Some(message.unwrap_or("Expected true")))
}

pub fn ensure_false(condition: bool, message: Option<&str>) -> HarnessResult<()> {
    ensure(!condition, Some(message.unwrap_or("Expected false")))
}

pub fn ensure_eq<T>(actual: T, expected: T, message: Option<&str>) -> HarnessResult<()>
where
    T: PartialEq + Display,
{
    if actual == expected {
        return Ok(());
    }
    Err(HarnessError::Assertion(match message {
        Some(message) => message.to_string(),
        None => format!("Expected {}, got {}", expected, actual),
    }))
}

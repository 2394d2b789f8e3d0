//! Validation error types and boundary checks
//!
//! Inputs are checked here before anything reaches storage. The database
//! schema only enforces NOT NULL and enum membership.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Loose shape check: something@something.tld, no whitespace.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid email regex"));

/// Validation error for domain inputs
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// String doesn't match required format (e.g., email)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Numeric value outside its allowed interval
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Numeric value below zero
    Negative { field: &'static str },

    /// Two related fields contradict each other
    Inconsistent { field: &'static str, reason: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{} must be between {} and {}, got {}", field, min, max, value),
            Self::Negative { field } => write!(f, "{} cannot be negative", field),
            Self::Inconsistent { field, reason } => write!(f, "{}: {}", field, reason),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Reject empty or whitespace-only strings.
pub fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

/// Reject empty strings and anything that doesn't look like an email address.
pub fn email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    non_empty(field, value)?;
    if !EMAIL_RE.is_match(value) {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must be a valid email address",
        });
    }
    Ok(())
}

/// Scores and rates live in `[0.0, 1.0]`.
pub fn unit_interval(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(())
}

pub fn non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_nan() || value < 0.0 {
        return Err(ValidationError::Negative { field });
    }
    Ok(())
}

pub fn non_negative_int(field: &'static str, value: i32) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::Negative { field });
    }
    Ok(())
}

//! Operand validation for arithmetic requests.
//!
//! Checks presence and numeric shape of the raw query-string parameters
//! before any computation runs. The `Display` text of each error variant is
//! the user-facing message, so the wording is part of the service contract.

use thiserror::Error;

/// Operand validation failure
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// One or both operands missing or empty
    #[error("Both num1 and num2 are required.")]
    MissingOperands,

    /// One or both operands present but not numeric
    #[error("Both num1 and num2 should be valid numbers.")]
    NonNumericOperands,

    /// Single-operand form: operand missing, empty, or not numeric
    #[error("num1 is required and should be a valid number.")]
    InvalidSingleOperand,
}

/// Parse one raw parameter as an IEEE-754 double
///
/// A value that parses to NaN is treated as non-numeric; infinities are
/// accepted.
fn parse_operand(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn is_present(raw: Option<&str>) -> bool {
    raw.is_some_and(|s| !s.trim().is_empty())
}

/// Validate a two-operand request
///
/// Both parameters must be present, non-empty, and parseable as doubles.
/// Presence is checked before shape so a missing parameter never reports as
/// non-numeric.
pub fn validate_pair(num1: Option<&str>, num2: Option<&str>) -> Result<(f64, f64), ValidationError> {
    if !is_present(num1) || !is_present(num2) {
        return Err(ValidationError::MissingOperands);
    }

    // Presence checked above, so unwrap_or_default never fires
    let a = parse_operand(num1.unwrap_or_default());
    let b = parse_operand(num2.unwrap_or_default());

    match (a, b) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(ValidationError::NonNumericOperands),
    }
}

/// Validate a single-operand request (square root)
pub fn validate_single(num1: Option<&str>) -> Result<f64, ValidationError> {
    if !is_present(num1) {
        return Err(ValidationError::InvalidSingleOperand);
    }

    parse_operand(num1.unwrap_or_default()).ok_or(ValidationError::InvalidSingleOperand)
}

// crates/charsheet-core/src/core/qualifier.rs
// ============================================================================
// Module: Qualifier Values
// Description: Parsing and rendering helpers for comparison operands.
// Purpose: Give every qualifier kind one exact text form and one parse path.
// Dependencies: bigdecimal, thiserror
// ============================================================================

//! ## Overview
//! Qualifiers are the operands rule authors type into criteria. Integers are
//! `i64`, decimals are exact [`BigDecimal`] values, and weights are parsed in
//! [`crate::core::weight`]. Parsing never rounds; rendering uses plain
//! notation and trims redundant trailing zeros so `1.50` and `1.5` display
//! identically.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::str::FromStr;

use bigdecimal::BigDecimal;
use thiserror::Error;

use crate::core::attribute::ValueKind;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when a qualifier cannot be parsed from authored input.
///
/// # Invariants
/// - Variants carry the offending input verbatim (trimmed) for editor feedback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QualifierParseError {
    /// Input was empty or whitespace.
    #[error("qualifier is empty")]
    Empty,
    /// Input is not a 64-bit integer.
    #[error("invalid integer qualifier: {0}")]
    InvalidInteger(String),
    /// Input is not a decimal number.
    #[error("invalid decimal qualifier: {0}")]
    InvalidDecimal(String),
    /// Weight unit abbreviation is not recognized.
    #[error("unknown weight unit: {0}")]
    UnknownUnit(String),
    /// Persisted qualifier has the wrong JSON shape for its kind.
    #[error("expected {expected} qualifier, found {found}")]
    UnexpectedShape {
        /// Kind the criteria requires.
        expected: ValueKind,
        /// JSON shape that was found.
        found: &'static str,
    },
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses an integer qualifier, ignoring surrounding whitespace.
///
/// # Errors
///
/// Returns [`QualifierParseError`] when the text is empty or not an `i64`.
pub fn parse_integer(text: &str) -> Result<i64, QualifierParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(QualifierParseError::Empty);
    }
    trimmed.parse::<i64>().map_err(|_| QualifierParseError::InvalidInteger(trimmed.to_string()))
}

/// Parses an exact decimal qualifier, ignoring surrounding whitespace.
///
/// # Errors
///
/// Returns [`QualifierParseError`] when the text is empty or not a decimal.
pub fn parse_decimal(text: &str) -> Result<BigDecimal, QualifierParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(QualifierParseError::Empty);
    }
    BigDecimal::from_str(trimmed).map_err(|_| QualifierParseError::InvalidDecimal(trimmed.to_string()))
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders a decimal in plain notation without trailing fractional zeros.
///
/// Exponent notation is never produced, so every rendering reparses through
/// [`parse_decimal`] and [`crate::core::weight::Weight`] unchanged.
#[must_use]
pub fn format_decimal(value: &BigDecimal) -> String {
    let rendered = value.to_plain_string();
    if !rendered.contains('.') {
        return rendered;
    }
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" { "0".to_string() } else { trimmed.to_string() }
}

/// Names the JSON shape of a persisted value for error messages.
pub(crate) const fn json_shape(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

// crates/charsheet-core/src/core/attribute.rs
// ============================================================================
// Module: Character Attributes
// Description: Attribute paths and typed attribute values.
// Purpose: Give prerequisites and level definitions a stable way to name data.
// Dependencies: bigdecimal, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Character data is addressed by dot-separated [`AttributePath`]s such as
//! `attributes.DX` or `skills`. Values are typed: text, integer, exact
//! decimal, weight, or a list of values. Paths are validated on construction
//! so an evaluation never meets a malformed name.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::qualifier::json_shape;
use crate::core::qualifier::parse_decimal;
use crate::core::weight::Weight;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while building an evaluation context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// Path text was empty.
    #[error("attribute path is empty")]
    EmptyPath,
    /// Path contained an empty or blank segment.
    #[error("attribute path has an empty segment: {0}")]
    EmptySegment(String),
    /// Value could not be converted into an attribute value.
    #[error("invalid value for attribute {path}: {reason}")]
    InvalidValue {
        /// Attribute path being loaded.
        path: String,
        /// Human-readable reason.
        reason: String,
    },
    /// Snapshot document was not a JSON object.
    #[error("attribute snapshot must be a JSON object")]
    NotAnObject,
    /// Snapshot document could not be parsed.
    #[error("invalid attribute snapshot: {0}")]
    Parse(String),
}

// ============================================================================
// SECTION: Value Kind
// ============================================================================

/// Kind tag shared by attribute values and criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Free text.
    Text,
    /// 64-bit signed integer.
    Integer,
    /// Exact decimal.
    Decimal,
    /// Weight with unit.
    Weight,
    /// List of values.
    List,
}

impl ValueKind {
    /// Returns the stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Weight => "weight",
            Self::List => "list",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Attribute Path
// ============================================================================

/// Dot-separated attribute name.
///
/// # Invariants
/// - Non-empty, with no empty or whitespace-only segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttributePath(String);

impl AttributePath {
    /// Parses and validates a path.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] when the path is empty or has a blank segment.
    pub fn parse(text: &str) -> Result<Self, ContextError> {
        if text.is_empty() {
            return Err(ContextError::EmptyPath);
        }
        if text.split('.').any(|segment| segment.trim().is_empty()) {
            return Err(ContextError::EmptySegment(text.to_string()));
        }
        Ok(Self(text.to_string()))
    }

    /// Returns the path text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the path segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Returns a child path with `segment` appended.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] when `segment` is empty or blank.
    pub fn join(&self, segment: &str) -> Result<Self, ContextError> {
        Self::parse(&format!("{}.{segment}", self.0))
    }
}

impl TryFrom<String> for AttributePath {
    type Error = ContextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AttributePath> for String {
    fn from(value: AttributePath) -> Self {
        value.0
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// SECTION: Attribute Value
// ============================================================================

/// Typed attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// Free text.
    Text(String),
    /// 64-bit signed integer.
    Integer(i64),
    /// Exact decimal.
    Decimal(BigDecimal),
    /// Weight with unit.
    Weight(Weight),
    /// List of values; matches when any element matches.
    List(Vec<Self>),
}

impl AttributeValue {
    /// Returns the value kind.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Integer(_) => ValueKind::Integer,
            Self::Decimal(_) => ValueKind::Decimal,
            Self::Weight(_) => ValueKind::Weight,
            Self::List(_) => ValueKind::List,
        }
    }

    /// Converts a JSON value.
    ///
    /// Strings become text, integral numbers become integers, other numbers
    /// become decimals, and arrays become lists. Objects with a single
    /// `decimal` or `weight` key carry exact decimals and weights. Returns
    /// `Ok(None)` for any other object so callers may treat it as a namespace.
    /// The literal decides the numeric kind: `5` is an integer even where a
    /// decimal is meant, which needs `{"decimal": "5"}`.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::InvalidValue`] for booleans, nulls, and tagged
    /// objects whose payload does not parse.
    pub fn from_json(path: &str, value: &Value) -> Result<Option<Self>, ContextError> {
        let invalid = |reason: String| ContextError::InvalidValue {
            path: path.to_string(),
            reason,
        };
        match value {
            Value::String(text) => Ok(Some(Self::Text(text.clone()))),
            Value::Number(number) => {
                if let Some(integer) = number.as_i64() {
                    return Ok(Some(Self::Integer(integer)));
                }
                parse_decimal(&number.to_string())
                    .map(|decimal| Some(Self::Decimal(decimal)))
                    .map_err(|err| invalid(err.to_string()))
            }
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match Self::from_json(path, item)? {
                        Some(value) => out.push(value),
                        None => return Err(invalid("lists cannot hold objects".to_string())),
                    }
                }
                Ok(Some(Self::List(out)))
            }
            Value::Object(map) if map.len() == 1 => {
                if let Some(decimal) = map.get("decimal") {
                    let text = match decimal {
                        Value::String(text) => text.clone(),
                        Value::Number(number) => number.to_string(),
                        other => return Err(invalid(format!("decimal must be text, found {}", json_shape(other)))),
                    };
                    return parse_decimal(&text)
                        .map(|decimal| Some(Self::Decimal(decimal)))
                        .map_err(|err| invalid(err.to_string()));
                }
                if let Some(weight) = map.get("weight") {
                    let Value::String(text) = weight else {
                        return Err(invalid(format!("weight must be text, found {}", json_shape(weight))));
                    };
                    return text
                        .parse::<Weight>()
                        .map(|weight| Some(Self::Weight(weight)))
                        .map_err(|err| invalid(err.to_string()));
                }
                Ok(None)
            }
            Value::Object(_) => Ok(None),
            Value::Null | Value::Bool(_) => {
                Err(invalid(format!("unsupported {} value", json_shape(value))))
            }
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<BigDecimal> for AttributeValue {
    fn from(value: BigDecimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<Weight> for AttributeValue {
    fn from(value: Weight) -> Self {
        Self::Weight(value)
    }
}

// crates/charsheet-core/src/core/criteria.rs
// ============================================================================
// Module: Criteria
// Description: Compare type bound to an owned qualifier, per value kind.
// Purpose: Test candidate values and describe the test in plain text.
// Dependencies: bigdecimal, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`Criteria<K>`] pairs a compare type with a qualifier of kind `K`. The kind
//! parameter makes mixing a text qualifier with a numeric candidate a compile
//! error. [`AnyCriteria`] erases the kind for data-driven rules; at that
//! boundary a kind mismatch surfaces as [`CriteriaError::KindMismatch`] and is
//! never coerced into a boolean.
//!
//! Edits replace values wholesale. A failed text edit leaves the previous
//! qualifier in place.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde_json::Value;
use thiserror::Error;

use crate::core::attribute::AttributeValue;
use crate::core::attribute::ValueKind;
use crate::core::compare::NumericCompareType;
use crate::core::compare::StringCompareType;
use crate::core::compare::UnknownCompareType;
use crate::core::qualifier::QualifierParseError;
use crate::core::qualifier::format_decimal;
use crate::core::qualifier::json_shape;
use crate::core::qualifier::parse_decimal;
use crate::core::qualifier::parse_integer;
use crate::core::weight::Weight;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while matching criteria against attribute values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    /// Criteria and candidate have different kinds.
    #[error("kind mismatch: {expected} criteria cannot match a {found} value")]
    KindMismatch {
        /// Kind the criteria compares.
        expected: ValueKind,
        /// Kind of the candidate value.
        found: ValueKind,
    },
}

// ============================================================================
// SECTION: Criteria Kinds
// ============================================================================

/// Per-kind behavior for [`Criteria`].
pub trait CriteriaKind {
    /// Compare type set for this kind.
    type Compare: Copy + Default + Eq + fmt::Debug + fmt::Display + FromStr<Err = UnknownCompareType>;
    /// Qualifier and candidate value type.
    type Value: Clone + Default + Eq + fmt::Debug;

    /// Kind tag for error reporting.
    const KIND: ValueKind;

    /// Tests `candidate` against `qualifier`.
    fn matches(compare: Self::Compare, qualifier: &Self::Value, candidate: &Self::Value) -> bool;

    /// Renders the description for `subject`.
    fn describe(compare: Self::Compare, subject: &str, qualifier: &Self::Value) -> String;

    /// Parses a qualifier from editor text.
    ///
    /// # Errors
    ///
    /// Returns [`QualifierParseError`] when the text does not parse.
    fn parse_qualifier(text: &str) -> Result<Self::Value, QualifierParseError>;

    /// Borrows the candidate from an attribute value of this kind.
    fn candidate(value: &AttributeValue) -> Option<&Self::Value>;

    /// Encodes a qualifier for a persisted record.
    fn qualifier_to_json(qualifier: &Self::Value) -> Value;

    /// Decodes a qualifier from a persisted record.
    ///
    /// # Errors
    ///
    /// Returns [`QualifierParseError`] when the JSON has the wrong shape or text.
    fn qualifier_from_json(value: &Value) -> Result<Self::Value, QualifierParseError>;
}

/// Reads a persisted numeric-like qualifier as text.
fn numeric_text(kind: ValueKind, value: &Value) -> Result<String, QualifierParseError> {
    match value {
        Value::Number(number) => Ok(number.to_string()),
        Value::String(text) => Ok(text.clone()),
        other => Err(QualifierParseError::UnexpectedShape {
            expected: kind,
            found: json_shape(other),
        }),
    }
}

/// Text criteria kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextKind;

impl CriteriaKind for TextKind {
    type Compare = StringCompareType;
    type Value = String;

    const KIND: ValueKind = ValueKind::Text;

    fn matches(compare: Self::Compare, qualifier: &Self::Value, candidate: &Self::Value) -> bool {
        compare.matches(qualifier, candidate)
    }

    fn describe(compare: Self::Compare, subject: &str, qualifier: &Self::Value) -> String {
        compare.describe(subject, qualifier)
    }

    fn parse_qualifier(text: &str) -> Result<Self::Value, QualifierParseError> {
        Ok(text.to_string())
    }

    fn candidate(value: &AttributeValue) -> Option<&Self::Value> {
        match value {
            AttributeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    fn qualifier_to_json(qualifier: &Self::Value) -> Value {
        Value::String(qualifier.clone())
    }

    fn qualifier_from_json(value: &Value) -> Result<Self::Value, QualifierParseError> {
        match value {
            Value::String(text) => Ok(text.clone()),
            other => Err(QualifierParseError::UnexpectedShape {
                expected: Self::KIND,
                found: json_shape(other),
            }),
        }
    }
}

/// Integer criteria kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntegerKind;

impl CriteriaKind for IntegerKind {
    type Compare = NumericCompareType;
    type Value = i64;

    const KIND: ValueKind = ValueKind::Integer;

    fn matches(compare: Self::Compare, qualifier: &Self::Value, candidate: &Self::Value) -> bool {
        compare.matches(qualifier, candidate)
    }

    fn describe(compare: Self::Compare, subject: &str, qualifier: &Self::Value) -> String {
        compare.describe(subject, &qualifier.to_string())
    }

    fn parse_qualifier(text: &str) -> Result<Self::Value, QualifierParseError> {
        parse_integer(text)
    }

    fn candidate(value: &AttributeValue) -> Option<&Self::Value> {
        match value {
            AttributeValue::Integer(integer) => Some(integer),
            _ => None,
        }
    }

    fn qualifier_to_json(qualifier: &Self::Value) -> Value {
        Value::from(*qualifier)
    }

    fn qualifier_from_json(value: &Value) -> Result<Self::Value, QualifierParseError> {
        parse_integer(&numeric_text(Self::KIND, value)?)
    }
}

/// Exact decimal criteria kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecimalKind;

impl CriteriaKind for DecimalKind {
    type Compare = NumericCompareType;
    type Value = BigDecimal;

    const KIND: ValueKind = ValueKind::Decimal;

    fn matches(compare: Self::Compare, qualifier: &Self::Value, candidate: &Self::Value) -> bool {
        compare.matches(qualifier, candidate)
    }

    fn describe(compare: Self::Compare, subject: &str, qualifier: &Self::Value) -> String {
        compare.describe(subject, &format_decimal(qualifier))
    }

    fn parse_qualifier(text: &str) -> Result<Self::Value, QualifierParseError> {
        parse_decimal(text)
    }

    fn candidate(value: &AttributeValue) -> Option<&Self::Value> {
        match value {
            AttributeValue::Decimal(decimal) => Some(decimal),
            _ => None,
        }
    }

    fn qualifier_to_json(qualifier: &Self::Value) -> Value {
        Value::String(format_decimal(qualifier))
    }

    fn qualifier_from_json(value: &Value) -> Result<Self::Value, QualifierParseError> {
        parse_decimal(&numeric_text(Self::KIND, value)?)
    }
}

/// Weight criteria kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeightKind;

impl CriteriaKind for WeightKind {
    type Compare = NumericCompareType;
    type Value = Weight;

    const KIND: ValueKind = ValueKind::Weight;

    fn matches(compare: Self::Compare, qualifier: &Self::Value, candidate: &Self::Value) -> bool {
        compare.matches(qualifier, candidate)
    }

    fn describe(compare: Self::Compare, subject: &str, qualifier: &Self::Value) -> String {
        compare.describe(subject, &qualifier.to_string())
    }

    fn parse_qualifier(text: &str) -> Result<Self::Value, QualifierParseError> {
        text.parse()
    }

    fn candidate(value: &AttributeValue) -> Option<&Self::Value> {
        match value {
            AttributeValue::Weight(weight) => Some(weight),
            _ => None,
        }
    }

    fn qualifier_to_json(qualifier: &Self::Value) -> Value {
        Value::String(qualifier.to_string())
    }

    fn qualifier_from_json(value: &Value) -> Result<Self::Value, QualifierParseError> {
        numeric_text(Self::KIND, value)?.parse()
    }
}

// ============================================================================
// SECTION: Criteria
// ============================================================================

/// Compare type bound to an owned qualifier.
///
/// # Invariants
/// - Exactly one compare type is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criteria<K: CriteriaKind> {
    /// Active compare type.
    compare: K::Compare,
    /// Owned qualifier.
    qualifier: K::Value,
}

/// Text criteria.
pub type StringCriteria = Criteria<TextKind>;
/// Integer criteria.
pub type IntegerCriteria = Criteria<IntegerKind>;
/// Exact decimal criteria.
pub type DecimalCriteria = Criteria<DecimalKind>;
/// Weight criteria.
pub type WeightCriteria = Criteria<WeightKind>;

impl<K: CriteriaKind> Default for Criteria<K> {
    fn default() -> Self {
        Self::new(K::Compare::default(), K::Value::default())
    }
}

impl<K: CriteriaKind> Criteria<K> {
    /// Creates criteria from a compare type and qualifier.
    #[must_use]
    pub const fn new(compare: K::Compare, qualifier: K::Value) -> Self {
        Self {
            compare,
            qualifier,
        }
    }

    /// Returns the active compare type.
    #[must_use]
    pub fn compare_type(&self) -> K::Compare {
        self.compare
    }

    /// Returns the qualifier.
    #[must_use]
    pub const fn qualifier(&self) -> &K::Value {
        &self.qualifier
    }

    /// Tests a candidate of the same kind.
    #[must_use]
    pub fn matches(&self, candidate: &K::Value) -> bool {
        K::matches(self.compare, &self.qualifier, candidate)
    }

    /// Tests a scalar attribute value.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError::KindMismatch`] when the value is another kind.
    pub fn matches_attribute(&self, value: &AttributeValue) -> Result<bool, CriteriaError> {
        K::candidate(value).map(|candidate| self.matches(candidate)).ok_or(
            CriteriaError::KindMismatch {
                expected: K::KIND,
                found: value.kind(),
            },
        )
    }

    /// Describes the test applied to `subject`.
    #[must_use]
    pub fn describe(&self, subject: &str) -> String {
        K::describe(self.compare, subject, &self.qualifier)
    }

    /// Replaces the compare type.
    pub fn set_compare_type(&mut self, compare: K::Compare) {
        self.compare = compare;
    }

    /// Replaces the qualifier.
    pub fn set_qualifier(&mut self, qualifier: K::Value) {
        self.qualifier = qualifier;
    }

    /// Replaces the qualifier from editor text.
    ///
    /// # Errors
    ///
    /// Returns [`QualifierParseError`] and keeps the previous qualifier when
    /// the text does not parse.
    pub fn set_qualifier_text(&mut self, text: &str) -> Result<(), QualifierParseError> {
        self.qualifier = K::parse_qualifier(text)?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Kind-Erased Criteria
// ============================================================================

/// Criteria of any kind, for data-driven rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyCriteria {
    /// Text criteria.
    Text(StringCriteria),
    /// Integer criteria.
    Integer(IntegerCriteria),
    /// Exact decimal criteria.
    Decimal(DecimalCriteria),
    /// Weight criteria.
    Weight(WeightCriteria),
}

impl AnyCriteria {
    /// Returns the criteria kind.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Integer(_) => ValueKind::Integer,
            Self::Decimal(_) => ValueKind::Decimal,
            Self::Weight(_) => ValueKind::Weight,
        }
    }

    /// Default criteria for a kind: `any` for text, `at_least` zero otherwise.
    ///
    /// Returns `None` for [`ValueKind::List`], which has no criteria.
    #[must_use]
    pub fn default_for(kind: ValueKind) -> Option<Self> {
        match kind {
            ValueKind::Text => Some(Self::Text(Criteria::default())),
            ValueKind::Integer => Some(Self::Integer(Criteria::default())),
            ValueKind::Decimal => Some(Self::Decimal(Criteria::default())),
            ValueKind::Weight => Some(Self::Weight(Criteria::default())),
            ValueKind::List => None,
        }
    }

    /// Returns the persisted compare type name.
    #[must_use]
    pub const fn compare_name(&self) -> &'static str {
        match self {
            Self::Text(criteria) => criteria.compare.name(),
            Self::Integer(criteria) => criteria.compare.name(),
            Self::Decimal(criteria) => criteria.compare.name(),
            Self::Weight(criteria) => criteria.compare.name(),
        }
    }

    /// Tests an attribute value.
    ///
    /// Lists match when any element matches; an empty list does not match.
    /// Every element is checked so a mismatched element is always reported.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError::KindMismatch`] when a scalar has another kind.
    pub fn matches_value(&self, value: &AttributeValue) -> Result<bool, CriteriaError> {
        if let AttributeValue::List(items) = value {
            let mut matched = false;
            for item in items {
                matched |= self.matches_value(item)?;
            }
            return Ok(matched);
        }
        match self {
            Self::Text(criteria) => criteria.matches_attribute(value),
            Self::Integer(criteria) => criteria.matches_attribute(value),
            Self::Decimal(criteria) => criteria.matches_attribute(value),
            Self::Weight(criteria) => criteria.matches_attribute(value),
        }
    }

    /// Describes the test applied to `subject`.
    #[must_use]
    pub fn describe(&self, subject: &str) -> String {
        match self {
            Self::Text(criteria) => criteria.describe(subject),
            Self::Integer(criteria) => criteria.describe(subject),
            Self::Decimal(criteria) => criteria.describe(subject),
            Self::Weight(criteria) => criteria.describe(subject),
        }
    }

    /// Replaces the qualifier from editor text.
    ///
    /// # Errors
    ///
    /// Returns [`QualifierParseError`] and keeps the previous qualifier when
    /// the text does not parse.
    pub fn set_qualifier_text(&mut self, text: &str) -> Result<(), QualifierParseError> {
        match self {
            Self::Text(criteria) => criteria.set_qualifier_text(text),
            Self::Integer(criteria) => criteria.set_qualifier_text(text),
            Self::Decimal(criteria) => criteria.set_qualifier_text(text),
            Self::Weight(criteria) => criteria.set_qualifier_text(text),
        }
    }
}

impl From<StringCriteria> for AnyCriteria {
    fn from(value: StringCriteria) -> Self {
        Self::Text(value)
    }
}

impl From<IntegerCriteria> for AnyCriteria {
    fn from(value: IntegerCriteria) -> Self {
        Self::Integer(value)
    }
}

impl From<DecimalCriteria> for AnyCriteria {
    fn from(value: DecimalCriteria) -> Self {
        Self::Decimal(value)
    }
}

impl From<WeightCriteria> for AnyCriteria {
    fn from(value: WeightCriteria) -> Self {
        Self::Weight(value)
    }
}

// crates/charsheet-core/src/runtime/context.rs
// ============================================================================
// Module: Attribute Snapshot
// Description: In-memory evaluation context loaded ahead of evaluation.
// Purpose: Hold every attribute a rule may read so evaluation never blocks.
// Dependencies: serde_json, crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`AttributeSnapshot`] is an ordered map from attribute paths to values. It
//! loads from a JSON object; nested objects become dotted paths, so
//! `{"attributes": {"DX": 12}}` defines `attributes.DX`. Objects with a single
//! `decimal` or `weight` key are values, not namespaces.
//!
//! The kind of a bare JSON number follows its literal: `5` is an integer and
//! `5.0` is a decimal. Kinds are never promoted at match time, so an attribute
//! tested by decimal criteria must be written `{"decimal": "5"}` when its
//! value is whole.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Map;
use serde_json::Value;

use crate::core::attribute::AttributePath;
use crate::core::attribute::AttributeValue;
use crate::core::attribute::ContextError;
use crate::interfaces::EvaluationContext;

// ============================================================================
// SECTION: Attribute Snapshot
// ============================================================================

/// Ordered attribute map implementing [`EvaluationContext`].
///
/// # Invariants
/// - Integer JSON literals load as integers and other numbers as decimals. Decimal
///   attributes with whole values need the `{"decimal": ..}` tag, or decimal
///   criteria report a kind mismatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSnapshot {
    /// Attribute values keyed by path.
    values: BTreeMap<AttributePath, AttributeValue>,
}

impl AttributeSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Inserts or replaces a value.
    pub fn insert(&mut self, path: AttributePath, value: impl Into<AttributeValue>) {
        self.values.insert(path, value.into());
    }

    /// Inserts a value by path text, returning the updated snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] when the path is invalid.
    pub fn with(mut self, path: &str, value: impl Into<AttributeValue>) -> Result<Self, ContextError> {
        self.insert(AttributePath::parse(path)?, value);
        Ok(self)
    }

    /// Returns the number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when the snapshot holds no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates attributes in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&AttributePath, &AttributeValue)> {
        self.values.iter()
    }

    /// Loads a snapshot from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] when the document is not an object, a key is
    /// not a valid path, or a value is unsupported.
    pub fn from_json_value(document: &Value) -> Result<Self, ContextError> {
        let Value::Object(map) = document else {
            return Err(ContextError::NotAnObject);
        };
        let mut snapshot = Self::new();
        snapshot.load_object(None, map)?;
        Ok(snapshot)
    }

    /// Parses and loads a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] when the text is not valid JSON or fails
    /// [`AttributeSnapshot::from_json_value`].
    pub fn from_json_str(text: &str) -> Result<Self, ContextError> {
        let document: Value =
            serde_json::from_str(text).map_err(|err| ContextError::Parse(err.to_string()))?;
        Self::from_json_value(&document)
    }

    /// Loads one object level, recursing into namespaces.
    fn load_object(
        &mut self,
        prefix: Option<&AttributePath>,
        map: &Map<String, Value>,
    ) -> Result<(), ContextError> {
        for (key, value) in map {
            let path = match prefix {
                Some(prefix) => prefix.join(key)?,
                None => AttributePath::parse(key)?,
            };
            match AttributeValue::from_json(path.as_str(), value)? {
                Some(attribute) => {
                    self.values.insert(path, attribute);
                }
                None => {
                    if let Value::Object(inner) = value {
                        self.load_object(Some(&path), inner)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl EvaluationContext for AttributeSnapshot {
    fn resolve(&self, path: &AttributePath) -> Option<&AttributeValue> {
        self.values.get(path)
    }
}

// crates/prereq-logic/src/serde_support.rs
// ============================================================================
// Module: Requirement Serde Support
// Description: Structural validation and JSON/RON helpers for requirement trees.
// Purpose: Reject malformed trees before evaluation and round-trip authored files.
// Dependencies: serde::{Deserialize, Serialize}, serde_json, ron, thiserror
// ============================================================================

//! ## Overview
//! Deserialized requirements are untrusted authoring input. The validator
//! enforces a depth bound and the composite invariants (non-empty groups,
//! `1 <= min <= len`) so evaluation never meets a malformed tree.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::requirement::Requirement;

// ============================================================================
// SECTION: Serde Errors
// ============================================================================

/// Errors raised while validating or (de)serializing requirement trees
///
/// # Invariants
/// - None. Variants capture structured validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeError {
    /// The text could not be parsed or produced
    #[error("invalid requirement encoding: {0}")]
    Encoding(String),

    /// A composite node has no children
    #[error("empty {0} group is not allowed")]
    EmptyGroup(&'static str),

    /// Requirement tree too deep
    #[error("requirement tree too deep: {actual_depth} levels (max {max_depth})")]
    TooDeep {
        /// Maximum supported tree depth
        max_depth: usize,
        /// Depth encountered during validation
        actual_depth: usize,
    },

    /// Group count outside `1..=len`
    #[error("invalid group requirement: at least {min} of {total}")]
    InvalidGroup {
        /// Requested minimum
        min: u8,
        /// Children available
        total: usize,
    },
}

// ============================================================================
// SECTION: Serde Configuration
// ============================================================================

/// Structural limits applied by [`RequirementValidator`]
///
/// # Invariants
/// - No invariants are enforced; callers should choose safe bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerdeConfig {
    /// Maximum allowed nesting depth (root is depth 1)
    pub max_depth: usize,

    /// Whether empty And/Or groups are accepted
    pub allow_empty_logical: bool,
}

impl Default for SerdeConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            allow_empty_logical: false,
        }
    }
}

// ============================================================================
// SECTION: Requirement Validator
// ============================================================================

/// Structural validator for requirement trees
///
/// # Invariants
/// - Uses the stored [`SerdeConfig`] for all validation decisions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequirementValidator {
    /// Validation limits.
    config: SerdeConfig,
}

impl RequirementValidator {
    /// Creates a validator with the given limits
    #[must_use]
    pub const fn new(config: SerdeConfig) -> Self {
        Self {
            config,
        }
    }

    /// Returns the active limits
    #[must_use]
    pub const fn config(&self) -> SerdeConfig {
        self.config
    }

    /// Validates a requirement tree
    ///
    /// Domain predicates are not inspected.
    ///
    /// # Errors
    ///
    /// Returns [`SerdeError`] for the first structural violation found in
    /// declaration order.
    pub fn validate<P>(&self, requirement: &Requirement<P>) -> Result<(), SerdeError> {
        self.validate_node(requirement, 1)
    }

    /// Validates one node and recurses into its children.
    fn validate_node<P>(&self, requirement: &Requirement<P>, depth: usize) -> Result<(), SerdeError> {
        if depth > self.config.max_depth {
            return Err(SerdeError::TooDeep {
                max_depth: self.config.max_depth,
                actual_depth: depth,
            });
        }

        match requirement {
            Requirement::And(reqs) | Requirement::Or(reqs) => {
                if reqs.is_empty() && !self.config.allow_empty_logical {
                    let label = if matches!(requirement, Requirement::And(_)) { "all" } else { "any" };
                    return Err(SerdeError::EmptyGroup(label));
                }
                for req in reqs {
                    self.validate_node(req, depth + 1)?;
                }
            }
            Requirement::RequireGroup {
                min,
                reqs,
            } => {
                if *min == 0 || usize::from(*min) > reqs.len() {
                    return Err(SerdeError::InvalidGroup {
                        min: *min,
                        total: reqs.len(),
                    });
                }
                for req in reqs {
                    self.validate_node(req, depth + 1)?;
                }
            }
            Requirement::Not(req) => self.validate_node(req, depth + 1)?,
            Requirement::Predicate(_) => {}
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Serializer
// ============================================================================

/// JSON/RON (de)serializer that validates on the way in and out
///
/// # Invariants
/// - Never returns a tree that fails [`RequirementValidator::validate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RequirementSerializer {
    /// Validator applied to every tree.
    validator: RequirementValidator,
}

impl RequirementSerializer {
    /// Creates a serializer with the given limits
    #[must_use]
    pub const fn new(config: SerdeConfig) -> Self {
        Self {
            validator: RequirementValidator::new(config),
        }
    }

    /// Serializes a requirement to pretty JSON
    ///
    /// # Errors
    ///
    /// Returns [`SerdeError`] if validation or encoding fails.
    pub fn to_json<P: Serialize>(&self, requirement: &Requirement<P>) -> Result<String, SerdeError> {
        self.validator.validate(requirement)?;
        serde_json::to_string_pretty(requirement).map_err(|e| SerdeError::Encoding(e.to_string()))
    }

    /// Deserializes a requirement from JSON
    ///
    /// # Errors
    ///
    /// Returns [`SerdeError`] if parsing or validation fails.
    pub fn from_json<P>(&self, json: &str) -> Result<Requirement<P>, SerdeError>
    where
        P: for<'de> Deserialize<'de>,
    {
        let requirement: Requirement<P> =
            serde_json::from_str(json).map_err(|e| SerdeError::Encoding(e.to_string()))?;
        self.validator.validate(&requirement)?;
        Ok(requirement)
    }

    /// Serializes a requirement to pretty RON
    ///
    /// # Errors
    ///
    /// Returns [`SerdeError`] if validation or encoding fails.
    pub fn to_ron<P: Serialize>(&self, requirement: &Requirement<P>) -> Result<String, SerdeError> {
        self.validator.validate(requirement)?;
        ron::ser::to_string_pretty(requirement, ron::ser::PrettyConfig::default())
            .map_err(|e| SerdeError::Encoding(e.to_string()))
    }

    /// Deserializes a requirement from RON
    ///
    /// # Errors
    ///
    /// Returns [`SerdeError`] if parsing or validation fails.
    pub fn from_ron<P>(&self, text: &str) -> Result<Requirement<P>, SerdeError>
    where
        P: for<'de> Deserialize<'de>,
    {
        let requirement: Requirement<P> =
            ron::from_str(text).map_err(|e| SerdeError::Encoding(e.to_string()))?;
        self.validator.validate(&requirement)?;
        Ok(requirement)
    }
}

// ============================================================================
// SECTION: Convenience
// ============================================================================

/// Default-configured helpers
pub mod convenience {
    use super::Deserialize;
    use super::Requirement;
    use super::RequirementSerializer;
    use super::RequirementValidator;
    use super::SerdeError;
    use super::Serialize;

    /// Serializes to JSON with default limits
    ///
    /// # Errors
    ///
    /// Returns [`SerdeError`] if validation or encoding fails.
    pub fn to_json<P: Serialize>(requirement: &Requirement<P>) -> Result<String, SerdeError> {
        RequirementSerializer::default().to_json(requirement)
    }

    /// Deserializes from JSON with default limits
    ///
    /// # Errors
    ///
    /// Returns [`SerdeError`] if parsing or validation fails.
    pub fn from_json<P: for<'de> Deserialize<'de>>(json: &str) -> Result<Requirement<P>, SerdeError> {
        RequirementSerializer::default().from_json(json)
    }

    /// Serializes to RON with default limits
    ///
    /// # Errors
    ///
    /// Returns [`SerdeError`] if validation or encoding fails.
    pub fn to_ron<P: Serialize>(requirement: &Requirement<P>) -> Result<String, SerdeError> {
        RequirementSerializer::default().to_ron(requirement)
    }

    /// Deserializes from RON with default limits
    ///
    /// # Errors
    ///
    /// Returns [`SerdeError`] if parsing or validation fails.
    pub fn from_ron<P: for<'de> Deserialize<'de>>(text: &str) -> Result<Requirement<P>, SerdeError> {
        RequirementSerializer::default().from_ron(text)
    }

    /// Quick validity check with default limits
    pub fn is_valid<P>(requirement: &Requirement<P>) -> bool {
        RequirementValidator::default().validate(requirement).is_ok()
    }
}

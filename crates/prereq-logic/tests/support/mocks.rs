// crates/prereq-logic/tests/support/mocks.rs
// ============================================================================
// Module: Mock Predicates
// Description: Domain-agnostic predicates over an integer slice.
// ============================================================================
//! ## Overview
//! Mock predicate types used by integration tests. The context is a slice of
//! integers; an index past the end counts as an absent subject.

use prereq_logic::Describe;
use prereq_logic::PredicateEval;
use prereq_logic::PredicateOutcome;
use serde::Deserialize;
use serde::Serialize;

// ========================================================================
// Mock Predicate Types
// ========================================================================

/// Simple mock predicate for testing the requirement algebra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MockPredicate {
    /// Always holds.
    AlwaysTrue,
    /// Never holds.
    AlwaysFalse,
    /// Holds when the slot exists and is at least the threshold.
    AtLeast {
        /// Index into the context slice.
        slot: usize,
        /// Inclusive lower bound.
        threshold: i32,
    },
    /// Always fails with an error.
    Broken,
}

/// Error raised by [`MockPredicate::Broken`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockError;

impl std::fmt::Display for MockError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("broken predicate")
    }
}

impl std::error::Error for MockError {}

impl PredicateEval for MockPredicate {
    type Context<'a> = [i32];
    type Error = MockError;

    fn eval(&self, context: &Self::Context<'_>) -> Result<PredicateOutcome, Self::Error> {
        match *self {
            Self::AlwaysTrue => Ok(PredicateOutcome::Satisfied),
            Self::AlwaysFalse => Ok(PredicateOutcome::Unsatisfied),
            Self::AtLeast {
                slot,
                threshold,
            } => Ok(context
                .get(slot)
                .map_or(PredicateOutcome::Unresolved, |value| PredicateOutcome::from(*value >= threshold))),
            Self::Broken => Err(MockError),
        }
    }
}

impl Describe for MockPredicate {
    fn describe(&self) -> String {
        match *self {
            Self::AlwaysTrue => "always".to_string(),
            Self::AlwaysFalse => "never".to_string(),
            Self::AtLeast {
                slot,
                threshold,
            } => format!("slot {slot} is at least {threshold}"),
            Self::Broken => "broken".to_string(),
        }
    }
}

/// Shorthand for an [`MockPredicate::AtLeast`] leaf.
#[must_use]
pub const fn at_least(slot: usize, threshold: i32) -> MockPredicate {
    MockPredicate::AtLeast {
        slot,
        threshold,
    }
}

// crates/prereq-logic/src/lib.rs
// ============================================================================
// Module: Prerequisite Logic Root
// Description: Public API surface for the requirement tree subsystem.
// Purpose: Wire together tree types, builders, explanations, and serde helpers.
// Dependencies: crate::{builder, explain, requirement, serde_support, traits}
// ============================================================================

//! ## Overview
//! Domain-agnostic boolean requirement trees. Leaves are typed predicates
//! supplied by the caller; composites are "all of", "any of", and "at least N
//! of", each optionally negated. Evaluation yields a per-node result tree that
//! renders into deterministic explanation text.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod builder;
pub mod explain;
pub mod requirement;
pub mod serde_support;
pub mod traits;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use builder::GroupBuilder;
pub use builder::GroupKind;
pub use builder::RequirementBuilder;
pub use explain::ExplanationStyle;
pub use explain::describe_node;
pub use explain::render_explanation;
pub use explain::render_lines;
pub use requirement::Evaluation;
pub use requirement::Requirement;
pub use serde_support::RequirementSerializer;
pub use serde_support::RequirementValidator;
pub use serde_support::SerdeConfig;
pub use serde_support::SerdeError;
pub use traits::Describe;
pub use traits::NoopTrace;
pub use traits::OutcomeTally;
pub use traits::PredicateEval;
pub use traits::PredicateOutcome;
pub use traits::RequirementTrace;

// ============================================================================
// SECTION: Convenience DSL
// ============================================================================

/// Convenience functions for creating requirements without builders
pub mod convenience {
    use super::Requirement;

    /// Creates a requirement requiring all of the given requirements
    #[must_use]
    pub fn all<P>(requirements: Vec<Requirement<P>>) -> Requirement<P> {
        Requirement::and(requirements)
    }

    /// Creates a requirement requiring any of the given requirements
    #[must_use]
    pub fn any<P>(requirements: Vec<Requirement<P>>) -> Requirement<P> {
        Requirement::or(requirements)
    }

    /// Creates a requirement that inverts another requirement
    #[must_use]
    pub fn not<P>(requirement: Requirement<P>) -> Requirement<P> {
        Requirement::negate(requirement)
    }

    /// Creates a requirement requiring at least N of the given requirements
    #[must_use]
    pub fn at_least<P>(min: u8, requirements: Vec<Requirement<P>>) -> Requirement<P> {
        Requirement::require_group(min, requirements)
    }

    /// Creates a requirement from a predicate
    #[must_use]
    pub const fn predicate<P>(predicate: P) -> Requirement<P> {
        Requirement::predicate(predicate)
    }
}

// ============================================================================
// SECTION: Requirement Macro
// ============================================================================

/// Macro for compact requirement construction
///
/// Children are ordinary expressions, so nested groups call the macro again:
///
/// ```ignore
/// let req = requirement!(all [
///     requirement!(pred strength),
///     requirement!(any [requirement!(pred fireball), requirement!(not requirement!(pred cursed))]),
///     requirement!(at_least 2, [requirement!(pred a), requirement!(pred b), requirement!(pred c)]),
/// ]);
/// ```
#[macro_export]
macro_rules! requirement {
    (pred $pred:expr) => {
        $crate::requirement::Requirement::predicate($pred)
    };

    (not $req:expr) => {
        $crate::requirement::Requirement::negate($req)
    };

    (all [$($req:expr),* $(,)?]) => {
        $crate::requirement::Requirement::and(vec![$($req),*])
    };

    (any [$($req:expr),* $(,)?]) => {
        $crate::requirement::Requirement::or(vec![$($req),*])
    };

    (at_least $min:expr, [$($req:expr),* $(,)?]) => {
        $crate::requirement::Requirement::require_group($min, vec![$($req),*])
    };
}

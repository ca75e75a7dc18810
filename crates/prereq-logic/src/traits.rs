// crates/prereq-logic/src/traits.rs
// ============================================================================
// Module: Requirement Traits
// Description: Leaf evaluation and description contracts for requirement trees.
// Purpose: Define how domain predicates evaluate against a context and describe themselves.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Leaf contracts describe how domain predicates evaluate against an
//! evaluation context and how they render into explanation text. The tree
//! algebra in [`crate::requirement`] never inspects predicates directly.

// ============================================================================
// SECTION: Predicate Outcome
// ============================================================================

/// Result of evaluating a single domain predicate
///
/// # Invariants
/// - `Unresolved` counts as not satisfied; it only differs in explanation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateOutcome {
    /// The predicate held for the context
    Satisfied,
    /// The predicate was evaluated and did not hold
    Unsatisfied,
    /// The predicate's subject was absent from the context
    Unresolved,
}

impl PredicateOutcome {
    /// Returns true only for [`PredicateOutcome::Satisfied`]
    #[must_use]
    pub const fn is_satisfied(self) -> bool {
        matches!(self, Self::Satisfied)
    }

    /// Returns true for [`PredicateOutcome::Unresolved`]
    #[must_use]
    pub const fn is_unresolved(self) -> bool {
        matches!(self, Self::Unresolved)
    }
}

impl From<bool> for PredicateOutcome {
    fn from(value: bool) -> Self {
        if value { Self::Satisfied } else { Self::Unsatisfied }
    }
}

// ============================================================================
// SECTION: Predicate Evaluation
// ============================================================================

/// Core trait for evaluating domain predicates against a context
///
/// The context is borrowed for the duration of a single evaluation pass and
/// must already hold everything the predicate needs; evaluation never blocks.
pub trait PredicateEval {
    /// Domain-specific context type the predicate reads from
    type Context<'a>: ?Sized;

    /// Error raised when the predicate is structurally unusable for the context
    type Error;

    /// Evaluates the predicate against the context
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` when evaluation hits a data-model bug that must not
    /// be coerced into a boolean.
    fn eval(&self, context: &Self::Context<'_>) -> Result<PredicateOutcome, Self::Error>;
}

// ============================================================================
// SECTION: Description
// ============================================================================

/// Plain-text description of a predicate for explanation output
pub trait Describe {
    /// Returns a single-line, markup-free description
    fn describe(&self) -> String;
}

// ============================================================================
// SECTION: Trace Hooks
// ============================================================================

/// Trace hook notified after each predicate evaluation
pub trait RequirementTrace<P> {
    /// Called whenever a predicate is evaluated
    fn on_predicate_evaluated(&mut self, predicate: &P, outcome: PredicateOutcome);
}

/// No-op trace hook for fast paths
///
/// # Invariants
/// - Zero-sized marker type; carries no state.
#[derive(Debug, Default)]
pub struct NoopTrace;

impl<P> RequirementTrace<P> for NoopTrace {
    fn on_predicate_evaluated(&mut self, _predicate: &P, _outcome: PredicateOutcome) {}
}

/// Trace hook that tallies predicate outcomes
///
/// # Invariants
/// - `satisfied + unsatisfied + unresolved` equals the number of predicates evaluated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeTally {
    /// Number of satisfied predicates
    pub satisfied: usize,
    /// Number of evaluated but unsatisfied predicates
    pub unsatisfied: usize,
    /// Number of predicates whose subject was absent
    pub unresolved: usize,
}

impl OutcomeTally {
    /// Returns the number of predicates evaluated
    #[must_use]
    pub const fn total(&self) -> usize {
        self.satisfied + self.unsatisfied + self.unresolved
    }
}

impl<P> RequirementTrace<P> for OutcomeTally {
    fn on_predicate_evaluated(&mut self, _predicate: &P, outcome: PredicateOutcome) {
        match outcome {
            PredicateOutcome::Satisfied => self.satisfied += 1,
            PredicateOutcome::Unsatisfied => self.unsatisfied += 1,
            PredicateOutcome::Unresolved => self.unresolved += 1,
        }
    }
}

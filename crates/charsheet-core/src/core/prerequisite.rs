// crates/charsheet-core/src/core/prerequisite.rs
// ============================================================================
// Module: Prerequisite Predicates
// Description: Requirement-tree leaves that test one attribute with criteria.
// Purpose: Plug character attributes into the generic requirement algebra.
// Dependencies: prereq-logic
// ============================================================================

//! ## Overview
//! A [`PrerequisitePredicate`] resolves an attribute path against the
//! evaluation context and matches the value with its criteria. An absent
//! attribute is [`PredicateOutcome::Unresolved`], which counts as not
//! satisfied. A kind mismatch is an error and aborts the evaluation.
//! [`EvaluationError`] also covers trees that break structural limits.

// ============================================================================
// SECTION: Imports
// ============================================================================

use prereq_logic::Describe;
use prereq_logic::PredicateEval;
use prereq_logic::PredicateOutcome;
use prereq_logic::Requirement;
use prereq_logic::SerdeError;
use thiserror::Error;

use crate::core::attribute::AttributePath;
use crate::core::criteria::AnyCriteria;
use crate::core::criteria::CriteriaError;
use crate::interfaces::EvaluationContext;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while evaluating a prerequisite tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// A leaf compared values of different kinds.
    #[error(transparent)]
    Criteria(#[from] CriteriaError),
    /// The tree breaks structural limits.
    #[error(transparent)]
    Structure(#[from] SerdeError),
}

// ============================================================================
// SECTION: Predicate
// ============================================================================

/// Leaf condition over one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrerequisitePredicate {
    /// Attribute to resolve.
    path: AttributePath,
    /// Subject text used in descriptions.
    subject: String,
    /// Criteria applied to the resolved value.
    criteria: AnyCriteria,
}

/// Requirement tree over prerequisite predicates.
pub type Prerequisites = Requirement<PrerequisitePredicate>;

impl PrerequisitePredicate {
    /// Creates a predicate described by its path.
    #[must_use]
    pub fn new(path: AttributePath, criteria: impl Into<AnyCriteria>) -> Self {
        let subject = path.to_string();
        Self {
            path,
            subject,
            criteria: criteria.into(),
        }
    }

    /// Replaces the subject text used in descriptions.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Returns the attribute path.
    #[must_use]
    pub const fn path(&self) -> &AttributePath {
        &self.path
    }

    /// Returns the subject text.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the criteria.
    #[must_use]
    pub const fn criteria(&self) -> &AnyCriteria {
        &self.criteria
    }

    /// Returns the criteria for editing.
    pub const fn criteria_mut(&mut self) -> &mut AnyCriteria {
        &mut self.criteria
    }
}

impl PredicateEval for PrerequisitePredicate {
    type Context<'a> = dyn EvaluationContext + 'a;
    type Error = CriteriaError;

    fn eval(&self, context: &Self::Context<'_>) -> Result<PredicateOutcome, Self::Error> {
        match context.resolve(&self.path) {
            None => Ok(PredicateOutcome::Unresolved),
            Some(value) => self.criteria.matches_value(value).map(PredicateOutcome::from),
        }
    }
}

impl Describe for PrerequisitePredicate {
    fn describe(&self) -> String {
        self.criteria.describe(&self.subject)
    }
}

// crates/prereq-logic/src/requirement.rs
// ============================================================================
// Module: Requirement Core Types
// Description: Boolean algebra over typed predicates with per-node evaluation.
// Purpose: Define `Requirement` and `Evaluation` plus construction and analysis helpers.
// Dependencies: serde::{Deserialize, Serialize}, smallvec::SmallVec
// ============================================================================

//! ## Overview
//! This module defines the requirement tree, its composite operators, and two
//! evaluation paths: a short-circuiting boolean path for hot checks and a
//! full path that records every node's result for explanations.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;

use crate::traits::NoopTrace;
use crate::traits::PredicateEval;
use crate::traits::PredicateOutcome;
use crate::traits::RequirementTrace;

// ============================================================================
// SECTION: Requirement Definition
// ============================================================================

/// Requirement tree with domain-specific leaves
///
/// The logical operators are domain-agnostic; the `Predicate` variant is the
/// boundary where domain semantics are injected. Parents own their children
/// exclusively, so trees are plain values with no back-references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Requirement<P> {
    /// Logical AND: every child must be satisfied
    ///
    /// Empty And is trivially satisfied.
    And(SmallVec<[Box<Self>; 4]>),

    /// Logical OR: at least one child must be satisfied
    ///
    /// Empty Or is trivially unsatisfiable.
    Or(SmallVec<[Box<Self>; 4]>),

    /// Logical NOT: inverts the child after its own count test
    Not(Box<Self>),

    /// At least `min` of the children must be satisfied
    RequireGroup {
        /// Minimum number of satisfied children
        min: u8,
        /// Children to choose from
        reqs: SmallVec<[Box<Self>; 8]>,
    },

    /// Domain-specific atomic predicate
    Predicate(P),
}

// ============================================================================
// SECTION: Constructor Helpers
// ============================================================================

impl<P> Requirement<P> {
    /// Creates a logical AND of the given requirements
    pub fn and(requirements: Vec<Self>) -> Self {
        Self::And(requirements.into_iter().map(Box::new).collect())
    }

    /// Creates a logical OR of the given requirements
    pub fn or(requirements: Vec<Self>) -> Self {
        Self::Or(requirements.into_iter().map(Box::new).collect())
    }

    /// Creates a logical NOT of the given requirement
    pub fn negate(requirement: Self) -> Self {
        Self::Not(Box::new(requirement))
    }

    /// Creates a group requirement with a minimum satisfaction count
    pub fn require_group(min: u8, requirements: Vec<Self>) -> Self {
        Self::RequireGroup {
            min,
            reqs: requirements.into_iter().map(Box::new).collect(),
        }
    }

    /// Creates a requirement from a predicate
    pub const fn predicate(predicate: P) -> Self {
        Self::Predicate(predicate)
    }
}

impl<P> std::ops::Not for Requirement<P> {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::Not(Box::new(self))
    }
}

// ============================================================================
// SECTION: Boolean Evaluation
// ============================================================================

impl<P> Requirement<P> {
    /// Evaluates this requirement with short-circuiting
    ///
    /// Returns the same boolean as [`Requirement::evaluate`] but stops as soon
    /// as a composite's result is decided.
    ///
    /// # Errors
    ///
    /// Propagates the first predicate error encountered.
    pub fn eval(&self, context: &P::Context<'_>) -> Result<bool, P::Error>
    where
        P: PredicateEval,
    {
        match self {
            Self::Predicate(predicate) => Ok(predicate.eval(context)?.is_satisfied()),
            Self::Not(requirement) => Ok(!requirement.eval(context)?),
            Self::And(requirements) => {
                for req in requirements {
                    if !req.eval(context)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Self::Or(requirements) => {
                for req in requirements {
                    if req.eval(context)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Self::RequireGroup {
                min,
                reqs,
            } => {
                let required = usize::from(*min);
                let mut satisfied = 0usize;
                let mut remaining = reqs.len();
                if satisfied >= required {
                    return Ok(true);
                }

                for req in reqs {
                    if req.eval(context)? {
                        satisfied += 1;
                        if satisfied >= required {
                            return Ok(true);
                        }
                    }
                    remaining -= 1;
                    if satisfied + remaining < required {
                        return Ok(false);
                    }
                }

                Ok(satisfied >= required)
            }
        }
    }

    // ========================================================================
    // SECTION: Full Evaluation
    // ========================================================================

    /// Evaluates every node in declaration order and records each result
    ///
    /// # Errors
    ///
    /// Propagates the first predicate error encountered.
    pub fn evaluate<'r>(&'r self, context: &P::Context<'_>) -> Result<Evaluation<'r, P>, P::Error>
    where
        P: PredicateEval,
    {
        let mut trace = NoopTrace;
        self.evaluate_with_trace(context, &mut trace)
    }

    /// Evaluates every node in declaration order with a trace hook
    ///
    /// # Errors
    ///
    /// Propagates the first predicate error encountered.
    pub fn evaluate_with_trace<'r, T>(
        &'r self,
        context: &P::Context<'_>,
        trace: &mut T,
    ) -> Result<Evaluation<'r, P>, P::Error>
    where
        P: PredicateEval,
        T: RequirementTrace<P>,
    {
        match self {
            Self::Predicate(predicate) => {
                let outcome = predicate.eval(context)?;
                trace.on_predicate_evaluated(predicate, outcome);
                Ok(Evaluation {
                    node: self,
                    satisfied: outcome.is_satisfied(),
                    outcome: Some(outcome),
                    children: Vec::new(),
                })
            }
            Self::Not(requirement) => {
                let inner = requirement.evaluate_with_trace(context, trace)?;
                Ok(Evaluation {
                    node: self,
                    satisfied: !inner.satisfied,
                    outcome: None,
                    children: vec![inner],
                })
            }
            Self::And(reqs) | Self::Or(reqs) => {
                let children = reqs
                    .iter()
                    .map(|req| req.evaluate_with_trace(context, trace))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Evaluation::composite(self, children))
            }
            Self::RequireGroup {
                reqs, ..
            } => {
                let children = reqs
                    .iter()
                    .map(|req| req.evaluate_with_trace(context, trace))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Evaluation::composite(self, children))
            }
        }
    }

    // ========================================================================
    // SECTION: Static Analysis
    // ========================================================================

    /// Number of children a composite needs satisfied, or `None` for leaves and negations
    #[must_use]
    pub fn required_count(&self) -> Option<usize> {
        match self {
            Self::And(reqs) => Some(reqs.len()),
            Self::Or(_) => Some(1),
            Self::RequireGroup {
                min, ..
            } => Some(usize::from(*min)),
            Self::Not(_) | Self::Predicate(_) => None,
        }
    }

    /// Determines if this requirement is trivially satisfied
    pub fn is_trivially_satisfied(&self) -> bool {
        match self {
            Self::And(reqs) => reqs.iter().all(|r| r.is_trivially_satisfied()),
            Self::Or(reqs) => reqs.iter().any(|r| r.is_trivially_satisfied()),
            Self::Not(req) => req.is_trivially_unsatisfiable(),
            Self::RequireGroup {
                min,
                reqs,
            } => {
                reqs.iter().filter(|r| r.is_trivially_satisfied()).count() >= usize::from(*min)
            }
            Self::Predicate(_) => false,
        }
    }

    /// Determines if this requirement is trivially unsatisfiable
    pub fn is_trivially_unsatisfiable(&self) -> bool {
        match self {
            Self::Or(reqs) => reqs.iter().all(|r| r.is_trivially_unsatisfiable()),
            Self::And(reqs) => reqs.iter().any(|r| r.is_trivially_unsatisfiable()),
            Self::Not(req) => req.is_trivially_satisfied(),
            Self::RequireGroup {
                min,
                reqs,
            } => {
                let blocked = reqs.iter().filter(|r| r.is_trivially_unsatisfiable()).count();
                reqs.len() - blocked < usize::from(*min)
            }
            Self::Predicate(_) => false,
        }
    }

    /// Returns the number of nodes in this requirement tree
    pub fn complexity(&self) -> usize {
        match self {
            Self::Predicate(_) => 1,
            Self::Not(req) => 1 + req.complexity(),
            Self::And(reqs) | Self::Or(reqs) => {
                1 + reqs.iter().map(|r| r.complexity()).sum::<usize>()
            }
            Self::RequireGroup {
                reqs, ..
            } => 1 + reqs.iter().map(|r| r.complexity()).sum::<usize>(),
        }
    }

    /// Returns the predicates of this tree in declaration order
    pub fn predicates(&self) -> Vec<&P> {
        let mut out = Vec::new();
        self.collect_predicates(&mut out);
        out
    }

    /// Appends predicates to `out` in declaration order.
    fn collect_predicates<'r>(&'r self, out: &mut Vec<&'r P>) {
        match self {
            Self::Predicate(predicate) => out.push(predicate),
            Self::Not(req) => req.collect_predicates(out),
            Self::And(reqs) | Self::Or(reqs) => {
                for req in reqs {
                    req.collect_predicates(out);
                }
            }
            Self::RequireGroup {
                reqs, ..
            } => {
                for req in reqs {
                    req.collect_predicates(out);
                }
            }
        }
    }

    /// Rebuilds the tree with every predicate converted by `convert`
    ///
    /// Predicates are visited in declaration order.
    pub fn map_predicates<Q, F>(self, convert: &mut F) -> Requirement<Q>
    where
        F: FnMut(P) -> Q,
    {
        match self {
            Self::Predicate(predicate) => Requirement::Predicate(convert(predicate)),
            Self::Not(req) => Requirement::Not(Box::new(req.map_predicates(convert))),
            Self::And(reqs) => {
                Requirement::And(reqs.into_iter().map(|r| Box::new(r.map_predicates(convert))).collect())
            }
            Self::Or(reqs) => {
                Requirement::Or(reqs.into_iter().map(|r| Box::new(r.map_predicates(convert))).collect())
            }
            Self::RequireGroup {
                min,
                reqs,
            } => Requirement::RequireGroup {
                min,
                reqs: reqs.into_iter().map(|r| Box::new(r.map_predicates(convert))).collect(),
            },
        }
    }
}

// ============================================================================
// SECTION: Evaluation Tree
// ============================================================================

/// Per-node result of a full requirement evaluation
///
/// Mirrors the shape of the evaluated tree: composites hold one child per
/// declared sub-requirement, negations hold exactly one child, and leaves
/// carry the predicate outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation<'r, P> {
    /// Node this result belongs to.
    node: &'r Requirement<P>,
    /// Final result after the count test and any negation.
    satisfied: bool,
    /// Predicate outcome for leaf nodes.
    outcome: Option<PredicateOutcome>,
    /// Child results in declaration order.
    children: Vec<Self>,
}

impl<'r, P> Evaluation<'r, P> {
    /// Builds a composite result from its children.
    fn composite(node: &'r Requirement<P>, children: Vec<Self>) -> Self {
        let satisfied_children = children.iter().filter(|child| child.satisfied).count();
        let satisfied = node.required_count().is_none_or(|required| satisfied_children >= required);
        Self {
            node,
            satisfied,
            outcome: None,
            children,
        }
    }

    /// Returns the evaluated node
    #[must_use]
    pub const fn node(&self) -> &'r Requirement<P> {
        self.node
    }

    /// Returns whether the node was satisfied
    #[must_use]
    pub const fn satisfied(&self) -> bool {
        self.satisfied
    }

    /// Returns the predicate outcome for leaves
    #[must_use]
    pub const fn outcome(&self) -> Option<PredicateOutcome> {
        self.outcome
    }

    /// Returns the child results in declaration order
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Returns the number of satisfied children
    #[must_use]
    pub fn satisfied_children(&self) -> usize {
        self.children.iter().filter(|child| child.satisfied).count()
    }

    /// Locates the node responsible for this result failing
    ///
    /// Descends through failing composites in declaration order to the first
    /// failing leaf. A failing negation is its own culprit because its child
    /// held. Returns `None` when this node is satisfied.
    #[must_use]
    pub fn first_failure(&self) -> Option<&Self> {
        if self.satisfied {
            return None;
        }
        match self.node {
            Requirement::Predicate(_) | Requirement::Not(_) => Some(self),
            _ => self.children.iter().find_map(Self::first_failure).or(Some(self)),
        }
    }

    /// Returns the leaf results whose subject was absent, in declaration order
    #[must_use]
    pub fn unresolved(&self) -> Vec<&'r P> {
        let mut out = Vec::new();
        self.collect_unresolved(&mut out);
        out
    }

    /// Appends unresolved leaf predicates to `out`.
    fn collect_unresolved(&self, out: &mut Vec<&'r P>) {
        if let Requirement::Predicate(predicate) = self.node
            && self.outcome.is_some_and(PredicateOutcome::is_unresolved)
        {
            out.push(predicate);
        }
        for child in &self.children {
            child.collect_unresolved(out);
        }
    }
}

// crates/prereq-logic/src/builder.rs
// ============================================================================
// Module: Requirement Builders
// Description: Fluent builders over the requirement tree.
// Purpose: Compose prerequisite groups with optional counts and negation.
// Dependencies: crate::requirement::Requirement
// ============================================================================

//! ## Overview
//! Builders mirror how prerequisite lists are authored: a group is "all of",
//! "any of", or "at least N of" its children, and any node may be negated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ops::Not;

use crate::requirement::Requirement;

// ============================================================================
// SECTION: Group Kind
// ============================================================================

/// Counting rule for a prerequisite group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// Every child must hold
    All,
    /// At least one child must hold
    Any,
    /// At least this many children must hold
    AtLeast(u8),
}

// ============================================================================
// SECTION: Requirement Builder
// ============================================================================

/// Fluent builder rooted at a single requirement
pub struct RequirementBuilder<P> {
    /// Root requirement under construction.
    requirement: Requirement<P>,
}

impl<P> RequirementBuilder<P> {
    /// Creates a builder with the given requirement as the root
    pub const fn new(requirement: Requirement<P>) -> Self {
        Self {
            requirement,
        }
    }

    /// Creates a builder starting with a predicate
    #[must_use]
    pub const fn predicate(predicate: P) -> Self {
        Self::new(Requirement::Predicate(predicate))
    }

    /// Starts an "all of" group
    #[must_use]
    pub const fn all() -> GroupBuilder<P> {
        GroupBuilder::new(GroupKind::All)
    }

    /// Starts an "any of" group
    #[must_use]
    pub const fn any() -> GroupBuilder<P> {
        GroupBuilder::new(GroupKind::Any)
    }

    /// Starts an "at least N of" group
    #[must_use]
    pub const fn at_least(min: u8) -> GroupBuilder<P> {
        GroupBuilder::new(GroupKind::AtLeast(min))
    }

    /// Combines this requirement with another under "all of"
    #[must_use]
    pub fn and_also(self, other: Requirement<P>) -> Self {
        Self::new(Requirement::and(vec![self.requirement, other]))
    }

    /// Combines this requirement with another under "any of"
    #[must_use]
    pub fn or_else(self, other: Requirement<P>) -> Self {
        Self::new(Requirement::or(vec![self.requirement, other]))
    }

    /// Builds the final requirement
    pub fn build(self) -> Requirement<P> {
        self.requirement
    }
}

impl<P> Not for RequirementBuilder<P> {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::new(Requirement::negate(self.requirement))
    }
}

// ============================================================================
// SECTION: Group Builder
// ============================================================================

/// Builder for prerequisite groups
pub struct GroupBuilder<P> {
    /// Counting rule for the group.
    kind: GroupKind,
    /// Whether the group result is inverted.
    negated: bool,
    /// Children in declaration order.
    children: Vec<Requirement<P>>,
}

impl<P> GroupBuilder<P> {
    /// Creates an empty group with the given counting rule
    #[must_use]
    pub const fn new(kind: GroupKind) -> Self {
        Self {
            kind,
            negated: false,
            children: Vec::new(),
        }
    }

    /// Adds a child requirement
    #[must_use]
    pub fn with(mut self, requirement: Requirement<P>) -> Self {
        self.children.push(requirement);
        self
    }

    /// Adds a predicate child
    #[must_use]
    pub fn with_predicate(mut self, predicate: P) -> Self {
        self.children.push(Requirement::Predicate(predicate));
        self
    }

    /// Adds a negated predicate child
    #[must_use]
    pub fn without_predicate(mut self, predicate: P) -> Self {
        self.children.push(Requirement::negate(Requirement::Predicate(predicate)));
        self
    }

    /// Adds several children
    #[must_use]
    pub fn with_all<I>(mut self, requirements: I) -> Self
    where
        I: IntoIterator<Item = Requirement<P>>,
    {
        self.children.extend(requirements);
        self
    }

    /// Inverts the group's result after its count test
    #[must_use]
    pub const fn negated(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// Builds the group requirement
    #[must_use]
    pub fn build(self) -> Requirement<P> {
        let group = match self.kind {
            GroupKind::All => Requirement::and(self.children),
            GroupKind::Any => Requirement::or(self.children),
            GroupKind::AtLeast(min) => Requirement::require_group(min, self.children),
        };
        if self.negated { Requirement::negate(group) } else { group }
    }
}

// crates/charsheet-core/src/interfaces/mod.rs
// ============================================================================
// Module: Charsheet Interfaces
// Description: Contract surfaces between the core and the character data layer.
// Purpose: Define how evaluators read attributes without owning character data.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The evaluator never loads data itself. Callers hand it a read-only
//! [`EvaluationContext`] that already holds every attribute a rule may touch,
//! so evaluation is synchronous and never blocks on I/O.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::attribute::AttributePath;
use crate::core::attribute::AttributeValue;

// ============================================================================
// SECTION: Evaluation Context
// ============================================================================

/// Read-only attribute lookup used by prerequisites and level definitions.
pub trait EvaluationContext {
    /// Resolves an attribute path, returning `None` when it is absent.
    fn resolve(&self, path: &AttributePath) -> Option<&AttributeValue>;
}

impl<T: EvaluationContext + ?Sized> EvaluationContext for &T {
    fn resolve(&self, path: &AttributePath) -> Option<&AttributeValue> {
        (**self).resolve(path)
    }
}

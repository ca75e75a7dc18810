// crates/charsheet-core/src/lib.rs
// ============================================================================
// Module: Charsheet Core Root
// Description: Public API for criteria, prerequisites, and level calculation.
// Purpose: Wire together the data model, context contract, and runtime.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Charsheet core evaluates character-sheet rules. Criteria test one
//! attribute value against a qualifier; prerequisite trees combine criteria
//! with all/any/at-least-N groups and negation; the level calculator turns a
//! base value, prerequisites, and modifiers into a derived level with a
//! plain-text explanation.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;
pub use interfaces::EvaluationContext;
pub use runtime::*;

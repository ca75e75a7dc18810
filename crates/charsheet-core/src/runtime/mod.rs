// crates/charsheet-core/src/runtime/mod.rs
// ============================================================================
// Module: Charsheet Runtime
// Description: Attribute snapshots, evaluators, audit sinks, and handoff slots.
// Purpose: Run prerequisite and level calculations over pre-loaded contexts.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Runtime components are synchronous and single-pass. Evaluators borrow
//! their configuration and audit sink; the handoff slot is the only piece
//! shared across threads.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod calculator;
pub mod context;
pub mod evaluator;
pub mod handoff;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::CriteriaRecordLoadedEvent;
pub use audit::EvaluationAudit;
pub use audit::JsonlAudit;
pub use audit::LevelCalculatedEvent;
pub use audit::LevelCalculatedParams;
pub use audit::NoopAudit;
pub use audit::PrerequisitesEvaluatedEvent;
pub use audit::StderrAudit;
pub use calculator::LevelCalculator;
pub use calculator::LevelInputs;
pub use calculator::calculate_level;
pub use context::AttributeSnapshot;
pub use evaluator::DEFAULT_MAX_DEPTH;
pub use evaluator::EvaluatorConfig;
pub use evaluator::PrerequisiteEvaluator;
pub use evaluator::PrerequisiteReport;
pub use handoff::HandoffSlot;
pub use handoff::SlotPublisher;
pub use handoff::SlotReader;

// crates/charsheet-core/src/runtime/evaluator.rs
// ============================================================================
// Module: Prerequisite Evaluator
// Description: Validates and evaluates prerequisite trees against a context.
// Purpose: Produce a satisfied flag plus deterministic explanation text.
// Dependencies: prereq-logic, serde, crate::core, crate::runtime::audit
// ============================================================================

//! ## Overview
//! [`PrerequisiteEvaluator`] checks a tree's structure, evaluates every node
//! in declaration order, and renders the explanation used for tooltips. The
//! report carries no timestamps or counters that change between runs, so
//! evaluating an unchanged context twice yields byte-identical text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use prereq_logic::ExplanationStyle;
use prereq_logic::OutcomeTally;
use prereq_logic::RequirementValidator;
use prereq_logic::SerdeConfig;
use prereq_logic::describe_node;
use prereq_logic::render_explanation;
use serde::Serialize;

use crate::core::prerequisite::EvaluationError;
use crate::core::prerequisite::Prerequisites;
use crate::interfaces::EvaluationContext;
use crate::runtime::audit::EvaluationAudit;
use crate::runtime::audit::NoopAudit;
use crate::runtime::audit::PrerequisitesEvaluatedEvent;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default maximum prerequisite nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Evaluation limits and explanation formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Maximum tree depth accepted (root is depth 1).
    pub max_depth: usize,
    /// Explanation rendering style.
    pub explanation: ExplanationStyle,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            explanation: ExplanationStyle::default(),
        }
    }
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Outcome of one prerequisite evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrerequisiteReport {
    /// Whether the tree was satisfied.
    pub satisfied: bool,
    /// Indented explanation text with result markers.
    pub explanation: String,
    /// Description of the first failing node, when unsatisfied.
    pub first_failure: Option<String>,
    /// Paths of leaves whose attribute was absent, in declaration order.
    pub unresolved: Vec<String>,
    /// Number of leaves evaluated.
    pub leaves: usize,
}

// ============================================================================
// SECTION: Evaluator
// ============================================================================

/// Evaluates prerequisite trees and reports to an audit sink.
#[derive(Clone, Copy)]
pub struct PrerequisiteEvaluator<'a> {
    /// Limits and style.
    config: &'a EvaluatorConfig,
    /// Audit sink.
    audit: &'a dyn EvaluationAudit,
}

impl<'a> PrerequisiteEvaluator<'a> {
    /// Creates an evaluator that discards audit events.
    #[must_use]
    pub const fn new(config: &'a EvaluatorConfig) -> Self {
        Self {
            config,
            audit: &NoopAudit,
        }
    }

    /// Creates an evaluator that reports to `audit`.
    #[must_use]
    pub const fn with_audit(config: &'a EvaluatorConfig, audit: &'a dyn EvaluationAudit) -> Self {
        Self {
            config,
            audit,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &'a EvaluatorConfig {
        self.config
    }

    /// Returns the audit sink.
    #[must_use]
    pub const fn audit(&self) -> &'a dyn EvaluationAudit {
        self.audit
    }

    /// Evaluates every node and renders the explanation.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError`] when the tree breaks structural limits or
    /// a leaf compares values of different kinds.
    pub fn evaluate(
        &self,
        prerequisites: &Prerequisites,
        context: &dyn EvaluationContext,
    ) -> Result<PrerequisiteReport, EvaluationError> {
        self.validate(prerequisites)?;
        let mut tally = OutcomeTally::default();
        let evaluation = prerequisites.evaluate_with_trace(context, &mut tally)?;
        let style = &self.config.explanation;
        let report = PrerequisiteReport {
            satisfied: evaluation.satisfied(),
            explanation: render_explanation(&evaluation, style),
            first_failure: evaluation.first_failure().map(|node| describe_node(node, style)),
            unresolved: evaluation
                .unresolved()
                .into_iter()
                .map(|predicate| predicate.path().to_string())
                .collect(),
            leaves: tally.total(),
        };
        self.audit.record_prerequisites(&PrerequisitesEvaluatedEvent::new(
            report.satisfied,
            report.leaves,
            report.unresolved.clone(),
        ));
        Ok(report)
    }

    /// Returns only the satisfied flag, short-circuiting composites.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError`] under the same conditions as
    /// [`PrerequisiteEvaluator::evaluate`], limited to the nodes visited.
    pub fn is_satisfied(
        &self,
        prerequisites: &Prerequisites,
        context: &dyn EvaluationContext,
    ) -> Result<bool, EvaluationError> {
        self.validate(prerequisites)?;
        Ok(prerequisites.eval(context)?)
    }

    /// Checks structural limits.
    fn validate(&self, prerequisites: &Prerequisites) -> Result<(), EvaluationError> {
        let validator = RequirementValidator::new(SerdeConfig {
            max_depth: self.config.max_depth,
            allow_empty_logical: false,
        });
        validator.validate(prerequisites)?;
        Ok(())
    }
}

// crates/charsheet-core/src/runtime/calculator.rs
// ============================================================================
// Module: Level Calculator
// Description: Combines prerequisites, base sources, and modifiers into a level.
// Purpose: Compute derived levels with a line-by-line explanation.
// Dependencies: crate::core, crate::runtime::{audit, evaluator}
// ============================================================================

//! ## Overview
//! The calculator runs in a fixed order:
//! 1. Evaluate prerequisites. Unmet prerequisites yield the unattainable
//!    sentinel with the failing node named first in the explanation.
//! 2. Select the base value. No resolvable source is also unattainable.
//! 3. Add applicable modifiers in declaration order.
//! 4. Subtract the reference value, if one resolves, for the relative level.
//!
//! The result depends only on its inputs, so repeated calls with an unchanged
//! context return equal [`LevelResult`] values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::level::BaseDefinition;
use crate::core::level::BaseSource;
use crate::core::level::LevelError;
use crate::core::level::LevelResult;
use crate::core::level::LevelRule;
use crate::core::level::Modifier;
use crate::core::level::Reference;
use crate::core::level::format_signed;
use crate::core::prerequisite::Prerequisites;
use crate::interfaces::EvaluationContext;
use crate::runtime::audit::LevelCalculatedEvent;
use crate::runtime::audit::LevelCalculatedParams;
use crate::runtime::evaluator::EvaluatorConfig;
use crate::runtime::evaluator::PrerequisiteEvaluator;

// ============================================================================
// SECTION: Inputs
// ============================================================================

/// Borrowed inputs of one calculation.
#[derive(Debug, Clone, Copy)]
pub struct LevelInputs<'r> {
    /// Base sources.
    pub base: &'r BaseDefinition,
    /// Prerequisites; `None` is always satisfied.
    pub prerequisites: Option<&'r Prerequisites>,
    /// Modifiers in declaration order.
    pub modifiers: &'r [Modifier],
    /// Reference attribute for the relative level.
    pub reference: Option<&'r Reference>,
}

impl<'r> From<&'r LevelRule> for LevelInputs<'r> {
    fn from(rule: &'r LevelRule) -> Self {
        Self {
            base: &rule.base,
            prerequisites: rule.prerequisites.as_ref(),
            modifiers: &rule.modifiers,
            reference: rule.reference.as_ref(),
        }
    }
}

// ============================================================================
// SECTION: Calculator
// ============================================================================

/// Computes levels and reports each calculation to the evaluator's audit sink.
#[derive(Clone, Copy)]
pub struct LevelCalculator<'a> {
    /// Prerequisite evaluator.
    evaluator: PrerequisiteEvaluator<'a>,
}

impl<'a> LevelCalculator<'a> {
    /// Creates a calculator around an evaluator.
    #[must_use]
    pub const fn new(evaluator: PrerequisiteEvaluator<'a>) -> Self {
        Self {
            evaluator,
        }
    }

    /// Calculates the level for a rule.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError`] on kind mismatches, invalid trees, non-integer
    /// level inputs, or overflow.
    pub fn calculate(
        &self,
        rule: &LevelRule,
        context: &dyn EvaluationContext,
    ) -> Result<LevelResult, LevelError> {
        self.run(Some(&rule.name), context, LevelInputs::from(rule))
    }

    /// Calculates a level from loose parts.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError`] under the same conditions as
    /// [`LevelCalculator::calculate`].
    pub fn calculate_parts(
        &self,
        context: &dyn EvaluationContext,
        inputs: LevelInputs<'_>,
    ) -> Result<LevelResult, LevelError> {
        self.run(None, context, inputs)
    }

    /// Computes the result and records the audit event.
    fn run(
        &self,
        rule: Option<&str>,
        context: &dyn EvaluationContext,
        inputs: LevelInputs<'_>,
    ) -> Result<LevelResult, LevelError> {
        let (result, modifiers_applied) = self.compute(context, inputs)?;
        self.evaluator.audit().record_level(&LevelCalculatedEvent::new(LevelCalculatedParams {
            rule: rule.map(str::to_string),
            attainable: result.is_attainable(),
            level: result.level(),
            relative_level: result.relative_level(),
            modifiers_applied,
        }));
        Ok(result)
    }

    /// Computes the result and the number of modifiers applied.
    fn compute(
        &self,
        context: &dyn EvaluationContext,
        inputs: LevelInputs<'_>,
    ) -> Result<(LevelResult, usize), LevelError> {
        let mut lines = Vec::new();

        if let Some(prerequisites) = inputs.prerequisites {
            let report = self.evaluator.evaluate(prerequisites, context)?;
            if !report.satisfied {
                let culprit = report.first_failure.unwrap_or_default();
                lines.push(format!("prerequisites not met: {culprit}"));
                lines.extend(report.explanation.lines().map(str::to_string));
                return Ok((LevelResult::unattainable(lines), 0));
            }
        }

        let Some((source, base)) = inputs.base.select(context)? else {
            lines.push("no base source available".to_string());
            for source in inputs.base.sources() {
                lines.push(format!("  {}: not found", source.describe()));
            }
            return Ok((LevelResult::unattainable(lines), 0));
        };
        lines.push(match source {
            BaseSource::Fixed {
                ..
            } => format!("base: {base}"),
            BaseSource::Attribute {
                ..
            } => format!("base {}: {base}", source.describe()),
        });

        let mut level = base;
        let mut applied = 0usize;
        for modifier in inputs.modifiers {
            if !modifier.applies(context)? {
                continue;
            }
            level = level
                .checked_add(modifier.delta)
                .ok_or_else(|| LevelError::Overflow(modifier.label.clone()))?;
            applied += 1;
            lines.push(format!("{} {}", format_signed(modifier.delta), modifier.label));
        }
        lines.push(format!("level {level}"));

        let (relative, label) = match inputs.reference {
            None => (level, None),
            Some(reference) => match reference.resolve(context)? {
                Some(value) => {
                    let relative = level
                        .checked_sub(value)
                        .ok_or_else(|| LevelError::Overflow(reference.label.clone()))?;
                    lines.push(format!(
                        "relative to {} ({value}): {}",
                        reference.label,
                        format_signed(relative)
                    ));
                    (relative, Some(reference.label.clone()))
                }
                None => {
                    lines.push(format!(
                        "reference {} not found; relative level mirrors level",
                        reference.label
                    ));
                    (level, None)
                }
            },
        };

        Ok((LevelResult::attained(level, relative, label, lines), applied))
    }
}

// ============================================================================
// SECTION: Convenience
// ============================================================================

/// Calculates a level with default configuration and no audit sink.
///
/// # Errors
///
/// Returns [`LevelError`] under the same conditions as
/// [`LevelCalculator::calculate`].
pub fn calculate_level(
    context: &dyn EvaluationContext,
    base: &BaseDefinition,
    prerequisites: Option<&Prerequisites>,
    modifiers: &[Modifier],
) -> Result<LevelResult, LevelError> {
    let config = EvaluatorConfig::default();
    let calculator = LevelCalculator::new(PrerequisiteEvaluator::new(&config));
    calculator.calculate_parts(context, LevelInputs {
        base,
        prerequisites,
        modifiers,
        reference: None,
    })
}

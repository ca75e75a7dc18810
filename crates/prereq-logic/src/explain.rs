// crates/prereq-logic/src/explain.rs
// ============================================================================
// Module: Requirement Explanations
// Description: Plain-text rendering of evaluated requirement trees.
// Purpose: Produce deterministic, indented tooltip text with result markers.
// Dependencies: crate::{requirement, traits}
// ============================================================================

//! ## Overview
//! Renders an [`Evaluation`] into plain text. Each node becomes one line,
//! indented by nesting depth and prefixed with a satisfied/unsatisfied marker.
//! Negations fold into the line of the node they negate, so `not` never adds
//! a level of indentation. Output contains no markup and no trailing newline;
//! rendering the same evaluation twice yields identical bytes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::requirement::Evaluation;
use crate::requirement::Requirement;
use crate::traits::Describe;

// ============================================================================
// SECTION: Style
// ============================================================================

/// Rendering options for explanation text
///
/// # Invariants
/// - Markers should be non-empty so satisfied and unsatisfied lines are distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationStyle {
    /// Spaces per nesting level
    pub indent_width: usize,
    /// Marker for satisfied nodes
    pub satisfied_marker: String,
    /// Marker for unsatisfied nodes
    pub unsatisfied_marker: String,
    /// Suffix appended to leaves whose subject was absent
    pub unresolved_note: String,
}

impl Default for ExplanationStyle {
    fn default() -> Self {
        Self {
            indent_width: 2,
            satisfied_marker: "[+]".to_string(),
            unsatisfied_marker: "[-]".to_string(),
            unresolved_note: "(not found)".to_string(),
        }
    }
}

/// Prefix applied to negated nodes.
const NEGATION_PREFIX: &str = "not: ";

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders an evaluation tree into newline-separated lines
#[must_use]
pub fn render_explanation<P: Describe>(
    evaluation: &Evaluation<'_, P>,
    style: &ExplanationStyle,
) -> String {
    render_lines(evaluation, style).join("\n")
}

/// Renders an evaluation tree into one string per line
#[must_use]
pub fn render_lines<P: Describe>(
    evaluation: &Evaluation<'_, P>,
    style: &ExplanationStyle,
) -> Vec<String> {
    let mut lines = Vec::new();
    push_node(evaluation, style, 0, None, &mut lines);
    lines
}

/// Describes a single evaluated node without marker or indentation
///
/// Used to name the culprit returned by [`Evaluation::first_failure`].
#[must_use]
pub fn describe_node<P: Describe>(
    evaluation: &Evaluation<'_, P>,
    style: &ExplanationStyle,
) -> String {
    let mut prefix = String::new();
    let mut current = evaluation;
    while let (Requirement::Not(_), [inner]) = (current.node(), current.children()) {
        prefix.push_str(NEGATION_PREFIX);
        current = inner;
    }
    format!("{prefix}{}", node_text(current, style))
}

/// Appends the line for `evaluation` and its descendants.
///
/// `negation` carries the result of an enclosing negation, so the line shows
/// the negated outcome, together with the accumulated negation prefix.
fn push_node<P: Describe>(
    evaluation: &Evaluation<'_, P>,
    style: &ExplanationStyle,
    depth: usize,
    negation: Option<(bool, &str)>,
    lines: &mut Vec<String>,
) {
    let (satisfied, prefix) = negation.unwrap_or((evaluation.satisfied(), ""));
    if let (Requirement::Not(_), [inner]) = (evaluation.node(), evaluation.children()) {
        let prefix = format!("{prefix}{NEGATION_PREFIX}");
        push_node(inner, style, depth, Some((satisfied, &prefix)), lines);
        return;
    }

    lines.push(format!(
        "{:indent$}{} {prefix}{}",
        "",
        marker_for(style, satisfied),
        node_text(evaluation, style),
        indent = depth * style.indent_width
    ));
    for child in evaluation.children() {
        push_node(child, style, depth + 1, None, lines);
    }
}

/// Picks the marker for a result.
fn marker_for(style: &ExplanationStyle, satisfied: bool) -> &str {
    if satisfied { &style.satisfied_marker } else { &style.unsatisfied_marker }
}

/// Returns the descriptive text of a node, without negation prefix.
fn node_text<P: Describe>(evaluation: &Evaluation<'_, P>, style: &ExplanationStyle) -> String {
    match evaluation.node() {
        Requirement::Predicate(predicate) => {
            let text = predicate.describe();
            if evaluation.outcome().is_some_and(|outcome| outcome.is_unresolved()) {
                format!("{text} {}", style.unresolved_note)
            } else {
                text
            }
        }
        Requirement::And(_) => "all of:".to_string(),
        Requirement::Or(_) => "any of:".to_string(),
        Requirement::RequireGroup {
            min, ..
        } => format!("at least {min} of:"),
        Requirement::Not(_) => NEGATION_PREFIX.trim_end().to_string(),
    }
}

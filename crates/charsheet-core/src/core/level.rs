// crates/charsheet-core/src/core/level.rs
// ============================================================================
// Module: Level Definitions
// Description: Base sources, modifiers, reference attributes, and level results.
// Purpose: Describe how a derived level is computed and what a result holds.
// Dependencies: serde, thiserror, crate::core
// ============================================================================

//! ## Overview
//! A [`LevelRule`] names the inputs of a level calculation: a
//! [`BaseDefinition`] with one or more candidate sources, optional
//! prerequisites, ordered [`Modifier`]s, and an optional [`Reference`]
//! attribute for the relative level. A [`LevelResult`] is an immutable
//! snapshot of one calculation.
//!
//! Unattainable results use [`LevelResult::UNATTAINABLE`] for both the level
//! and the relative level, and carry `attainable == false` so the sentinel is
//! never confused with a computed `-1`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use prereq_logic::PredicateEval;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::attribute::AttributePath;
use crate::core::attribute::AttributeValue;
use crate::core::attribute::ValueKind;
use crate::core::criteria::CriteriaError;
use crate::core::prerequisite::EvaluationError;
use crate::core::prerequisite::PrerequisitePredicate;
use crate::core::prerequisite::Prerequisites;
use crate::interfaces::EvaluationContext;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while defining or calculating a level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    /// Base definition has no sources.
    #[error("base definition requires at least one source")]
    EmptyBase,
    /// A level input resolved to a value that is not an integer.
    #[error("attribute {path} must be an integer, found {found}")]
    NonIntegerAttribute {
        /// Attribute path.
        path: String,
        /// Kind found in the context.
        found: ValueKind,
    },
    /// Level arithmetic overflowed.
    #[error("level arithmetic overflowed at {0}")]
    Overflow(String),
    /// Criteria matching failed.
    #[error(transparent)]
    Criteria(#[from] CriteriaError),
    /// Prerequisite evaluation failed.
    #[error(transparent)]
    Prerequisites(#[from] EvaluationError),
}

/// Resolves an integer attribute, treating absence as `None`.
fn resolve_integer(
    context: &dyn EvaluationContext,
    path: &AttributePath,
) -> Result<Option<i64>, LevelError> {
    match context.resolve(path) {
        None => Ok(None),
        Some(AttributeValue::Integer(value)) => Ok(Some(*value)),
        Some(other) => Err(LevelError::NonIntegerAttribute {
            path: path.to_string(),
            found: other.kind(),
        }),
    }
}

// ============================================================================
// SECTION: Signed Formatting
// ============================================================================

/// Renders a value with an explicit sign: `+0`, `+3`, `-2`.
#[must_use]
pub fn format_signed(value: i64) -> String {
    if value < 0 { value.to_string() } else { format!("+{value}") }
}

// ============================================================================
// SECTION: Base Definition
// ============================================================================

/// One candidate base value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseSource {
    /// Constant base value.
    Fixed {
        /// Base value.
        value: i64,
    },
    /// Integer attribute plus an offset, such as `DX-5`.
    Attribute {
        /// Attribute path.
        path: AttributePath,
        /// Signed offset added to the attribute.
        #[serde(default)]
        offset: i64,
        /// Display label; defaults to the path.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
}

impl BaseSource {
    /// Resolves the source, returning `None` when its attribute is absent.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError`] for non-integer attributes or overflow.
    pub fn resolve(&self, context: &dyn EvaluationContext) -> Result<Option<i64>, LevelError> {
        match self {
            Self::Fixed {
                value,
            } => Ok(Some(*value)),
            Self::Attribute {
                path,
                offset,
                ..
            } => match resolve_integer(context, path)? {
                None => Ok(None),
                Some(value) => value
                    .checked_add(*offset)
                    .map(Some)
                    .ok_or_else(|| LevelError::Overflow(self.describe())),
            },
        }
    }

    /// Short description, such as `DX-5` or `10`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Fixed {
                value,
            } => value.to_string(),
            Self::Attribute {
                path,
                offset,
                label,
            } => {
                let name = label.clone().unwrap_or_else(|| path.to_string());
                if *offset == 0 { name } else { format!("{name}{}", format_signed(*offset)) }
            }
        }
    }
}

/// Candidate base sources; the highest resolvable one wins.
///
/// # Invariants
/// - Holds at least one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BaseSource>", into = "Vec<BaseSource>")]
pub struct BaseDefinition {
    /// Sources in declaration order.
    sources: Vec<BaseSource>,
}

impl BaseDefinition {
    /// Creates a base definition.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::EmptyBase`] when `sources` is empty.
    pub fn new(sources: Vec<BaseSource>) -> Result<Self, LevelError> {
        if sources.is_empty() {
            return Err(LevelError::EmptyBase);
        }
        Ok(Self {
            sources,
        })
    }

    /// Creates a single fixed base.
    #[must_use]
    pub fn fixed(value: i64) -> Self {
        Self {
            sources: vec![BaseSource::Fixed {
                value,
            }],
        }
    }

    /// Returns the sources in declaration order.
    #[must_use]
    pub fn sources(&self) -> &[BaseSource] {
        &self.sources
    }

    /// Selects the highest resolvable source; ties keep the first declared.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError`] when a source fails to resolve.
    pub fn select(
        &self,
        context: &dyn EvaluationContext,
    ) -> Result<Option<(&BaseSource, i64)>, LevelError> {
        let mut best: Option<(&BaseSource, i64)> = None;
        for source in &self.sources {
            if let Some(value) = source.resolve(context)?
                && best.is_none_or(|(_, current)| value > current)
            {
                best = Some((source, value));
            }
        }
        Ok(best)
    }
}

impl TryFrom<Vec<BaseSource>> for BaseDefinition {
    type Error = LevelError;

    fn try_from(value: Vec<BaseSource>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BaseDefinition> for Vec<BaseSource> {
    fn from(value: BaseDefinition) -> Self {
        value.sources
    }
}

// ============================================================================
// SECTION: Reference and Modifiers
// ============================================================================

/// Attribute the relative level is measured against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Attribute path.
    pub path: AttributePath,
    /// Display label, such as `DX`.
    pub label: String,
}

impl Reference {
    /// Resolves the reference value.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError`] when the attribute is not an integer.
    pub fn resolve(&self, context: &dyn EvaluationContext) -> Result<Option<i64>, LevelError> {
        resolve_integer(context, &self.path)
    }
}

/// Signed adjustment applied when its condition holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    /// Display label.
    pub label: String,
    /// Signed delta.
    pub delta: i64,
    /// Optional applicability condition.
    pub condition: Option<PrerequisitePredicate>,
}

impl Modifier {
    /// Creates an unconditional modifier.
    #[must_use]
    pub fn new(label: impl Into<String>, delta: i64) -> Self {
        Self {
            label: label.into(),
            delta,
            condition: None,
        }
    }

    /// Adds an applicability condition.
    #[must_use]
    pub fn when(mut self, condition: PrerequisitePredicate) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Returns whether the modifier applies; an unresolved condition does not.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError`] when the condition's kind does not match.
    pub fn applies(&self, context: &dyn EvaluationContext) -> Result<bool, CriteriaError> {
        match &self.condition {
            None => Ok(true),
            Some(condition) => Ok(condition.eval(context)?.is_satisfied()),
        }
    }
}

// ============================================================================
// SECTION: Level Rule
// ============================================================================

/// Complete definition of one derived level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRule {
    /// Rule name, such as a skill name.
    pub name: String,
    /// Base sources.
    pub base: BaseDefinition,
    /// Optional reference attribute for the relative level.
    pub reference: Option<Reference>,
    /// Optional prerequisites; absent means always satisfied.
    pub prerequisites: Option<Prerequisites>,
    /// Modifiers in declaration order.
    pub modifiers: Vec<Modifier>,
}

impl LevelRule {
    /// Creates a rule with no prerequisites, modifiers, or reference.
    #[must_use]
    pub fn new(name: impl Into<String>, base: BaseDefinition) -> Self {
        Self {
            name: name.into(),
            base,
            reference: None,
            prerequisites: None,
            modifiers: Vec::new(),
        }
    }

    /// Sets the reference attribute.
    #[must_use]
    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Sets the prerequisites.
    #[must_use]
    pub fn with_prerequisites(mut self, prerequisites: Prerequisites) -> Self {
        self.prerequisites = Some(prerequisites);
        self
    }

    /// Appends a modifier.
    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }
}

// ============================================================================
// SECTION: Level Result
// ============================================================================

/// Immutable result of one level calculation.
///
/// # Invariants
/// - When `attainable` is false, `level` and `relative_level` are both
///   [`LevelResult::UNATTAINABLE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelResult {
    /// Final level.
    level: i64,
    /// Level minus the reference value, or the level when no reference applies.
    relative_level: i64,
    /// Whether the level could be computed.
    attainable: bool,
    /// Reference label when a reference was resolved.
    reference: Option<String>,
    /// Contribution lines in order.
    explanation: Vec<String>,
}

impl LevelResult {
    /// Sentinel level for unattainable results.
    pub const UNATTAINABLE: i64 = -1;

    /// Creates an attainable result.
    #[must_use]
    pub const fn attained(
        level: i64,
        relative_level: i64,
        reference: Option<String>,
        explanation: Vec<String>,
    ) -> Self {
        Self {
            level,
            relative_level,
            attainable: true,
            reference,
            explanation,
        }
    }

    /// Creates an unattainable result.
    #[must_use]
    pub const fn unattainable(explanation: Vec<String>) -> Self {
        Self {
            level: Self::UNATTAINABLE,
            relative_level: Self::UNATTAINABLE,
            attainable: false,
            reference: None,
            explanation,
        }
    }

    /// Returns the level.
    #[must_use]
    pub const fn level(&self) -> i64 {
        self.level
    }

    /// Returns the relative level.
    #[must_use]
    pub const fn relative_level(&self) -> i64 {
        self.relative_level
    }

    /// Returns whether the level could be computed.
    #[must_use]
    pub const fn is_attainable(&self) -> bool {
        self.attainable
    }

    /// Returns the resolved reference label.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Returns the explanation lines.
    #[must_use]
    pub fn explanation(&self) -> &[String] {
        &self.explanation
    }

    /// Returns the explanation as newline-separated text.
    #[must_use]
    pub fn explanation_text(&self) -> String {
        self.explanation.join("\n")
    }

    /// Renders the relative level with an explicit sign, or `-` when unattainable.
    #[must_use]
    pub fn relative_display(&self) -> String {
        if self.attainable { format_signed(self.relative_level) } else { "-".to_string() }
    }

    /// Renders the relative level prefixed by the reference label, such as `DX+1`.
    #[must_use]
    pub fn relative_label(&self) -> String {
        match (&self.reference, self.attainable) {
            (Some(label), true) => format!("{label}{}", self.relative_display()),
            _ => self.relative_display(),
        }
    }
}

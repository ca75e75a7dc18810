// crates/charsheet-core/src/core/compare.rs
// ============================================================================
// Module: Compare Types
// Description: Closed sets of comparison operators for text and numeric kinds.
// Purpose: Implement each operator's predicate, label, and description template.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Compare types are closed enums dispatched by exhaustive `match`. Text
//! comparisons are case-insensitive; both operands are lower-cased before
//! equality, substring, prefix, or suffix tests. Numeric comparisons work on
//! any totally ordered qualifier (integers, exact decimals, weights) without
//! conversion, so no rounding can change a result.
//!
//! Every variant has a stable persisted name (`at_least`, `does_not_contain`),
//! a short label for pickers, and a description template with `{subject}`
//! and `{qualifier}` slots.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Error raised when a persisted compare type name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown compare type: {0}")]
pub struct UnknownCompareType(pub String);

/// Normalizes a persisted name: ASCII lower case with `_` separators.
fn normalize_name(text: &str) -> String {
    text.trim().to_ascii_lowercase().replace('-', "_")
}

// ============================================================================
// SECTION: Template Rendering
// ============================================================================

/// Substitutes `{subject}` and `{qualifier}` in a single left-to-right pass.
///
/// Substituted text is never rescanned, so braces inside a subject or
/// qualifier are emitted verbatim.
#[must_use]
pub fn render_template(template: &str, subject: &str, qualifier: &str) -> String {
    const SUBJECT: &str = "{subject}";
    const QUALIFIER: &str = "{qualifier}";

    let mut out = String::with_capacity(template.len() + subject.len() + qualifier.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[.. start]);
        let tail = &rest[start ..];
        if let Some(after) = tail.strip_prefix(SUBJECT) {
            out.push_str(subject);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(QUALIFIER) {
            out.push_str(qualifier);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1 ..];
        }
    }
    out.push_str(rest);
    out
}

// ============================================================================
// SECTION: String Compare Type
// ============================================================================

/// Comparison operators for text qualifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringCompareType {
    /// Matches every candidate.
    #[default]
    Any,
    /// Case-insensitive equality.
    Is,
    /// Case-insensitive inequality.
    IsNot,
    /// Case-insensitive substring test.
    Contains,
    /// Negated substring test.
    DoesNotContain,
    /// Case-insensitive prefix test.
    StartsWith,
    /// Negated prefix test.
    DoesNotStartWith,
    /// Case-insensitive suffix test.
    EndsWith,
    /// Negated suffix test.
    DoesNotEndWith,
}

impl StringCompareType {
    /// All variants in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Any,
        Self::Is,
        Self::IsNot,
        Self::Contains,
        Self::DoesNotContain,
        Self::StartsWith,
        Self::DoesNotStartWith,
        Self::EndsWith,
        Self::DoesNotEndWith,
    ];

    /// Returns the stable persisted name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Is => "is",
            Self::IsNot => "is_not",
            Self::Contains => "contains",
            Self::DoesNotContain => "does_not_contain",
            Self::StartsWith => "starts_with",
            Self::DoesNotStartWith => "does_not_start_with",
            Self::EndsWith => "ends_with",
            Self::DoesNotEndWith => "does_not_end_with",
        }
    }

    /// Returns the short picker label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Any => "is anything",
            Self::Is => "is",
            Self::IsNot => "is not",
            Self::Contains => "contains",
            Self::DoesNotContain => "does not contain",
            Self::StartsWith => "starts with",
            Self::DoesNotStartWith => "does not start with",
            Self::EndsWith => "ends with",
            Self::DoesNotEndWith => "does not end with",
        }
    }

    /// Returns the description template.
    #[must_use]
    pub const fn template(self) -> &'static str {
        match self {
            Self::Any => "{subject} is anything",
            Self::Is => "{subject} is \"{qualifier}\"",
            Self::IsNot => "{subject} is not \"{qualifier}\"",
            Self::Contains => "{subject} contains \"{qualifier}\"",
            Self::DoesNotContain => "{subject} does not contain \"{qualifier}\"",
            Self::StartsWith => "{subject} starts with \"{qualifier}\"",
            Self::DoesNotStartWith => "{subject} does not start with \"{qualifier}\"",
            Self::EndsWith => "{subject} ends with \"{qualifier}\"",
            Self::DoesNotEndWith => "{subject} does not end with \"{qualifier}\"",
        }
    }

    /// Tests `candidate` against `qualifier`, ignoring case.
    #[must_use]
    pub fn matches(self, qualifier: &str, candidate: &str) -> bool {
        if self == Self::Any {
            return true;
        }
        let qualifier = qualifier.to_lowercase();
        let candidate = candidate.to_lowercase();
        match self {
            Self::Any => true,
            Self::Is => candidate == qualifier,
            Self::IsNot => candidate != qualifier,
            Self::Contains => candidate.contains(&qualifier),
            Self::DoesNotContain => !candidate.contains(&qualifier),
            Self::StartsWith => candidate.starts_with(&qualifier),
            Self::DoesNotStartWith => !candidate.starts_with(&qualifier),
            Self::EndsWith => candidate.ends_with(&qualifier),
            Self::DoesNotEndWith => !candidate.ends_with(&qualifier),
        }
    }

    /// Renders the description template.
    #[must_use]
    pub fn describe(self, subject: &str, qualifier: &str) -> String {
        render_template(self.template(), subject, qualifier)
    }
}

impl FromStr for StringCompareType {
    type Err = UnknownCompareType;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let name = normalize_name(text);
        Self::ALL
            .into_iter()
            .find(|variant| variant.name() == name)
            .ok_or_else(|| UnknownCompareType(text.to_string()))
    }
}

impl fmt::Display for StringCompareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// SECTION: Numeric Compare Type
// ============================================================================

/// Comparison operators for ordered qualifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericCompareType {
    /// Candidate equals qualifier.
    Is,
    /// Candidate is greater than or equal to qualifier.
    #[default]
    AtLeast,
    /// Candidate is less than or equal to qualifier.
    AtMost,
}

impl NumericCompareType {
    /// All variants in declaration order.
    pub const ALL: [Self; 3] = [Self::Is, Self::AtLeast, Self::AtMost];

    /// Returns the stable persisted name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Is => "is",
            Self::AtLeast => "at_least",
            Self::AtMost => "at_most",
        }
    }

    /// Returns the short picker label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Is => "exactly",
            Self::AtLeast => "at least",
            Self::AtMost => "at most",
        }
    }

    /// Returns the description template.
    #[must_use]
    pub const fn template(self) -> &'static str {
        match self {
            Self::Is => "{subject} is exactly {qualifier}",
            Self::AtLeast => "{subject} is at least {qualifier}",
            Self::AtMost => "{subject} is at most {qualifier}",
        }
    }

    /// Tests `candidate` against `qualifier`.
    #[must_use]
    pub fn matches<T: Ord + ?Sized>(self, qualifier: &T, candidate: &T) -> bool {
        let ordering = candidate.cmp(qualifier);
        match self {
            Self::Is => ordering.is_eq(),
            Self::AtLeast => ordering.is_ge(),
            Self::AtMost => ordering.is_le(),
        }
    }

    /// Renders the description template.
    #[must_use]
    pub fn describe(self, subject: &str, qualifier: &str) -> String {
        render_template(self.template(), subject, qualifier)
    }
}

impl FromStr for NumericCompareType {
    type Err = UnknownCompareType;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let name = normalize_name(text);
        Self::ALL
            .into_iter()
            .find(|variant| variant.name() == name)
            .ok_or_else(|| UnknownCompareType(text.to_string()))
    }
}

impl fmt::Display for NumericCompareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

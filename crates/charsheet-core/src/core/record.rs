// crates/charsheet-core/src/core/record.rs
// ============================================================================
// Module: Persisted Records
// Description: Key/value records for criteria, prerequisites, and level rules.
// Purpose: Load saved documents tolerantly and export them with stable names.
// Dependencies: prereq-logic, serde, serde_json, ron, thiserror
// ============================================================================

//! ## Overview
//! Criteria persist as `{"compareType": "...", "qualifier": ...}`. Loading is
//! tolerant: an unknown compare type or a qualifier of the wrong shape falls
//! back to the kind's default and yields a [`RecordWarning`] instead of
//! failing the document. Structural problems (unparseable text, malformed
//! requirement trees, invalid paths) are [`RecordError`]s.
//!
//! [`RuleRecord`] is the on-disk form of a [`LevelRule`], readable from JSON or
//! RON.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::path::Path;

use prereq_logic::Requirement;
use prereq_logic::RequirementValidator;
use prereq_logic::SerdeConfig;
use prereq_logic::SerdeError;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::attribute::AttributePath;
use crate::core::attribute::ValueKind;
use crate::core::compare::NumericCompareType;
use crate::core::compare::StringCompareType;
use crate::core::criteria::AnyCriteria;
use crate::core::criteria::Criteria;
use crate::core::criteria::CriteriaKind;
use crate::core::level::BaseDefinition;
use crate::core::level::LevelRule;
use crate::core::level::Modifier;
use crate::core::level::Reference;
use crate::core::prerequisite::PrerequisitePredicate;

// ============================================================================
// SECTION: Errors and Warnings
// ============================================================================

/// Fatal errors raised while loading a record document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Document text could not be parsed.
    #[error("invalid {format} record: {message}")]
    Parse {
        /// Document format.
        format: RecordFormat,
        /// Parser message.
        message: String,
    },
    /// Document could not be encoded.
    #[error("failed to encode {format} record: {message}")]
    Encode {
        /// Document format.
        format: RecordFormat,
        /// Encoder message.
        message: String,
    },
    /// Prerequisite tree is structurally invalid.
    #[error(transparent)]
    Structure(#[from] SerdeError),
}

/// Non-fatal validity warning raised while loading a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum RecordWarning {
    /// Compare type name was not recognized.
    UnknownCompareType {
        /// Name found in the record.
        name: String,
        /// Compare type used instead.
        fallback: String,
    },
    /// Qualifier had the wrong shape or text for its kind.
    InvalidQualifier {
        /// Criteria kind.
        kind: ValueKind,
        /// Parse failure.
        reason: String,
    },
    /// Record named a kind that has no criteria.
    UnsupportedKind {
        /// Kind found in the record.
        kind: ValueKind,
    },
}

impl fmt::Display for RecordWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCompareType {
                name,
                fallback,
            } => write!(f, "unknown compare type \"{name}\", using \"{fallback}\""),
            Self::InvalidQualifier {
                kind,
                reason,
            } => write!(f, "invalid {kind} qualifier ({reason}), using default"),
            Self::UnsupportedKind {
                kind,
            } => write!(f, "criteria kind \"{kind}\" is not supported, using text"),
        }
    }
}

/// Loaded value plus the warnings raised while loading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded<T> {
    /// Loaded value.
    pub value: T,
    /// Warnings in document order.
    pub warnings: Vec<RecordWarning>,
}

impl<T> Loaded<T> {
    /// Wraps a value with no warnings.
    #[must_use]
    pub const fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Returns true when no warnings were raised.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Moves the warnings into `sink` and returns the value.
    pub fn drain_into(self, sink: &mut Vec<RecordWarning>) -> T {
        sink.extend(self.warnings);
        self.value
    }
}

// ============================================================================
// SECTION: Record Format
// ============================================================================

/// Text format of a record document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// JSON text.
    Json,
    /// RON text.
    Ron,
}

impl RecordFormat {
    /// Picks the format from a file extension; anything but `.ron` is JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ron") => Self::Ron,
            _ => Self::Json,
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "JSON",
            Self::Ron => "RON",
        })
    }
}

// ============================================================================
// SECTION: Criteria Records
// ============================================================================

/// Persisted criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaRecord {
    /// Compare type name.
    #[serde(rename = "compareType")]
    pub compare_type: String,
    /// Qualifier as text, number, or weight text.
    #[serde(default)]
    pub qualifier: Value,
    /// Criteria kind; inferred from the other fields when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValueKind>,
}

impl<K: CriteriaKind> Criteria<K> {
    /// Exports the criteria with its kind tag.
    ///
    /// The tag is always written so untyped loaders never reinfer the kind
    /// from the qualifier text.
    #[must_use]
    pub fn to_record(&self) -> CriteriaRecord {
        CriteriaRecord {
            compare_type: self.compare_type().to_string(),
            qualifier: K::qualifier_to_json(self.qualifier()),
            kind: Some(K::KIND),
        }
    }

    /// Loads criteria, substituting defaults for unusable fields.
    #[must_use]
    pub fn from_record(record: &CriteriaRecord) -> Loaded<Self> {
        let mut warnings = Vec::new();
        let compare = record.compare_type.parse::<K::Compare>().unwrap_or_else(|_| {
            let fallback = K::Compare::default();
            warnings.push(RecordWarning::UnknownCompareType {
                name: record.compare_type.clone(),
                fallback: fallback.to_string(),
            });
            fallback
        });
        let qualifier = if record.qualifier.is_null() {
            K::Value::default()
        } else {
            K::qualifier_from_json(&record.qualifier).unwrap_or_else(|err| {
                warnings.push(RecordWarning::InvalidQualifier {
                    kind: K::KIND,
                    reason: err.to_string(),
                });
                K::Value::default()
            })
        };
        Loaded {
            value: Self::new(compare, qualifier),
            warnings,
        }
    }
}

impl AnyCriteria {
    /// Exports the criteria with its kind tag.
    #[must_use]
    pub fn to_record(&self) -> CriteriaRecord {
        match self {
            Self::Text(criteria) => criteria.to_record(),
            Self::Integer(criteria) => criteria.to_record(),
            Self::Decimal(criteria) => criteria.to_record(),
            Self::Weight(criteria) => criteria.to_record(),
        }
    }

    /// Loads criteria of any kind, inferring the kind when untagged.
    #[must_use]
    pub fn from_record(record: &CriteriaRecord) -> Loaded<Self> {
        let kind = record.kind.unwrap_or_else(|| infer_kind(record));
        match kind {
            ValueKind::Text => load_as(record, Self::Text),
            ValueKind::Integer => load_as(record, Self::Integer),
            ValueKind::Decimal => load_as(record, Self::Decimal),
            ValueKind::Weight => load_as(record, Self::Weight),
            ValueKind::List => {
                let mut loaded = load_as(record, Self::Text);
                loaded.warnings.insert(0, RecordWarning::UnsupportedKind {
                    kind,
                });
                loaded
            }
        }
    }
}

/// Loads typed criteria and wraps them.
fn load_as<K: CriteriaKind>(
    record: &CriteriaRecord,
    wrap: fn(Criteria<K>) -> AnyCriteria,
) -> Loaded<AnyCriteria> {
    let loaded = Criteria::<K>::from_record(record);
    Loaded {
        value: wrap(loaded.value),
        warnings: loaded.warnings,
    }
}

/// Infers the kind of an untagged record.
///
/// Numbers are integers or decimals. Text qualifiers are text unless the
/// compare type is numeric-only, in which case they are integers, weights
/// (when they end in a unit), or decimals.
fn infer_kind(record: &CriteriaRecord) -> ValueKind {
    match &record.qualifier {
        Value::Number(number) if number.is_i64() => ValueKind::Integer,
        Value::Number(_) => ValueKind::Decimal,
        Value::String(text) => {
            let numeric_only = record.compare_type.parse::<NumericCompareType>().is_ok()
                && record.compare_type.parse::<StringCompareType>().is_err();
            if !numeric_only {
                ValueKind::Text
            } else if text.trim().parse::<i64>().is_ok() {
                ValueKind::Integer
            } else if text.trim().ends_with(char::is_alphabetic) {
                ValueKind::Weight
            } else {
                ValueKind::Decimal
            }
        }
        _ => ValueKind::Text,
    }
}

// ============================================================================
// SECTION: Prerequisite Records
// ============================================================================

/// Persisted prerequisite leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredicateRecord {
    /// Attribute path.
    pub path: AttributePath,
    /// Subject text; defaults to the path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Criteria applied to the attribute.
    pub criteria: CriteriaRecord,
}

impl PredicateRecord {
    /// Exports a predicate.
    #[must_use]
    pub fn from_predicate(predicate: &PrerequisitePredicate) -> Self {
        let subject = (predicate.subject() != predicate.path().as_str())
            .then(|| predicate.subject().to_string());
        Self {
            path: predicate.path().clone(),
            subject,
            criteria: predicate.criteria().to_record(),
        }
    }

    /// Loads the predicate with any criteria warnings.
    #[must_use]
    pub fn into_predicate(self) -> Loaded<PrerequisitePredicate> {
        let loaded = AnyCriteria::from_record(&self.criteria);
        let mut predicate = PrerequisitePredicate::new(self.path, loaded.value);
        if let Some(subject) = self.subject {
            predicate = predicate.with_subject(subject);
        }
        Loaded {
            value: predicate,
            warnings: loaded.warnings,
        }
    }
}

/// Persisted modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModifierRecord {
    /// Display label.
    pub label: String,
    /// Signed delta.
    pub delta: i64,
    /// Optional applicability condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<PredicateRecord>,
}

// ============================================================================
// SECTION: Rule Records
// ============================================================================

/// Persisted level rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleRecord {
    /// Rule name.
    pub name: String,
    /// Base sources.
    pub base: BaseDefinition,
    /// Optional reference attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
    /// Optional prerequisite tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisites: Option<Requirement<PredicateRecord>>,
    /// Modifiers in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<ModifierRecord>,
}

impl RuleRecord {
    /// Parses a rule document.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Parse`] when the text is not a valid rule.
    pub fn parse(text: &str, format: RecordFormat) -> Result<Self, RecordError> {
        let parsed = match format {
            RecordFormat::Json => serde_json::from_str(text).map_err(|err| err.to_string()),
            RecordFormat::Ron => ron::from_str(text).map_err(|err| err.to_string()),
        };
        parsed.map_err(|message| RecordError::Parse {
            format,
            message,
        })
    }

    /// Renders the rule document.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Encode`] when encoding fails.
    pub fn render(&self, format: RecordFormat) -> Result<String, RecordError> {
        let rendered = match format {
            RecordFormat::Json => serde_json::to_string_pretty(self).map_err(|err| err.to_string()),
            RecordFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|err| err.to_string()),
        };
        rendered.map_err(|message| RecordError::Encode {
            format,
            message,
        })
    }

    /// Exports a rule.
    #[must_use]
    pub fn from_rule(rule: &LevelRule) -> Self {
        let prerequisites = rule
            .prerequisites
            .clone()
            .map(|tree| tree.map_predicates(&mut |predicate| PredicateRecord::from_predicate(&predicate)));
        let modifiers = rule
            .modifiers
            .iter()
            .map(|modifier| ModifierRecord {
                label: modifier.label.clone(),
                delta: modifier.delta,
                condition: modifier.condition.as_ref().map(PredicateRecord::from_predicate),
            })
            .collect();
        Self {
            name: rule.name.clone(),
            base: rule.base.clone(),
            reference: rule.reference.clone(),
            prerequisites,
            modifiers,
        }
    }

    /// Converts the record into an evaluable rule.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Structure`] when the prerequisite tree violates
    /// the structural limits in `limits`.
    pub fn into_rule(self, limits: SerdeConfig) -> Result<Loaded<LevelRule>, RecordError> {
        let mut warnings = Vec::new();
        let prerequisites = match self.prerequisites {
            Some(tree) => {
                RequirementValidator::new(limits).validate(&tree)?;
                Some(tree.map_predicates(&mut |record| record.into_predicate().drain_into(&mut warnings)))
            }
            None => None,
        };
        let modifiers = self
            .modifiers
            .into_iter()
            .map(|record| Modifier {
                label: record.label,
                delta: record.delta,
                condition: record.condition.map(|condition| condition.into_predicate().drain_into(&mut warnings)),
            })
            .collect();
        Ok(Loaded {
            value: LevelRule {
                name: self.name,
                base: self.base,
                reference: self.reference,
                prerequisites,
                modifiers,
            },
            warnings,
        })
    }
}

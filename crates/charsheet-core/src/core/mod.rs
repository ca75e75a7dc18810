// crates/charsheet-core/src/core/mod.rs
// ============================================================================
// Module: Charsheet Core Types
// Description: Qualifiers, compare types, criteria, prerequisites, and levels.
// Purpose: Provide the data model consumed by the runtime evaluators.
// Dependencies: prereq-logic, bigdecimal, serde
// ============================================================================

//! ## Overview
//! Core types are plain values: criteria own their qualifiers, requirement
//! trees own their children, and level results are immutable snapshots.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod attribute;
pub mod compare;
pub mod criteria;
pub mod level;
pub mod prerequisite;
pub mod qualifier;
pub mod record;
pub mod weight;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use attribute::AttributePath;
pub use attribute::AttributeValue;
pub use attribute::ContextError;
pub use attribute::ValueKind;
pub use compare::NumericCompareType;
pub use compare::StringCompareType;
pub use compare::UnknownCompareType;
pub use criteria::AnyCriteria;
pub use criteria::Criteria;
pub use criteria::CriteriaError;
pub use criteria::CriteriaKind;
pub use criteria::DecimalCriteria;
pub use criteria::DecimalKind;
pub use criteria::IntegerCriteria;
pub use criteria::IntegerKind;
pub use criteria::StringCriteria;
pub use criteria::TextKind;
pub use criteria::WeightCriteria;
pub use criteria::WeightKind;
pub use level::BaseDefinition;
pub use level::BaseSource;
pub use level::LevelError;
pub use level::LevelResult;
pub use level::LevelRule;
pub use level::Modifier;
pub use level::Reference;
pub use level::format_signed;
pub use prerequisite::EvaluationError;
pub use prerequisite::PrerequisitePredicate;
pub use prerequisite::Prerequisites;
pub use qualifier::QualifierParseError;
pub use record::CriteriaRecord;
pub use record::Loaded;
pub use record::ModifierRecord;
pub use record::PredicateRecord;
pub use record::RecordError;
pub use record::RecordFormat;
pub use record::RecordWarning;
pub use record::RuleRecord;
pub use weight::Weight;
pub use weight::WeightUnit;

// crates/charsheet-core/tests/records.rs
// ============================================================================
// Module: Persisted Record Tests
// Description: Criteria and rule records, including malformed input recovery.
// ============================================================================
//! ## Overview
//! Records keep stable field names (`compareType`, `qualifier`). Bad
//! qualifiers load with defaults and warnings; bad tree structure is fatal.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

#[macro_use]
mod support;

use std::path::Path;

use bigdecimal::BigDecimal;
use charsheet_core::AnyCriteria;
use charsheet_core::AttributeValue;
use charsheet_core::CriteriaRecord;
use charsheet_core::DecimalCriteria;
use charsheet_core::IntegerCriteria;
use charsheet_core::LevelRule;
use charsheet_core::NumericCompareType;
use charsheet_core::RecordError;
use charsheet_core::RecordFormat;
use charsheet_core::RecordWarning;
use charsheet_core::RuleRecord;
use charsheet_core::StringCompareType;
use charsheet_core::StringCriteria;
use charsheet_core::ValueKind;
use charsheet_core::Weight;
use charsheet_core::WeightCriteria;
use prereq_logic::SerdeConfig;
use serde_json::json;
use support::TestResult;

/// Parses a criteria record from JSON.
fn record(value: serde_json::Value) -> CriteriaRecord {
    serde_json::from_value(value).expect("valid criteria record")
}

// ============================================================================
// SECTION: Criteria Records
// ============================================================================

#[test]
fn record_field_names_are_stable() -> TestResult {
    let criteria = IntegerCriteria::new(NumericCompareType::AtLeast, 12);
    let value = serde_json::to_value(criteria.to_record())?;
    check_eq!(value, json!({"compareType": "at_least", "qualifier": 12, "kind": "integer"}));

    let erased = serde_json::to_value(AnyCriteria::from(criteria).to_record())?;
    check_eq!(erased, value);
    Ok(())
}

#[test]
fn typed_exports_reload_as_the_same_kind() -> TestResult {
    let decimal = DecimalCriteria::new(NumericCompareType::Is, "1.5".parse()?);
    let loaded = AnyCriteria::from_record(&decimal.to_record());
    check!(loaded.is_clean(), "warnings: {:?}", loaded.warnings);
    check_eq!(loaded.value, AnyCriteria::from(decimal));

    let weight = WeightCriteria::new(NumericCompareType::Is, "25 lb".parse()?);
    let loaded = AnyCriteria::from_record(&weight.to_record());
    check!(loaded.is_clean(), "warnings: {:?}", loaded.warnings);
    check_eq!(loaded.value.kind(), ValueKind::Weight);
    let load = AttributeValue::Weight("25 lb".parse()?);
    check!(loaded.value.matches_value(&load)?);

    let integer = IntegerCriteria::new(NumericCompareType::Is, 7);
    check_eq!(AnyCriteria::from_record(&integer.to_record()).value.kind(), ValueKind::Integer);
    let text = StringCriteria::new(StringCompareType::Is, "12".to_string());
    check_eq!(AnyCriteria::from_record(&text.to_record()).value.kind(), ValueKind::Text);
    Ok(())
}

#[test]
fn every_string_variant_survives_a_round_trip() -> TestResult {
    let candidates = ["Fireball", "fire", "BALL", "Light", ""];
    for variant in StringCompareType::ALL {
        let original = StringCriteria::new(variant, "Fire".to_string());
        let loaded = StringCriteria::from_record(&original.to_record());
        check!(loaded.is_clean());
        for candidate in candidates {
            let candidate = candidate.to_string();
            check_eq!(loaded.value.matches(&candidate), original.matches(&candidate));
        }
    }
    Ok(())
}

#[test]
fn every_numeric_variant_survives_a_round_trip() -> TestResult {
    let two = BigDecimal::from(2);
    for variant in NumericCompareType::ALL {
        for qualifier in [10_i64, -3, i64::MAX] {
            let integer = IntegerCriteria::new(variant, qualifier);
            let loaded = IntegerCriteria::from_record(&integer.to_record());
            check!(loaded.is_clean(), "warnings: {:?}", loaded.warnings);
            check_eq!(loaded.value, integer);
            for candidate in [qualifier.saturating_sub(1), qualifier, qualifier.saturating_add(1), 0] {
                check_eq!(loaded.value.matches(&candidate), integer.matches(&candidate));
            }
        }

        for qualifier in ["5.25", "0.0000001", "1e3", "1.5E-9", "123456789012345678901234567890.5"] {
            let decimal = DecimalCriteria::new(variant, qualifier.parse()?);
            let loaded = DecimalCriteria::from_record(&decimal.to_record());
            check!(loaded.is_clean(), "{qualifier}: {:?}", loaded.warnings);
            check_eq!(loaded.value, decimal);
            let exact = decimal.qualifier().clone();
            for candidate in [&exact / &two, exact.clone(), &exact * &two, -exact.clone()] {
                check_eq!(loaded.value.matches(&candidate), decimal.matches(&candidate));
            }
        }

        for qualifier in ["2 kg", "0.0000001 lb", "1e3 lb", "1.5E-9 t"] {
            let weight = WeightCriteria::new(variant, qualifier.parse()?);
            let loaded = WeightCriteria::from_record(&weight.to_record());
            check!(loaded.is_clean(), "{qualifier}: {:?}", loaded.warnings);
            check_eq!(loaded.value, weight);
            check_eq!(loaded.value.qualifier().unit(), weight.qualifier().unit());
            let exact = weight.qualifier();
            let unit = exact.unit();
            for magnitude in [exact.magnitude() / &two, exact.magnitude().clone(), exact.magnitude() * &two] {
                let candidate = Weight::new(magnitude, unit);
                check_eq!(loaded.value.matches(&candidate), weight.matches(&candidate));
            }
        }
    }
    Ok(())
}

#[test]
fn unknown_compare_type_falls_back_with_warning() -> TestResult {
    let loaded = IntegerCriteria::from_record(&record(json!({
        "compareType": "more_than",
        "qualifier": 3
    })));
    check_eq!(loaded.value.compare_type(), NumericCompareType::AtLeast);
    check_eq!(*loaded.value.qualifier(), 3);
    check_eq!(loaded.warnings, vec![RecordWarning::UnknownCompareType {
        name: "more_than".to_string(),
        fallback: "at_least".to_string(),
    }]);
    Ok(())
}

#[test]
fn wrong_qualifier_shape_falls_back_to_default() -> TestResult {
    let loaded = IntegerCriteria::from_record(&record(json!({
        "compareType": "AT_MOST",
        "qualifier": ["x"]
    })));
    check_eq!(loaded.value.compare_type(), NumericCompareType::AtMost);
    check_eq!(*loaded.value.qualifier(), 0);
    check!(matches!(
        loaded.warnings.as_slice(),
        [RecordWarning::InvalidQualifier {
            kind: ValueKind::Integer,
            ..
        }]
    ));
    Ok(())
}

#[test]
fn missing_qualifier_is_a_silent_default() -> TestResult {
    let loaded = StringCriteria::from_record(&record(json!({"compareType": "any"})));
    check!(loaded.is_clean());
    check_eq!(loaded.value, StringCriteria::default());
    Ok(())
}

#[test]
fn untagged_records_infer_their_kind() -> TestResult {
    let infer = |value| AnyCriteria::from_record(&record(value)).value.kind();
    check_eq!(infer(json!({"compareType": "is", "qualifier": "Fireball"})), ValueKind::Text);
    check_eq!(infer(json!({"compareType": "at_least", "qualifier": 12})), ValueKind::Integer);
    check_eq!(infer(json!({"compareType": "at_least", "qualifier": 1.5})), ValueKind::Decimal);
    check_eq!(infer(json!({"compareType": "at_least", "qualifier": "12"})), ValueKind::Integer);
    check_eq!(infer(json!({"compareType": "at_most", "qualifier": "25 lb"})), ValueKind::Weight);
    check_eq!(infer(json!({"compareType": "at_most", "qualifier": "2.5"})), ValueKind::Decimal);
    check_eq!(infer(json!({"compareType": "at_most", "qualifier": "1e3"})), ValueKind::Decimal);
    check_eq!(infer(json!({"compareType": "at_most", "qualifier": "1e3 lb"})), ValueKind::Weight);
    Ok(())
}

#[test]
fn list_kind_loads_as_text_with_warning() -> TestResult {
    let loaded = AnyCriteria::from_record(&record(json!({
        "compareType": "contains",
        "qualifier": "Fire",
        "kind": "list"
    })));
    check_eq!(loaded.value.kind(), ValueKind::Text);
    check_eq!(loaded.warnings, vec![RecordWarning::UnsupportedKind {
        kind: ValueKind::List,
    }]);
    Ok(())
}

// ============================================================================
// SECTION: Rule Records
// ============================================================================

/// Rule with every optional section populated.
const BROADSWORD: &str = r#"{
    "name": "Broadsword",
    "base": [
        {"attribute": {"path": "DX", "offset": -5}},
        {"attribute": {"path": "skills.Shortsword", "offset": -2, "label": "Shortsword"}}
    ],
    "reference": {"path": "DX", "label": "DX"},
    "prerequisites": {"And": [
        {"Predicate": {"path": "ST", "criteria": {"compareType": "at_least", "qualifier": 9}}},
        {"Not": {"Predicate": {"path": "traits", "subject": "trait",
            "criteria": {"compareType": "is", "qualifier": "One Arm"}}}}
    ]},
    "modifiers": [
        {"label": "encumbrance", "delta": -1,
         "condition": {"path": "load", "criteria": {"compareType": "at_least", "qualifier": "20 lb"}}}
    ]
}"#;

#[test]
fn rule_record_loads_cleanly() -> TestResult {
    let record = RuleRecord::parse(BROADSWORD, RecordFormat::Json)?;
    let loaded = record.into_rule(SerdeConfig::default())?;
    check!(loaded.is_clean(), "warnings: {:?}", loaded.warnings);
    let rule: LevelRule = loaded.value;
    check_eq!(rule.name, "Broadsword");
    check_eq!(rule.base.sources().len(), 2);
    check_eq!(rule.modifiers.len(), 1);
    check!(rule.prerequisites.is_some());
    Ok(())
}

#[test]
fn rule_record_converts_between_formats() -> TestResult {
    let record = RuleRecord::parse(BROADSWORD, RecordFormat::Json)?;
    let ron = record.render(RecordFormat::Ron)?;
    let reparsed = RuleRecord::parse(&ron, RecordFormat::Ron)?;
    check_eq!(reparsed, record);

    let rule = reparsed.into_rule(SerdeConfig::default())?.value;
    check_eq!(RuleRecord::from_rule(&rule).name, "Broadsword");
    Ok(())
}

#[test]
fn malformed_leaf_qualifier_is_a_warning() -> TestResult {
    let text = r#"{
        "name": "Lockpicking",
        "base": [{"fixed": {"value": 10}}],
        "prerequisites": {"Predicate": {"path": "DX",
            "criteria": {"compareType": "at_least", "qualifier": "high", "kind": "integer"}}}
    }"#;
    let loaded = RuleRecord::parse(text, RecordFormat::Json)?.into_rule(SerdeConfig::default())?;
    check_eq!(loaded.warnings.len(), 1);
    check!(loaded.value.prerequisites.is_some());
    Ok(())
}

#[test]
fn invalid_group_is_fatal() -> TestResult {
    let text = r#"{
        "name": "Odd",
        "base": [{"fixed": {"value": 10}}],
        "prerequisites": {"RequireGroup": {"min": 3, "reqs": [
            {"Predicate": {"path": "DX", "criteria": {"compareType": "at_least", "qualifier": 1}}}
        ]}}
    }"#;
    let result = RuleRecord::parse(text, RecordFormat::Json)?.into_rule(SerdeConfig::default());
    check!(matches!(result, Err(RecordError::Structure(_))));
    Ok(())
}

#[test]
fn empty_base_and_unknown_fields_fail_to_parse() -> TestResult {
    let empty = r#"{"name": "x", "base": []}"#;
    check!(matches!(RuleRecord::parse(empty, RecordFormat::Json), Err(RecordError::Parse { .. })));
    let extra = r#"{"name": "x", "base": [{"fixed": {"value": 1}}], "cost": 4}"#;
    check!(matches!(RuleRecord::parse(extra, RecordFormat::Json), Err(RecordError::Parse { .. })));
    Ok(())
}

#[test]
fn format_follows_extension() -> TestResult {
    check_eq!(RecordFormat::from_path(Path::new("rules/sword.ron")), RecordFormat::Ron);
    check_eq!(RecordFormat::from_path(Path::new("rules/sword.json")), RecordFormat::Json);
    check_eq!(RecordFormat::from_path(Path::new("rules/sword")), RecordFormat::Json);
    Ok(())
}

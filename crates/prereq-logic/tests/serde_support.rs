// crates/prereq-logic/tests/serde_support.rs
// ============================================================================
// Module: Serialization Tests
// Description: Tests for structural validation and JSON/RON helpers.
// ============================================================================
//! ## Overview
//! Integration tests for serde helpers and validators.

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

use prereq_logic::Requirement;
use prereq_logic::serde_support::RequirementSerializer;
use prereq_logic::serde_support::RequirementValidator;
use prereq_logic::serde_support::SerdeConfig;
use prereq_logic::serde_support::SerdeError;
use prereq_logic::serde_support::convenience;
use support::TestResult;
use support::mocks::MockPredicate;
use support::mocks::at_least;

/// Builds a chain of `depth` nested negations around a leaf.
fn nested(depth: usize) -> Requirement<MockPredicate> {
    let mut req = Requirement::predicate(MockPredicate::AlwaysTrue);
    for _ in 1..depth {
        req = Requirement::negate(req);
    }
    req
}

/// Representative tree covering every node kind.
fn sample() -> Requirement<MockPredicate> {
    Requirement::and(vec![
        Requirement::predicate(at_least(0, 3)),
        Requirement::negate(Requirement::predicate(MockPredicate::AlwaysFalse)),
        Requirement::require_group(
            1,
            vec![Requirement::predicate(MockPredicate::AlwaysTrue), Requirement::predicate(at_least(1, 2))],
        ),
    ])
}

// ============================================================================
// SECTION: Validation
// ============================================================================

#[test]
fn validator_accepts_well_formed_tree() -> TestResult {
    RequirementValidator::default().validate(&sample())?;
    check!(convenience::is_valid(&sample()));
    Ok(())
}

#[test]
fn validator_rejects_empty_groups_by_default() -> TestResult {
    let empty: Requirement<MockPredicate> = Requirement::or(vec![]);
    check_eq!(RequirementValidator::default().validate(&empty), Err(SerdeError::EmptyGroup("any")));

    let relaxed = RequirementValidator::new(SerdeConfig {
        allow_empty_logical: true,
        ..SerdeConfig::default()
    });
    relaxed.validate(&empty)?;
    Ok(())
}

#[test]
fn validator_rejects_out_of_range_counts() -> TestResult {
    let zero = Requirement::require_group(0, vec![Requirement::predicate(MockPredicate::AlwaysTrue)]);
    check_eq!(
        RequirementValidator::default().validate(&zero),
        Err(SerdeError::InvalidGroup {
            min: 0,
            total: 1,
        })
    );

    let too_many = Requirement::require_group(3, vec![Requirement::predicate(MockPredicate::AlwaysTrue)]);
    check_eq!(
        RequirementValidator::default().validate(&too_many),
        Err(SerdeError::InvalidGroup {
            min: 3,
            total: 1,
        })
    );
    Ok(())
}

#[test]
fn validator_enforces_depth_limit() -> TestResult {
    let validator = RequirementValidator::new(SerdeConfig {
        max_depth: 4,
        ..SerdeConfig::default()
    });
    validator.validate(&nested(4))?;
    check_eq!(
        validator.validate(&nested(5)),
        Err(SerdeError::TooDeep {
            max_depth: 4,
            actual_depth: 5,
        })
    );
    Ok(())
}

#[test]
fn error_messages_carry_details() -> TestResult {
    let message = SerdeError::InvalidGroup {
        min: 5,
        total: 3,
    }
    .to_string();
    check!(message.contains('5') && message.contains('3'), "unexpected message: {message}");
    Ok(())
}

// ============================================================================
// SECTION: Round Trips
// ============================================================================

#[test]
fn json_round_trip_preserves_tree() -> TestResult {
    let json = convenience::to_json(&sample())?;
    let parsed: Requirement<MockPredicate> = convenience::from_json(&json)?;
    check_eq!(parsed, sample());
    Ok(())
}

#[test]
fn ron_round_trip_preserves_tree() -> TestResult {
    let ron = convenience::to_ron(&sample())?;
    let parsed: Requirement<MockPredicate> = convenience::from_ron(&ron)?;
    check_eq!(parsed, sample());
    Ok(())
}

#[test]
fn deserialization_validates_structure() -> TestResult {
    let json = r#"{"RequireGroup":{"min":2,"reqs":[{"Predicate":"AlwaysTrue"}]}}"#;
    let result: Result<Requirement<MockPredicate>, SerdeError> = convenience::from_json(json);
    check_eq!(
        result,
        Err(SerdeError::InvalidGroup {
            min: 2,
            total: 1,
        })
    );
    Ok(())
}

#[test]
fn malformed_text_is_an_encoding_error() -> TestResult {
    let result: Result<Requirement<MockPredicate>, SerdeError> = convenience::from_json("{\"And\": 7}");
    check!(matches!(result, Err(SerdeError::Encoding(_))));
    let result: Result<Requirement<MockPredicate>, SerdeError> =
        RequirementSerializer::default().from_ron("And(");
    check!(matches!(result, Err(SerdeError::Encoding(_))));
    Ok(())
}

#[test]
fn serializer_refuses_invalid_tree() -> TestResult {
    let invalid: Requirement<MockPredicate> = Requirement::and(vec![]);
    check!(matches!(RequirementSerializer::default().to_json(&invalid), Err(SerdeError::EmptyGroup("all"))));
    Ok(())
}

// crates/prereq-logic/tests/builder.rs
// ============================================================================
// Module: Builder Tests
// Description: Tests for fluent requirement and group builders.
// ============================================================================
//! ## Overview
//! Integration tests for builder ergonomics and the trees they produce.

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

use prereq_logic::GroupBuilder;
use prereq_logic::GroupKind;
use prereq_logic::Requirement;
use prereq_logic::RequirementBuilder;
use prereq_logic::convenience;
use support::TestResult;
use support::mocks::MockPredicate;
use support::mocks::at_least;

/// Context used by builder tests: slot 0 = 4.
const CONTEXT: [i32; 1] = [4];

#[test]
fn group_builder_matches_constructors() -> TestResult {
    let built = RequirementBuilder::all()
        .with_predicate(MockPredicate::AlwaysTrue)
        .without_predicate(MockPredicate::AlwaysFalse)
        .build();
    let expected = convenience::all(vec![
        convenience::predicate(MockPredicate::AlwaysTrue),
        convenience::not(convenience::predicate(MockPredicate::AlwaysFalse)),
    ]);
    check_eq!(built, expected);
    check!(built.eval(&CONTEXT)?);
    Ok(())
}

#[test]
fn at_least_group_builds_require_group() -> TestResult {
    let built = RequirementBuilder::at_least(2)
        .with_all([Requirement::predicate(at_least(0, 1)), Requirement::predicate(at_least(0, 9))])
        .with(Requirement::predicate(MockPredicate::AlwaysTrue))
        .build();
    check_eq!(built.required_count(), Some(2));
    check!(built.eval(&CONTEXT)?);
    Ok(())
}

#[test]
fn negated_group_wraps_in_not() -> TestResult {
    let built: Requirement<MockPredicate> =
        GroupBuilder::new(GroupKind::Any).with_predicate(MockPredicate::AlwaysFalse).negated().build();
    check!(matches!(built, Requirement::Not(_)));
    check!(built.eval(&CONTEXT)?);
    Ok(())
}

#[test]
fn double_negated_toggles_back() -> TestResult {
    let built: Requirement<MockPredicate> =
        GroupBuilder::new(GroupKind::All).with_predicate(MockPredicate::AlwaysTrue).negated().negated().build();
    check!(matches!(built, Requirement::And(_)));
    Ok(())
}

#[test]
fn requirement_builder_chains() -> TestResult {
    let built = (!RequirementBuilder::predicate(MockPredicate::AlwaysFalse))
        .and_also(Requirement::predicate(at_least(0, 4)))
        .or_else(Requirement::predicate(MockPredicate::AlwaysFalse))
        .build();
    check!(matches!(built, Requirement::Or(_)));
    check_eq!(built.complexity(), 6);
    check!(built.eval(&CONTEXT)?);
    Ok(())
}

#[test]
fn convenience_any_and_at_least() -> TestResult {
    let any = convenience::any(vec![convenience::predicate(MockPredicate::AlwaysFalse)]);
    check!(!any.eval(&CONTEXT)?);
    let group = convenience::at_least(1, vec![convenience::predicate(MockPredicate::AlwaysTrue)]);
    check!(group.eval(&CONTEXT)?);
    Ok(())
}

// crates/prereq-logic/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared result helpers for requirement integration tests.
// ============================================================================
//! ## Overview
//! Shared test helpers for consistent Result-based assertions.

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
    dead_code,
    unused_macros,
    reason = "Test-only output and panic-based assertions are permitted."
)]

pub mod mocks;

use std::error::Error;
use std::fmt;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across requirement integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl TestError {
    /// Creates a new test error with the provided message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition { Ok(()) } else { Err(Box::new(TestError::new(message))) }
}

/// Checks a condition and returns a test error instead of panicking.
macro_rules! check {
    ($cond:expr $(,)?) => {{
        $crate::support::ensure($cond, concat!("Assertion failed: ", stringify!($cond)))?;
    }};
    ($cond:expr, $($arg:tt)+) => {{
        $crate::support::ensure($cond, format!($($arg)+))?;
    }};
}

/// Checks equality and returns a test error instead of panicking.
macro_rules! check_eq {
    ($left:expr, $right:expr $(,)?) => {{
        let left_val = &$left;
        let right_val = &$right;
        $crate::support::ensure(
            left_val == right_val,
            format!("Expected {left_val:?} == {right_val:?}"),
        )?;
    }};
}

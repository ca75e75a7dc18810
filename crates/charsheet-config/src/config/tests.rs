// crates/charsheet-config/src/config/tests.rs
// ============================================================================
// Module: Config Helper Tests
// Description: Unit tests for private path and marker validation helpers.
// Purpose: Pin boundary behavior of the length limits.
// Dependencies: charsheet-config
// ============================================================================

//! ## Overview
//! Validates the path, marker, and depth boundaries used by config loading.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::EvaluationConfig;
use super::MAX_EVALUATION_DEPTH;
use super::MAX_MARKER_LENGTH;
use super::MAX_PATH_COMPONENT_LENGTH;
use super::MAX_TOTAL_PATH_LENGTH;
use super::validate_marker;
use super::validate_path_string;

// ============================================================================
// SECTION: Path Validation
// ============================================================================

#[test]
fn path_string_accepts_nested_relative_path() {
    assert!(validate_path_string("audit.path", "./logs/audit.jsonl").is_ok());
}

#[test]
fn path_string_rejects_whitespace_only() {
    let err = validate_path_string("audit.path", "   ").unwrap_err();
    assert!(err.to_string().contains("audit.path must be non-empty"));
}

#[test]
fn path_string_length_boundary() {
    let at_max = "a/".repeat(MAX_TOTAL_PATH_LENGTH / 2);
    assert!(validate_path_string("audit.path", &at_max).is_ok());
    let over = format!("{at_max}a");
    assert!(validate_path_string("audit.path", &over).is_err());
}

#[test]
fn path_string_component_boundary() {
    assert!(validate_path_string("audit.path", &"a".repeat(MAX_PATH_COMPONENT_LENGTH)).is_ok());
    let err =
        validate_path_string("audit.path", &"a".repeat(MAX_PATH_COMPONENT_LENGTH + 1)).unwrap_err();
    assert!(err.to_string().contains("path component too long"));
}

// ============================================================================
// SECTION: Marker and Depth Validation
// ============================================================================

#[test]
fn marker_rejects_blank_and_multiline() {
    assert!(validate_marker("m", "[+]").is_ok());
    assert!(validate_marker("m", " ").is_err());
    assert!(validate_marker("m", "a\nb").is_err());
    assert!(validate_marker("m", &"x".repeat(MAX_MARKER_LENGTH + 1)).is_err());
}

#[test]
fn depth_bounds_are_inclusive() {
    let depth = |max_depth| EvaluationConfig {
        max_depth,
    };
    assert!(depth(1).validate().is_ok());
    assert!(depth(MAX_EVALUATION_DEPTH).validate().is_ok());
    assert!(depth(0).validate().is_err());
    assert!(depth(MAX_EVALUATION_DEPTH + 1).validate().is_err());
}

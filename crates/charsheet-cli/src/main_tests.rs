// crates/charsheet-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for bounded reads, input loading, and rendering.
// Purpose: Ensure CLI inputs fail closed and output text stays stable.
// Dependencies: charsheet-cli main helpers, tempfile
// ============================================================================

//! ## Overview
//! Validates `read_bytes_with_limit`, rule and snapshot loading, and the text
//! and JSON renderers used by the `level`, `check`, and `validate` commands.
//!
//! Security posture: CLI inputs are untrusted; size limits must fail closed.

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

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::sync::Mutex;

use charsheet_core::CriteriaRecordLoadedEvent;
use charsheet_core::EvaluationAudit;
use charsheet_core::LevelResult;
use charsheet_core::NoopAudit;
use charsheet_core::PrerequisiteReport;
use prereq_logic::SerdeConfig;
use tempfile::TempDir;

use super::MAX_INPUT_BYTES;
use super::ReadLimitError;
use super::load_context;
use super::load_rule;
use super::read_bytes_with_limit;
use super::read_text;
use super::render_check_text;
use super::render_level_json;
use super::render_level_text;
use super::render_validation;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Audit sink that records the warning count of each load.
#[derive(Default)]
struct LoadCounter {
    /// Warning counts in load order.
    loads: Mutex<Vec<usize>>,
}

impl EvaluationAudit for LoadCounter {
    fn record_load(&self, event: &CriteriaRecordLoadedEvent) {
        self.loads.lock().expect("lock").push(event.warnings);
    }
}

/// Rule whose only prerequisite has an unparseable integer qualifier.
const RULE_JSON: &str = r#"{
    "name": "Lockpicking",
    "base": [{"attribute": {"path": "DX", "offset": -5}}, {"fixed": {"value": 4}}],
    "prerequisites": {"Predicate": {"path": "DX",
        "criteria": {"compareType": "at_least", "qualifier": "high", "kind": "integer"}}}
}"#;

/// Writes a fixture file into `dir`.
fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

// ============================================================================
// SECTION: Bounded Reads
// ============================================================================

#[test]
fn read_bytes_with_limit_allows_small_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(&dir, "small.bin", b"ok");

    let bytes = read_bytes_with_limit(&path, 16).expect("read small file");
    assert_eq!(bytes, b"ok");
}

#[test]
fn read_bytes_with_limit_rejects_large_file() {
    let dir = TempDir::new().expect("temp dir");
    let limit = 8_usize;
    let path = write_file(&dir, "large.bin", &vec![0_u8; limit + 1]);

    let err = read_bytes_with_limit(&path, limit).expect_err("expected size limit failure");
    match err {
        ReadLimitError::TooLarge {
            size,
            limit: reported,
        } => {
            assert_eq!(size, 9);
            assert_eq!(reported, limit);
        }
        ReadLimitError::Io(err) => panic!("unexpected IO error: {err}"),
    }
}

#[test]
fn read_text_rejects_oversized_and_non_utf8_inputs() {
    let dir = TempDir::new().expect("temp dir");
    let big = write_file(&dir, "big.json", &vec![b' '; MAX_INPUT_BYTES + 1]);
    let err = read_text(&big, "context").expect_err("oversized input");
    assert!(err.to_string().contains("exceeds size limit"));

    let binary = write_file(&dir, "binary.json", &[0xFF, 0xFE]);
    let err = read_text(&binary, "context").expect_err("non-utf8 input");
    assert!(err.to_string().ends_with("must be utf-8"));

    let missing = dir.path().join("missing.json");
    let err = read_text(&missing, "rule").expect_err("missing input");
    assert!(err.to_string().starts_with("failed to read rule"));
}

// ============================================================================
// SECTION: Loading
// ============================================================================

#[test]
fn load_rule_reports_warnings_and_audits_the_load() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(&dir, "lockpicking.json", RULE_JSON.as_bytes());
    let audit = LoadCounter::default();

    let loaded = load_rule(&path, SerdeConfig::default(), &audit).expect("rule loads");
    assert_eq!(loaded.value.name, "Lockpicking");
    assert_eq!(loaded.warnings.len(), 1);
    assert_eq!(*audit.loads.lock().expect("lock"), vec![1]);

    let rendered = render_validation(&loaded);
    assert!(rendered.starts_with("Lockpicking: valid with 1 warning(s)\n  invalid integer qualifier"));
}

#[test]
fn load_rule_uses_extension_for_format() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(&dir, "swimming.ron", br#"(name: "Swimming", base: [fixed(value: 10)])"#);
    let loaded = load_rule(&path, SerdeConfig::default(), &NoopAudit).expect("ron rule loads");
    assert_eq!(render_validation(&loaded), "Swimming: valid");

    let json_named = write_file(&dir, "swimming.json", br#"(name: "Swimming")"#);
    let err = load_rule(&json_named, SerdeConfig::default(), &NoopAudit).expect_err("json parser rejects ron");
    assert!(err.to_string().starts_with("invalid rule"));
}

#[test]
fn load_context_rejects_non_objects() {
    let dir = TempDir::new().expect("temp dir");
    let good = write_file(&dir, "hero.json", br#"{"DX": 12, "skills": {"Climbing": 11}}"#);
    assert_eq!(load_context(&good).expect("snapshot loads").len(), 2);

    let bad = write_file(&dir, "list.json", b"[1, 2, 3]");
    let err = load_context(&bad).expect_err("list snapshot");
    assert!(err.to_string().starts_with("invalid context"));
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

#[test]
fn level_text_lists_contributions() {
    let result = LevelResult::attained(8, 0, Some("Perception".to_string()), vec![
        "base: 10".to_string(),
        "-2 encumbrance".to_string(),
        "level 8".to_string(),
    ]);
    assert_eq!(
        render_level_text("Climbing", &result),
        "Climbing: 8 (Perception+0)\n  base: 10\n  -2 encumbrance\n  level 8"
    );

    let blocked = LevelResult::unattainable(vec!["prerequisites not met: ST is at least 12".to_string()]);
    assert_eq!(
        render_level_text("Great Axe", &blocked),
        "Great Axe: unattainable\n  prerequisites not met: ST is at least 12"
    );
}

#[test]
fn level_json_carries_rule_and_label() {
    let result = LevelResult::attained(11, 1, Some("DX".to_string()), vec!["base: 11".to_string()]);
    let text = render_level_json("Broadsword", &result).expect("json renders");
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(value["rule"], "Broadsword");
    assert_eq!(value["relative_label"], "DX+1");
    assert_eq!(value["result"]["level"], 11);
    assert_eq!(value["result"]["attainable"], true);
}

#[test]
fn check_text_reports_status_and_first_failure() {
    let open = render_check_text("Swimming", None);
    assert!(open.satisfied);
    assert_eq!(open.text, "Swimming: satisfied (no prerequisites)");

    let report = PrerequisiteReport {
        satisfied: false,
        explanation: "[-] ST is at least 12".to_string(),
        first_failure: Some("ST is at least 12".to_string()),
        unresolved: Vec::new(),
        leaves: 1,
    };
    let blocked = render_check_text("Great Axe", Some(&report));
    assert!(!blocked.satisfied);
    assert_eq!(blocked.text, "Great Axe: not satisfied\n[-] ST is at least 12\nfirst failure: ST is at least 12");
}

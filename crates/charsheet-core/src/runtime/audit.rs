// crates/charsheet-core/src/runtime/audit.rs
// ============================================================================
// Module: Evaluation Audit Logging
// Description: Structured audit events for prerequisite and level evaluation.
// Purpose: Emit JSON-line records without coupling evaluation to a log backend.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Evaluators report what they did through an [`EvaluationAudit`] sink. Events
//! are plain serializable structs written one JSON object per line. Sinks
//! swallow their own I/O failures: audit output never changes a result.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Returns the current time in milliseconds since the Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

/// Serializes `event` as one JSON line into `writer`, dropping failures.
fn write_line<W: Write, T: Serialize>(writer: &mut W, event: &T) {
    if let Ok(payload) = serde_json::to_string(event) {
        let _ = writeln!(writer, "{payload}");
        let _ = writer.flush();
    }
}

/// Prerequisite evaluation audit payload.
#[derive(Debug, Clone, Serialize)]
pub struct PrerequisitesEvaluatedEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Whether the tree was satisfied.
    pub satisfied: bool,
    /// Number of leaves evaluated.
    pub leaves: usize,
    /// Paths of leaves whose attribute was absent.
    pub unresolved: Vec<String>,
}

impl PrerequisitesEvaluatedEvent {
    /// Creates the event with a consistent timestamp.
    #[must_use]
    pub fn new(satisfied: bool, leaves: usize, unresolved: Vec<String>) -> Self {
        Self {
            event: "prerequisites_evaluated",
            timestamp_ms: now_ms(),
            satisfied,
            leaves,
            unresolved,
        }
    }
}

/// Level calculation audit payload.
#[derive(Debug, Clone, Serialize)]
pub struct LevelCalculatedEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Rule name when known.
    pub rule: Option<String>,
    /// Whether the level could be computed.
    pub attainable: bool,
    /// Final level.
    pub level: i64,
    /// Relative level.
    pub relative_level: i64,
    /// Number of modifiers that applied.
    pub modifiers_applied: usize,
}

/// Inputs required to construct a level audit event.
pub struct LevelCalculatedParams {
    /// Rule name when known.
    pub rule: Option<String>,
    /// Whether the level could be computed.
    pub attainable: bool,
    /// Final level.
    pub level: i64,
    /// Relative level.
    pub relative_level: i64,
    /// Number of modifiers that applied.
    pub modifiers_applied: usize,
}

impl LevelCalculatedEvent {
    /// Creates the event with a consistent timestamp.
    #[must_use]
    pub fn new(params: LevelCalculatedParams) -> Self {
        Self {
            event: "level_calculated",
            timestamp_ms: now_ms(),
            rule: params.rule,
            attainable: params.attainable,
            level: params.level,
            relative_level: params.relative_level,
            modifiers_applied: params.modifiers_applied,
        }
    }
}

/// Record load audit payload.
#[derive(Debug, Clone, Serialize)]
pub struct CriteriaRecordLoadedEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Document label, such as a file path.
    pub source: String,
    /// Number of validity warnings raised.
    pub warnings: usize,
}

impl CriteriaRecordLoadedEvent {
    /// Creates the event with a consistent timestamp.
    #[must_use]
    pub fn new(source: impl Into<String>, warnings: usize) -> Self {
        Self {
            event: "criteria_record_loaded",
            timestamp_ms: now_ms(),
            source: source.into(),
            warnings,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for evaluation events.
pub trait EvaluationAudit: Send + Sync {
    /// Record a prerequisite evaluation.
    fn record_prerequisites(&self, _event: &PrerequisitesEvaluatedEvent) {}

    /// Record a level calculation.
    fn record_level(&self, _event: &LevelCalculatedEvent) {}

    /// Record a document load.
    fn record_load(&self, _event: &CriteriaRecordLoadedEvent) {}
}

/// Audit sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAudit;

impl EvaluationAudit for NoopAudit {}

/// Audit sink that logs JSON lines to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrAudit;

impl StderrAudit {
    /// Writes one event line.
    fn write<T: Serialize>(event: &T) {
        write_line(&mut io::stderr().lock(), event);
    }
}

impl EvaluationAudit for StderrAudit {
    fn record_prerequisites(&self, event: &PrerequisitesEvaluatedEvent) {
        Self::write(event);
    }

    fn record_level(&self, event: &LevelCalculatedEvent) {
        Self::write(event);
    }

    fn record_load(&self, event: &CriteriaRecordLoadedEvent) {
        Self::write(event);
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct JsonlAudit {
    /// File handle used for append-only logging.
    file: Mutex<File>,
}

impl JsonlAudit {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Writes one event line.
    fn write<T: Serialize>(&self, event: &T) {
        if let Ok(mut file) = self.file.lock() {
            write_line(&mut *file, event);
        }
    }
}

impl EvaluationAudit for JsonlAudit {
    fn record_prerequisites(&self, event: &PrerequisitesEvaluatedEvent) {
        self.write(event);
    }

    fn record_level(&self, event: &LevelCalculatedEvent) {
        self.write(event);
    }

    fn record_load(&self, event: &CriteriaRecordLoadedEvent) {
        self.write(event);
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

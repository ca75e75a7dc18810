// crates/charsheet-core/tests/support/mocks.rs
// ============================================================================
// Module: Charsheet Test Fixtures
// Description: Recording audit sink, predicate helpers, and a sample character.
// ============================================================================
//! ## Overview
//! Fixtures shared by the charsheet integration tests. Helpers build leaves
//! from path text so tests read like rule definitions.

use std::sync::Mutex;

use charsheet_core::AttributePath;
use charsheet_core::AttributeSnapshot;
use charsheet_core::CriteriaRecordLoadedEvent;
use charsheet_core::EvaluationAudit;
use charsheet_core::IntegerCriteria;
use charsheet_core::LevelCalculatedEvent;
use charsheet_core::NumericCompareType;
use charsheet_core::PrerequisitePredicate;
use charsheet_core::Prerequisites;
use charsheet_core::PrerequisitesEvaluatedEvent;
use charsheet_core::StringCompareType;
use charsheet_core::StringCriteria;

// ========================================================================
// Recording Audit
// ========================================================================

/// Audit sink that keeps every event name in memory.
#[derive(Debug, Default)]
pub struct RecordingAudit {
    /// Serialized events in arrival order.
    events: Mutex<Vec<String>>,
}

impl RecordingAudit {
    /// Returns the recorded event lines.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Stores one serialized event.
    fn push<T: serde::Serialize>(&self, event: &T) {
        if let (Ok(line), Ok(mut events)) = (serde_json::to_string(event), self.events.lock()) {
            events.push(line);
        }
    }
}

impl EvaluationAudit for RecordingAudit {
    fn record_prerequisites(&self, event: &PrerequisitesEvaluatedEvent) {
        self.push(event);
    }

    fn record_level(&self, event: &LevelCalculatedEvent) {
        self.push(event);
    }

    fn record_load(&self, event: &CriteriaRecordLoadedEvent) {
        self.push(event);
    }
}

// ========================================================================
// Predicate Helpers
// ========================================================================

/// Parses a path, panicking on invalid test input.
pub fn path(text: &str) -> AttributePath {
    AttributePath::parse(text).expect("valid test path")
}

/// Text leaf with the given compare type.
pub fn text(at: &str, compare: StringCompareType, qualifier: &str) -> Prerequisites {
    Prerequisites::predicate(PrerequisitePredicate::new(
        path(at),
        StringCriteria::new(compare, qualifier.to_string()),
    ))
}

/// Integer leaf with the given compare type.
pub fn number(at: &str, compare: NumericCompareType, qualifier: i64) -> Prerequisites {
    Prerequisites::predicate(PrerequisitePredicate::new(
        path(at),
        IntegerCriteria::new(compare, qualifier),
    ))
}

/// Sample character: DX 12, IQ 10, ST 9, spells Fireball and Light.
pub fn wizard() -> AttributeSnapshot {
    AttributeSnapshot::from_json_str(
        r#"{
            "DX": 12,
            "IQ": 10,
            "ST": 9,
            "name": "Morgana",
            "spells": ["Fireball", "Light"],
            "skills": {"Broadsword": 11}
        }"#,
    )
    .expect("valid wizard snapshot")
}

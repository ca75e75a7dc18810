// crates/charsheet-config/src/lib.rs
// ============================================================================
// Module: Charsheet Config Library
// Description: Configuration model and validation for charsheet.toml.
// Purpose: Single source of truth for evaluator limits, explanation style, and audit output.
// Dependencies: charsheet-core, prereq-logic, serde, toml
// ============================================================================

//! ## Overview
//! `charsheet-config` loads `charsheet.toml` with strict size, encoding, and
//! path limits, rejects unknown keys, and converts the result into the core
//! runtime configuration.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;

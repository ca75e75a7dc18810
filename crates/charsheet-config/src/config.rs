// crates/charsheet-config/src/config.rs
// ============================================================================
// Module: Charsheet Configuration
// Description: Configuration loading and validation for charsheet tools.
// Purpose: Provide strict config parsing with hard limits and safe defaults.
// Dependencies: charsheet-core, prereq-logic, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! An explicit path (argument or `CHARSHEET_CONFIG`) must exist; a missing
//! default `charsheet.toml` yields built-in defaults. Unknown keys are errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use charsheet_core::DEFAULT_MAX_DEPTH;
use charsheet_core::EvaluationAudit;
use charsheet_core::EvaluatorConfig;
use charsheet_core::JsonlAudit;
use charsheet_core::NoopAudit;
use charsheet_core::StderrAudit;
use prereq_logic::ExplanationStyle;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "charsheet.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CHARSHEET_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Largest accepted prerequisite depth.
pub(crate) const MAX_EVALUATION_DEPTH: usize = 256;
/// Largest accepted explanation indent.
pub(crate) const MAX_INDENT_WIDTH: usize = 8;
/// Longest accepted marker or note.
pub(crate) const MAX_MARKER_LENGTH: usize = 32;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Charsheet configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CharsheetConfig {
    /// Evaluation limits.
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    /// Explanation text style.
    #[serde(default)]
    pub explanation: ExplanationConfig,
    /// Audit output.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl CharsheetConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        let (path, required) = match &resolved {
            ResolvedPath::Explicit(path) => (path.as_path(), true),
            ResolvedPath::Default(path) => (path.as_path(), false),
        };
        validate_path(path)?;
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.evaluation.validate()?;
        self.explanation.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Builds the evaluator configuration.
    #[must_use]
    pub fn evaluator_config(&self) -> EvaluatorConfig {
        EvaluatorConfig {
            max_depth: self.evaluation.max_depth,
            explanation: self.explanation.style(),
        }
    }
}

/// Evaluation limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluationConfig {
    /// Maximum prerequisite tree depth (root is depth 1).
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

impl EvaluationConfig {
    /// Validates evaluation limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 || self.max_depth > MAX_EVALUATION_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "evaluation.max_depth must be between 1 and {MAX_EVALUATION_DEPTH}"
            )));
        }
        Ok(())
    }
}

/// Default prerequisite depth limit.
const fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

/// Explanation text style.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExplanationConfig {
    /// Spaces per nesting level.
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,
    /// Marker for satisfied nodes.
    #[serde(default = "default_satisfied_marker")]
    pub satisfied_marker: String,
    /// Marker for unsatisfied nodes.
    #[serde(default = "default_unsatisfied_marker")]
    pub unsatisfied_marker: String,
    /// Suffix for leaves whose attribute was absent.
    #[serde(default = "default_unresolved_note")]
    pub unresolved_note: String,
}

impl Default for ExplanationConfig {
    fn default() -> Self {
        Self {
            indent_width: default_indent_width(),
            satisfied_marker: default_satisfied_marker(),
            unsatisfied_marker: default_unsatisfied_marker(),
            unresolved_note: default_unresolved_note(),
        }
    }
}

impl ExplanationConfig {
    /// Validates the explanation style.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.indent_width > MAX_INDENT_WIDTH {
            return Err(ConfigError::Invalid(format!(
                "explanation.indent_width must be at most {MAX_INDENT_WIDTH}"
            )));
        }
        validate_marker("explanation.satisfied_marker", &self.satisfied_marker)?;
        validate_marker("explanation.unsatisfied_marker", &self.unsatisfied_marker)?;
        if self.satisfied_marker == self.unsatisfied_marker {
            return Err(ConfigError::Invalid(
                "explanation markers must differ".to_string(),
            ));
        }
        if self.unresolved_note.len() > MAX_MARKER_LENGTH || self.unresolved_note.contains('\n') {
            return Err(ConfigError::Invalid(format!(
                "explanation.unresolved_note must be one line of at most {MAX_MARKER_LENGTH} bytes"
            )));
        }
        Ok(())
    }

    /// Converts into the rendering style.
    #[must_use]
    pub fn style(&self) -> ExplanationStyle {
        ExplanationStyle {
            indent_width: self.indent_width,
            satisfied_marker: self.satisfied_marker.clone(),
            unsatisfied_marker: self.unsatisfied_marker.clone(),
            unresolved_note: self.unresolved_note.clone(),
        }
    }
}

/// Default indent width.
const fn default_indent_width() -> usize {
    2
}

/// Default satisfied marker.
fn default_satisfied_marker() -> String {
    ExplanationStyle::default().satisfied_marker
}

/// Default unsatisfied marker.
fn default_unsatisfied_marker() -> String {
    ExplanationStyle::default().unsatisfied_marker
}

/// Default unresolved note.
fn default_unresolved_note() -> String {
    ExplanationStyle::default().unresolved_note
}

/// Audit output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Whether audit events are emitted.
    #[serde(default)]
    pub enabled: bool,
    /// JSON-lines file; stderr when unset.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        Ok(())
    }

    /// Opens the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit file cannot be opened.
    pub fn open_sink(&self) -> Result<Box<dyn EvaluationAudit>, ConfigError> {
        if !self.enabled {
            return Ok(Box::new(NoopAudit));
        }
        match &self.path {
            None => Ok(Box::new(StderrAudit)),
            Some(path) => {
                let sink = JsonlAudit::new(Path::new(path.trim()))
                    .map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Box::new(sink))
            }
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Config path with its origin.
enum ResolvedPath {
    /// Path given by argument or environment; must exist.
    Explicit(PathBuf),
    /// Default file name; may be absent.
    Default(PathBuf),
}

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<ResolvedPath, ConfigError> {
    if let Some(path) = path {
        return Ok(ResolvedPath::Explicit(path.to_path_buf()));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(ResolvedPath::Explicit(PathBuf::from(env_path)));
    }
    Ok(ResolvedPath::Default(PathBuf::from(DEFAULT_CONFIG_NAME)))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates an explanation marker.
fn validate_marker(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > MAX_MARKER_LENGTH || value.contains('\n') {
        return Err(ConfigError::Invalid(format!(
            "{field} must be one line of at most {MAX_MARKER_LENGTH} bytes"
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;

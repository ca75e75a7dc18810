// crates/charsheet-cli/src/main.rs
// ============================================================================
// Module: Charsheet CLI Entry Point
// Description: Command dispatcher for level, prerequisite, and rule workflows.
// Purpose: Evaluate rule documents against character snapshots offline.
// Dependencies: clap, charsheet-config, charsheet-core, prereq-logic, serde, thiserror.
// ============================================================================

//! ## Overview
//! The `charsheet` binary loads a character snapshot (JSON) and a level rule
//! (JSON or RON), then prints the computed level, the prerequisite report, or
//! the rule's validity warnings. Inputs are untrusted: reads are capped at
//! [`MAX_INPUT_BYTES`], must be UTF-8, and structural limits come from the
//! loaded configuration.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use charsheet_config::CharsheetConfig;
use charsheet_core::AttributeSnapshot;
use charsheet_core::CriteriaRecordLoadedEvent;
use charsheet_core::EvaluationAudit;
use charsheet_core::LevelCalculator;
use charsheet_core::LevelResult;
use charsheet_core::LevelRule;
use charsheet_core::Loaded;
use charsheet_core::PrerequisiteEvaluator;
use charsheet_core::PrerequisiteReport;
use charsheet_core::RecordFormat;
use charsheet_core::RuleRecord;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use prereq_logic::SerdeConfig;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a snapshot or rule input file.
const MAX_INPUT_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "charsheet", version, disable_help_subcommand = true)]
struct Cli {
    /// Path to `charsheet.toml` (overrides `CHARSHEET_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute a derived level for a character.
    Level(LevelCommand),
    /// Evaluate a rule's prerequisites for a character.
    Check(EvaluateArgs),
    /// Load a rule document and report validity warnings.
    Validate(ValidateCommand),
}

/// Shared snapshot and rule inputs.
#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Character snapshot JSON file.
    #[arg(long, value_name = "PATH")]
    context: PathBuf,
    /// Rule document (`.json` or `.ron`).
    #[arg(long, value_name = "PATH")]
    rule: PathBuf,
}

/// Arguments for `level`.
#[derive(Args, Debug)]
struct LevelCommand {
    /// Snapshot and rule inputs.
    #[command(flatten)]
    inputs: EvaluateArgs,
    /// Emit the result as JSON.
    #[arg(long)]
    json: bool,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
struct ValidateCommand {
    /// Rule document (`.json` or `.ron`).
    #[arg(long, value_name = "PATH")]
    rule: PathBuf,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let config = CharsheetConfig::load(cli.config.as_deref()).map_err(|err| CliError::new(err.to_string()))?;
    let audit = config.audit.open_sink().map_err(|err| CliError::new(err.to_string()))?;
    let session = Session {
        config: &config,
        audit: audit.as_ref(),
    };

    match cli.command {
        Commands::Level(command) => session.command_level(&command),
        Commands::Check(inputs) => session.command_check(&inputs),
        Commands::Validate(command) => session.command_validate(&command),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Loaded configuration and audit sink shared by all commands.
struct Session<'a> {
    /// Validated configuration.
    config: &'a CharsheetConfig,
    /// Audit sink opened from the configuration.
    audit: &'a dyn EvaluationAudit,
}

impl Session<'_> {
    /// Structural limits applied to loaded prerequisite trees.
    const fn limits(&self) -> SerdeConfig {
        SerdeConfig {
            max_depth: self.config.evaluation.max_depth,
            allow_empty_logical: false,
        }
    }

    /// Loads the snapshot and rule named by `inputs`, reporting warnings.
    fn load_inputs(&self, inputs: &EvaluateArgs) -> CliResult<(AttributeSnapshot, LevelRule)> {
        let context = load_context(&inputs.context)?;
        let loaded = load_rule(&inputs.rule, self.limits(), self.audit)?;
        for warning in &loaded.warnings {
            write_stderr_line(&format!("warning: {warning}"))
                .map_err(|err| CliError::new(output_error("stderr", &err)))?;
        }
        Ok((context, loaded.value))
    }

    /// Executes the `level` command.
    fn command_level(&self, command: &LevelCommand) -> CliResult<ExitCode> {
        let (context, rule) = self.load_inputs(&command.inputs)?;
        let evaluator_config = self.config.evaluator_config();
        let calculator = LevelCalculator::new(PrerequisiteEvaluator::with_audit(&evaluator_config, self.audit));
        let result = calculator
            .calculate(&rule, &context)
            .map_err(|err| CliError::new(format!("level calculation failed: {err}")))?;

        let output = if command.json {
            render_level_json(&rule.name, &result)?
        } else {
            render_level_text(&rule.name, &result)
        };
        write_stdout_line(&output).map_err(|err| CliError::new(output_error("stdout", &err)))?;
        Ok(ExitCode::SUCCESS)
    }

    /// Executes the `check` command.
    fn command_check(&self, inputs: &EvaluateArgs) -> CliResult<ExitCode> {
        let (context, rule) = self.load_inputs(inputs)?;
        let output = match &rule.prerequisites {
            Some(prerequisites) => {
                let evaluator_config = self.config.evaluator_config();
                let evaluator = PrerequisiteEvaluator::with_audit(&evaluator_config, self.audit);
                let report = evaluator
                    .evaluate(prerequisites, &context)
                    .map_err(|err| CliError::new(format!("prerequisite evaluation failed: {err}")))?;
                render_check_text(&rule.name, Some(&report))
            }
            None => render_check_text(&rule.name, None),
        };
        write_stdout_line(&output.text).map_err(|err| CliError::new(output_error("stdout", &err)))?;
        Ok(if output.satisfied { ExitCode::SUCCESS } else { ExitCode::FAILURE })
    }

    /// Executes the `validate` command.
    fn command_validate(&self, command: &ValidateCommand) -> CliResult<ExitCode> {
        let loaded = load_rule(&command.rule, self.limits(), self.audit)?;
        write_stdout_line(&render_validation(&loaded)).map_err(|err| CliError::new(output_error("stdout", &err)))?;
        Ok(ExitCode::SUCCESS)
    }
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let read_limit = limit.saturating_add(1);
    let mut limited = file.take(read_limit);
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads a bounded UTF-8 input file.
fn read_text(path: &Path, kind: &str) -> CliResult<String> {
    let bytes = read_bytes_with_limit(path, MAX_INPUT_BYTES).map_err(|err| match err {
        ReadLimitError::Io(err) => CliError::new(format!("failed to read {kind} {}: {err}", path.display())),
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(format!("{kind} {} exceeds size limit ({size} > {limit} bytes)", path.display())),
    })?;
    String::from_utf8(bytes).map_err(|_| CliError::new(format!("{kind} {} must be utf-8", path.display())))
}

/// Loads a character snapshot from a JSON file.
fn load_context(path: &Path) -> CliResult<AttributeSnapshot> {
    let text = read_text(path, "context")?;
    AttributeSnapshot::from_json_str(&text)
        .map_err(|err| CliError::new(format!("invalid context {}: {err}", path.display())))
}

/// Loads a rule document and records the load on the audit sink.
fn load_rule(path: &Path, limits: SerdeConfig, audit: &dyn EvaluationAudit) -> CliResult<Loaded<LevelRule>> {
    let text = read_text(path, "rule")?;
    let format = RecordFormat::from_path(path);
    let loaded = RuleRecord::parse(&text, format)
        .and_then(|record| record.into_rule(limits))
        .map_err(|err| CliError::new(format!("invalid rule {}: {err}", path.display())))?;
    audit.record_load(&CriteriaRecordLoadedEvent::new(path.display().to_string(), loaded.warnings.len()));
    Ok(loaded)
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// JSON body emitted by `level --json`.
#[derive(Serialize)]
struct LevelOutput<'a> {
    /// Rule name.
    rule: &'a str,
    /// Display label such as `DX-4`.
    relative_label: String,
    /// Full calculation result.
    result: &'a LevelResult,
}

/// Renders a level result as indented text.
fn render_level_text(rule: &str, result: &LevelResult) -> String {
    let mut output = if result.is_attainable() {
        format!("{rule}: {} ({})", result.level(), result.relative_label())
    } else {
        format!("{rule}: unattainable")
    };
    for line in result.explanation() {
        output.push_str("\n  ");
        output.push_str(line);
    }
    output
}

/// Renders a level result as pretty JSON.
fn render_level_json(rule: &str, result: &LevelResult) -> CliResult<String> {
    let output = LevelOutput {
        rule,
        relative_label: result.relative_label(),
        result,
    };
    serde_json::to_string_pretty(&output).map_err(|err| CliError::new(format!("failed to encode result: {err}")))
}

/// Rendered prerequisite check.
struct CheckOutput {
    /// Whether the rule's prerequisites hold.
    satisfied: bool,
    /// Text printed to stdout.
    text: String,
}

/// Renders a prerequisite report; `None` means the rule has no prerequisites.
fn render_check_text(rule: &str, report: Option<&PrerequisiteReport>) -> CheckOutput {
    let Some(report) = report else {
        return CheckOutput {
            satisfied: true,
            text: format!("{rule}: satisfied (no prerequisites)"),
        };
    };
    let status = if report.satisfied { "satisfied" } else { "not satisfied" };
    let mut text = format!("{rule}: {status}\n{}", report.explanation);
    if let Some(failure) = &report.first_failure {
        text.push_str("\nfirst failure: ");
        text.push_str(failure);
    }
    CheckOutput {
        satisfied: report.satisfied,
        text,
    }
}

/// Renders the outcome of `validate`.
fn render_validation(loaded: &Loaded<LevelRule>) -> String {
    let name = &loaded.value.name;
    if loaded.is_clean() {
        return format!("{name}: valid");
    }
    let mut output = format!("{name}: valid with {} warning(s)", loaded.warnings.len());
    for warning in &loaded.warnings {
        output.push_str("\n  ");
        output.push_str(&warning.to_string());
    }
    output
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}

//! The envelope error taxonomy (SPEC_FULL.md §6.4): `tracer-cli` composes the
//! other three crates' error types into the `{type, line?, msg}` shapes the
//! runner emits on stdout.

use tracer_analyzer::AnalyzerError;
use tracer_core::TraceError;
use tracer_host::InterpError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("stepscript parse error at line {line}: {msg}")]
    SyntaxError { line: u32, msg: String },
    #[error("rejected: {msg}")]
    Security { msg: String },
    #[error("timed out: {msg}")]
    Timeout { msg: String },
    #[error("runtime error: {msg}")]
    Runtime { msg: String },
    #[error("could not read '{path}': {source}")]
    Io { path: String, #[source] source: std::io::Error },
}

impl From<AnalyzerError> for CliError {
    fn from(e: AnalyzerError) -> Self {
        match e {
            AnalyzerError::Syntax { line, msg } => CliError::SyntaxError { line, msg },
            AnalyzerError::Security { msg } => CliError::Security { msg },
        }
    }
}

impl From<InterpError> for CliError {
    fn from(e: InterpError) -> Self {
        match e {
            InterpError::Trace(TraceError::Timeout { budget_ms }) => CliError::Timeout {
                msg: format!("trace exceeded its {budget_ms}ms wall-clock budget"),
            },
            other => CliError::Runtime { msg: other.to_string() },
        }
    }
}

impl CliError {
    /// `{type, line?, msg}` per spec.md §7 / SPEC_FULL.md §6.4.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CliError::SyntaxError { line, msg } => {
                serde_json::json!({ "type": "syntax_error", "line": line, "msg": msg })
            }
            CliError::Security { msg } => {
                serde_json::json!({ "type": "security", "msg": msg })
            }
            CliError::Timeout { msg } => {
                serde_json::json!({ "type": "timeout", "msg": msg })
            }
            CliError::Runtime { msg } => {
                serde_json::json!({ "type": "runtime", "msg": msg })
            }
            CliError::Io { path, source } => {
                serde_json::json!({ "type": "runtime", "msg": format!("{path}: {source}") })
            }
        }
    }
}

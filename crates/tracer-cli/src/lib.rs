//! The `tracewright` runner: wires `tracer-analyzer`'s static pre-check,
//! `tracer-host`'s interpreter, and `tracer-core`'s event log into the one
//! JSON envelope spec.md §6 describes.

pub mod error;

use std::time::Duration;

use serde_json::json;
use tracer_core::LogEvent;
use tracer_host::Interpreter;

pub use error::CliError;

fn envelope(error: Option<CliError>, log: &[LogEvent], infer: &[tracer_analyzer::Inference]) -> serde_json::Value {
    json!({
        "error": error.as_ref().map(CliError::to_json),
        "log": log.iter().map(LogEvent::to_json).collect::<Vec<_>>(),
        "infer": infer.iter().map(|i| i.to_json()).collect::<Vec<_>>(),
    })
}

/// Run `stepscript` source loaded from disk or typed in: static pre-check
/// first (security + hints), then a real trace. On a security or syntax
/// rejection the interpreter never runs, so `log` is empty; a runtime failure
/// or timeout still reports the log recorded up to that point.
pub fn run_source(src: &str, timeout: Duration) -> serde_json::Value {
    let (analysis_error, infer) = tracer_analyzer::analyze(src);
    if let Some(e) = analysis_error {
        return envelope(Some(e.into()), &[], &infer);
    }

    let program = match tracer_host::parser::parse(src) {
        Ok(p) => p,
        Err(e) => {
            return envelope(
                Some(CliError::SyntaxError { line: e.line, msg: e.msg }),
                &[],
                &infer,
            )
        }
    };

    run_program(&program, timeout, infer)
}

/// Run one of the built-in demo modules (SPEC_FULL.md §6.3's static
/// registry). These are pre-vetted `Program` values, not source text, so
/// there is nothing for the analyzer to parse or check.
pub fn run_module(name: &str, timeout: Duration) -> Result<serde_json::Value, CliError> {
    let program = tracer_host::programs::lookup(name)
        .ok_or_else(|| CliError::Runtime { msg: format!("no such module '{name}'") })?;
    Ok(run_program(&program, timeout, Vec::new()))
}

fn run_program(
    program: &tracer_host::Program,
    timeout: Duration,
    infer: Vec<tracer_analyzer::Inference>,
) -> serde_json::Value {
    let mut interp = Interpreter::new(program, timeout);
    match interp.run() {
        Ok(_) => envelope(None, interp.history().log(), &infer),
        Err(e) => envelope(Some(e.into()), interp.history().log(), &infer),
    }
}

#[cfg(test)]
mod tests;

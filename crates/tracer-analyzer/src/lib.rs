//! The static pre-analyzer collaborator (spec.md §6, SPEC_FULL.md §6.2):
//! parses `stepscript` source, rejects forbidden constructs, and extracts
//! docstring-style hints for the step-through visualizer.

pub mod error;
pub mod inference;
mod security;

pub use error::AnalyzerError;
pub use inference::{ArrayIndexInference, Inference, MemberPointerInference};

/// `(error, inferences)`, mirroring `tracer/infer.py`'s `infer()` return
/// shape (spec.md §6).
pub fn analyze(src: &str) -> (Option<AnalyzerError>, Vec<Inference>) {
    let program = match tracer_host::parser::parse(src) {
        Ok(program) => program,
        Err(e) => {
            return (
                Some(AnalyzerError::Syntax { line: e.line, msg: e.msg }),
                Vec::new(),
            )
        }
    };

    if let Err(security_error) = security::check(&program) {
        return (Some(security_error), Vec::new());
    }

    (None, inference::extract(&program))
}

#[cfg(test)]
mod tests;

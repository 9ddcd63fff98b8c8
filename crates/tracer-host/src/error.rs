//! Interpreter failure modes, surfaced to `tracer-cli` as the `runtime`
//! error taxonomy entry.

use tracer_core::TraceError;

#[derive(Debug, thiserror::Error)]
pub enum InterpError {
    #[error("unbound variable '{0}'")]
    UnboundVariable(String),
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("unknown record type '{0}'")]
    UnknownRecord(String),
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    #[error("index out of range: {0}")]
    IndexOutOfRange(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("no such field '{0}'")]
    NoSuchField(String),
    #[error(transparent)]
    Trace(#[from] TraceError),
}

//! `stepscript`: a minimal tree-walking interpreter that drives `tracer-core`
//! through real callback events, standing in for the "instrumentation
//! source" the core tracer treats as an external collaborator.

pub mod ast;
pub mod error;
pub mod interp;
pub mod parser;
pub mod programs;

pub use ast::{BinOp, Expr, FunctionDef, Program, RecordDef, Stmt, StmtKind, UnOp};
pub use error::InterpError;
pub use interp::Interpreter;

#[cfg(test)]
mod tests;

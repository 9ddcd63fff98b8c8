//! The two failure modes a pre-analysis pass can report (spec.md §6/§7).

#[derive(Debug, Clone, thiserror::Error)]
pub enum AnalyzerError {
    #[error("Line {line}: {msg}")]
    Syntax { line: u32, msg: String },
    #[error("{msg}")]
    Security { msg: String },
}

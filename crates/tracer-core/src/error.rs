//! Error types surfaced by the core tracer.

/// Distinguished signal raised once the wall-clock budget is exceeded.
///
/// Mirrors spec §5/§7: this is not a "real" error, it's a cooperative
/// cancellation signal the host must propagate out of its callback loop. The
/// log recorded so far remains valid and is preserved by the caller.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("trace exceeded its {budget_ms}ms wall-clock budget")]
    Timeout { budget_ms: u64 },
}

//! Per-call frame model and the host callback contract.

use indexmap::IndexMap;

use crate::value::RawValue;

/// What the host must expose about a call frame for every callback.
///
/// Implemented by whatever instrumentation source drives the tracer (an
/// interpreter, a bytecode VM hook, ...). `tracer-core` never depends on any
/// particular host; `tracer-host` is one concrete implementation.
pub trait HostFrame {
    fn function_name(&self) -> &str;
    fn line(&self) -> u32;
    fn locals(&self) -> IndexMap<String, RawValue>;
    fn globals(&self) -> IndexMap<String, RawValue>;
    /// Names of every ancestor frame, nearest parent first, used for
    /// main-scoping (spec §4.F "Main-scoping").
    fn ancestor_function_names(&self) -> Vec<String>;
}

/// A shallow, owned snapshot of one call frame at the instant of an event.
/// Mutating the live host frame afterwards must not affect this copy — the
/// `locals` map is cloned eagerly; aggregate bindings inside it are `Rc`
/// clones (so mutation through them is still observable via the heap, which
/// is the whole point).
#[derive(Debug, Clone)]
pub struct Frame {
    pub function: String,
    pub line: u32,
    pub locals: IndexMap<String, RawValue>,
}

impl Frame {
    pub fn capture(host: &dyn HostFrame) -> Self {
        Self {
            function: host.function_name().to_string(),
            line: host.line(),
            locals: host.locals(),
        }
    }
}

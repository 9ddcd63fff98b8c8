//! The event-driven driver: the behavioral heart of the tracer (spec §4.F).

use std::time::{Duration, Instant};

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::diff::diff;
use crate::error::TraceError;
use crate::frame::{Frame, HostFrame};
use crate::heap::{snapshot, Heap};
use crate::identity::IdentityTable;
use crate::log::LogEvent;
use crate::state::State;
use crate::value::{encode, RawValue};

const MAIN_FUNCTION: &str = "main";
const INIT_FUNCTION: &str = "__init__";
const GLOBAL_SENTINEL_SUFFIX: &str = "_g";

/// `{state, log, startTime, frozen, lastHeapSnapshot}` per spec §3, plus the
/// identity table and configured timeout budget.
pub struct History {
    state: State,
    log: Vec<LogEvent>,
    ids: IdentityTable,
    started_at: Instant,
    budget: Duration,
    frozen: bool,
    last_heap: Heap,
}

impl History {
    pub fn new(budget: Duration) -> Self {
        Self {
            state: State::new(),
            log: Vec::new(),
            ids: IdentityTable::new(),
            started_at: Instant::now(),
            budget,
            frozen: false,
            last_heap: Heap::default(),
        }
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    fn check_timeout(&self) -> Result<(), TraceError> {
        if self.started_at.elapsed() > self.budget {
            return Err(TraceError::Timeout {
                budget_ms: self.budget.as_millis() as u64,
            });
        }
        Ok(())
    }

    /// Spec §4.F "Main-scoping": true if `host` or any of its ancestors is
    /// named `main`.
    fn is_main_scoped(host: &dyn HostFrame) -> bool {
        host.function_name() == MAIN_FUNCTION
            || host
                .ancestor_function_names()
                .iter()
                .any(|name| name == MAIN_FUNCTION)
    }

    fn filter_globals(globals: IndexMap<String, RawValue>) -> IndexMap<String, RawValue> {
        globals
            .into_iter()
            .filter(|(name, _)| name.ends_with(GLOBAL_SENTINEL_SUFFIX))
            .collect()
    }

    /// Recompute the heap from `roots` (plus any event-specific extra roots),
    /// append a non-empty batch, and roll `last_heap` forward.
    fn recompute_heap_and_emit(&mut self, extra_roots: &[RawValue]) {
        let mut roots = self.state.reachable_roots();
        roots.extend_from_slice(extra_roots);
        let current = snapshot(&roots, &mut self.ids);
        let edits = diff(&self.last_heap, &current);
        if !edits.is_empty() {
            trace!(count = edits.len(), "heap batch");
            self.log
                .push(LogEvent::Batch(edits.into_iter().map(LogEvent::from).collect()));
        }
        self.last_heap = current;
    }

    fn encode_locals(&mut self, locals: &IndexMap<String, RawValue>) -> IndexMap<String, crate::value::Value> {
        locals
            .iter()
            .map(|(name, value)| (name.clone(), encode(value, &mut self.ids)))
            .collect()
    }

    /// spec §4.F `onCall`.
    pub fn on_call(&mut self, host: &dyn HostFrame) -> Result<(), TraceError> {
        self.check_timeout()?;
        if self.frozen || !Self::is_main_scoped(host) {
            return Ok(());
        }
        let frame = Frame::capture(host);
        debug!(function = %frame.function, line = frame.line, "pushFrame");
        let encoded_locals = self.encode_locals(&frame.locals);
        self.state.push_frame(frame.clone());
        self.log.push(LogEvent::PushFrame {
            function: frame.function,
            locals: encoded_locals,
            line: frame.line,
        });
        self.recompute_heap_and_emit(&[]);
        Ok(())
    }

    /// spec §4.F `onLine`. Ordering is load-bearing: globals, then locals,
    /// then the heap diff, then the line marker.
    pub fn on_line(&mut self, host: &dyn HostFrame) -> Result<(), TraceError> {
        self.check_timeout()?;
        if self.frozen || self.state.frames.is_empty() || !Self::is_main_scoped(host) {
            return Ok(());
        }

        let globals = Self::filter_globals(host.globals());
        for (name, value) in &globals {
            match self.state.globals.get(name) {
                None => self
                    .log
                    .push(LogEvent::NewGlobal(name.clone(), value.to_raw_json())),
                Some(old) if !old.same_binding(value) => self
                    .log
                    .push(LogEvent::UpdateGlobal(name.clone(), value.to_raw_json())),
                _ => {}
            }
        }

        let new_frame = Frame::capture(host);
        if let Some(top) = self.state.active_frame() {
            let top_locals = top.locals.clone();
            for (name, value) in &new_frame.locals {
                match top_locals.get(name) {
                    None => {
                        let encoded = encode(value, &mut self.ids);
                        self.log.push(LogEvent::NewLocal(name.clone(), encoded));
                    }
                    Some(old) if !old.same_binding(value) => {
                        let encoded = encode(value, &mut self.ids);
                        self.log.push(LogEvent::UpdateLocal(name.clone(), encoded));
                    }
                    _ => {}
                }
            }
        }

        let line = new_frame.line;
        self.state.replace_top(new_frame);
        self.state.set_globals(globals);

        self.recompute_heap_and_emit(&[]);

        self.log.push(LogEvent::Line(line));
        Ok(())
    }

    /// spec §4.F `onReturn`.
    pub fn on_return(&mut self, host: &dyn HostFrame, return_value: RawValue) -> Result<(), TraceError> {
        self.check_timeout()?;
        if self.frozen || !Self::is_main_scoped(host) {
            return Ok(());
        }

        let mut extra_roots = vec![return_value.clone()];
        if let Some(top) = self.state.active_frame() {
            if top.function == INIT_FUNCTION {
                if let Some(this) = top.locals.get("self") {
                    extra_roots.push(this.clone());
                }
            }
        }
        self.recompute_heap_and_emit(&extra_roots);

        self.state.pop_frame();
        let encoded_return = encode(&return_value, &mut self.ids);
        self.log.push(LogEvent::Return(encoded_return));
        self.log.push(LogEvent::PopFrame);
        Ok(())
    }

    /// spec §4.F `onException`: freeze, recording nothing further.
    pub fn on_exception(&mut self, host: &dyn HostFrame) -> Result<(), TraceError> {
        self.check_timeout()?;
        if Self::is_main_scoped(host) {
            debug!("exception: freezing history");
            self.frozen = true;
        }
        Ok(())
    }

    /// Serialize the accumulated log per spec §4.G.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.log.iter().map(LogEvent::to_json).collect())
    }
}

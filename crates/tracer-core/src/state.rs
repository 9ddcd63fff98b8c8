//! Program state: the frame stack, observed globals, and the live heap.

use indexmap::IndexMap;

use crate::frame::Frame;
use crate::heap::Heap;
use crate::identity::ObjectId;
use crate::value::RawValue;

/// `{frames, globals, heap}` per spec §3. Only frames descended from `main`
/// are ever pushed here (the caller enforces main-scoping before calling
/// in).
#[derive(Debug, Default)]
pub struct State {
    pub frames: Vec<Frame>,
    pub globals: IndexMap<String, RawValue>,
    pub heap: Heap,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop_frame(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn replace_top(&mut self, frame: Frame) {
        if let Some(top) = self.frames.last_mut() {
            *top = frame;
        }
    }

    pub fn set_globals(&mut self, globals: IndexMap<String, RawValue>) {
        self.globals = globals;
    }

    pub fn active_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Every frame's local values, oldest frame first, newest last.
    pub fn reachable_roots(&self) -> Vec<RawValue> {
        self.frames
            .iter()
            .flat_map(|f| f.locals.values().cloned())
            .collect()
    }

    /// Every identity referenced by a live frame, global, or heap object —
    /// used by the reachability-closure invariant test.
    pub fn live_object_ids(&self, ids: &mut crate::identity::IdentityTable) -> Vec<ObjectId> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for v in frame.locals.values() {
                out.extend(crate::value::referenced_object(v, ids));
            }
        }
        for v in self.globals.values() {
            out.extend(crate::value::referenced_object(v, ids));
        }
        out
    }
}

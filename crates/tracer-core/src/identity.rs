//! Object identity without a garbage collector.
//!
//! The host runtime does not hand us a native `id()`; instead each
//! heap-allocated aggregate carries an `Rc` and we key identities off that
//! `Rc`'s allocation address. Identities are handed out on first sight and
//! never recycled within one trace, matching the "object identity without
//! GC" design note.

use std::any::Any;
use std::rc::Rc;

use rustc_hash::FxHashMap;

/// A stable integer naming a heap object for the lifetime of a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl ObjectId {
    pub fn as_i64(self) -> i64 {
        self.0 as i64
    }
}

/// Hands out monotonically increasing [`ObjectId`]s keyed by `Rc` pointer
/// address. Never recycles an id within a single table's lifetime: besides
/// remembering every address it has assigned an id to, the table also
/// retains a strong clone of each `Rc` it has seen, so the allocation itself
/// can never be freed and its address handed to an unrelated later object.
#[derive(Default)]
pub struct IdentityTable {
    next: u64,
    seen: FxHashMap<usize, (ObjectId, Rc<dyn Any>)>,
}

impl IdentityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity for the allocation backing `rc`, allocating a fresh one on
    /// first sight and keeping `rc` alive for as long as the table lives.
    pub fn id_for<T: 'static>(&mut self, rc: &Rc<T>) -> ObjectId {
        let addr = Rc::as_ptr(rc) as *const () as usize;
        if let Some((id, _)) = self.seen.get(&addr) {
            return *id;
        }
        let id = ObjectId(self.next);
        self.next += 1;
        self.seen.insert(addr, (id, rc.clone() as Rc<dyn Any>));
        id
    }
}

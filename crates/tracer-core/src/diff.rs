//! Minimal edit-list diffing between two heap snapshots.

use indexmap::IndexMap;

use crate::heap::{Heap, HeapObject};
use crate::identity::ObjectId;
use crate::value::Value;

/// One minimal edit between two heap snapshots, per spec §4.C.
#[derive(Debug, Clone, PartialEq)]
pub enum HeapEdit {
    Delete(ObjectId),
    New(ObjectId, HeapObject),
    RemoveKey(ObjectId, String),
    AddKey(ObjectId, String, Value),
    ModifyKey(ObjectId, String, Value),
    ModifyPos(ObjectId, usize, Value),
    Reset(ObjectId, Vec<Value>),
}

/// Compute the minimal edit-list turning `prev` into `cur`.
///
/// Deletions are emitted before any `New`/modify edit, matching spec §4.C
/// ("tests may rely on this ordering"). Among new/modified objects, ids are
/// visited in ascending order, which is deterministic and — since ids are
/// allocated in first-sight DFS order during snapshotting — also matches the
/// order a fresh walk would discover them in.
pub fn diff(prev: &Heap, cur: &Heap) -> Vec<HeapEdit> {
    let mut edits = Vec::new();

    let mut deleted: Vec<ObjectId> = prev.keys().filter(|id| !cur.contains_key(id)).copied().collect();
    deleted.sort();
    edits.extend(deleted.into_iter().map(HeapEdit::Delete));

    let mut cur_ids: Vec<ObjectId> = cur.keys().copied().collect();
    cur_ids.sort();

    for id in cur_ids {
        let current = &cur[&id];
        match prev.get(&id) {
            None => edits.push(HeapEdit::New(id, current.clone())),
            Some(previous) => edits.extend(object_diff(id, previous, current)),
        }
    }

    edits
}

fn object_diff(id: ObjectId, prev: &HeapObject, cur: &HeapObject) -> Vec<HeapEdit> {
    match (prev, cur) {
        (HeapObject::List(p), HeapObject::List(c)) => list_diff(id, p, c),
        (HeapObject::Map(p), HeapObject::Map(c)) => map_diff(id, p, c),
        (
            HeapObject::Record { members: p, .. },
            HeapObject::Record { members: c, .. },
        ) => map_diff(id, p, c),
        // An identity never changes aggregate kind across a trace; if this
        // ever fires it's a host bug, not something we can express as an edit.
        _ => Vec::new(),
    }
}

fn list_diff(id: ObjectId, prev: &[Value], cur: &[Value]) -> Vec<HeapEdit> {
    if prev.len() == cur.len() {
        return prev
            .iter()
            .zip(cur.iter())
            .enumerate()
            .filter(|(_, (p, c))| p != c)
            .map(|(i, (_, c))| HeapEdit::ModifyPos(id, i, c.clone()))
            .collect();
    }
    if cur.len() == prev.len() + 1 && cur[..prev.len()] == *prev {
        let last = cur.len() - 1;
        return vec![HeapEdit::ModifyPos(id, last, cur[last].clone())];
    }
    vec![HeapEdit::Reset(id, cur.to_vec())]
}

fn map_diff(id: ObjectId, prev: &IndexMap<String, Value>, cur: &IndexMap<String, Value>) -> Vec<HeapEdit> {
    let mut edits = Vec::new();
    for key in prev.keys() {
        if !cur.contains_key(key) {
            edits.push(HeapEdit::RemoveKey(id, key.clone()));
        }
    }
    for (key, value) in cur {
        match prev.get(key) {
            None => edits.push(HeapEdit::AddKey(id, key.clone(), value.clone())),
            Some(old) if old != value => {
                edits.push(HeapEdit::ModifyKey(id, key.clone(), value.clone()))
            }
            Some(_) => {}
        }
    }
    edits
}

/// Reconstruct `cur` by applying `edits` to `prev`. Used to check the
/// diff-minimality invariant: `apply(prev, diff(prev, cur)) == cur`.
pub fn apply(prev: &Heap, edits: &[HeapEdit]) -> Heap {
    let mut heap = prev.clone();
    for edit in edits {
        match edit {
            HeapEdit::Delete(id) => {
                heap.remove(id);
            }
            HeapEdit::New(id, obj) => {
                heap.insert(*id, obj.clone());
            }
            HeapEdit::RemoveKey(id, key) => {
                if let Some(HeapObject::Map(m) | HeapObject::Record { members: m, .. }) =
                    heap.get_mut(id)
                {
                    m.shift_remove(key);
                }
            }
            HeapEdit::AddKey(id, key, value) | HeapEdit::ModifyKey(id, key, value) => {
                if let Some(HeapObject::Map(m) | HeapObject::Record { members: m, .. }) =
                    heap.get_mut(id)
                {
                    m.insert(key.clone(), value.clone());
                }
            }
            HeapEdit::ModifyPos(id, index, value) => {
                if let Some(HeapObject::List(l)) = heap.get_mut(id) {
                    if *index < l.len() {
                        l[*index] = value.clone();
                    }
                }
            }
            HeapEdit::Reset(id, values) => {
                if let Some(HeapObject::List(l)) = heap.get_mut(id) {
                    *l = values.clone();
                }
            }
        }
    }
    heap
}

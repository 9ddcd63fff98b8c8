//! The virtual heap: identity-keyed snapshots of reachable aggregates.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::identity::{IdentityTable, ObjectId};
use crate::value::{encode, RawValue, Value};

/// A tracked aggregate, already encoded at snapshot time.
#[derive(Debug, Clone, PartialEq)]
pub enum HeapObject {
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    Record {
        type_name: String,
        members: IndexMap<String, Value>,
    },
}

pub type Heap = FxHashMap<ObjectId, HeapObject>;

/// Walk `roots` transitively and return the identity-keyed snapshot of every
/// reachable list/map/record. Primitives, `null`, and tuples are walked
/// through but never themselves recorded — tuples recurse into their
/// elements (the corrected reading of spec §9(c): every element is visited).
pub fn snapshot(roots: &[RawValue], ids: &mut IdentityTable) -> Heap {
    let mut heap = Heap::default();
    for root in roots {
        walk(root, ids, &mut heap);
    }
    heap
}

fn walk(raw: &RawValue, ids: &mut IdentityTable, heap: &mut Heap) {
    match raw {
        RawValue::Null | RawValue::Int(_) | RawValue::Float(_) | RawValue::Str(_) | RawValue::Bool(_) => {}
        RawValue::Tuple(items) => {
            for item in items {
                walk(item, ids, heap);
            }
        }
        RawValue::List(rc) => {
            let id = ids.id_for(rc);
            if heap.contains_key(&id) {
                return;
            }
            let children = rc.borrow().clone();
            let encoded = children.iter().map(|c| encode(c, ids)).collect();
            heap.insert(id, HeapObject::List(encoded));
            for child in &children {
                walk(child, ids, heap);
            }
        }
        RawValue::Map(rc) => {
            let id = ids.id_for(rc);
            if heap.contains_key(&id) {
                return;
            }
            let entries = rc.borrow().clone();
            let encoded: IndexMap<String, Value> = entries
                .iter()
                .map(|(k, v)| (k.clone(), encode(v, ids)))
                .collect();
            heap.insert(id, HeapObject::Map(encoded));
            for value in entries.values() {
                walk(value, ids, heap);
            }
        }
        RawValue::Record(rc) => {
            let id = ids.id_for(rc);
            if heap.contains_key(&id) {
                return;
            }
            let record = rc.borrow().clone();
            let encoded: IndexMap<String, Value> = record
                .members
                .iter()
                .map(|(k, v)| (k.clone(), encode(v, ids)))
                .collect();
            heap.insert(
                id,
                HeapObject::Record {
                    type_name: record.type_name.clone(),
                    members: encoded,
                },
            );
            for value in record.members.values() {
                walk(value, ids, heap);
            }
        }
    }
}

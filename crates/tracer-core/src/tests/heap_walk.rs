use indexmap::IndexMap;

use crate::frame::Frame;
use crate::heap::{snapshot, HeapObject};
use crate::identity::IdentityTable;
use crate::state::State;
use crate::value::{encode, RawValue};

#[test]
fn list_of_primitives_tracks_one_object() {
    let mut ids = IdentityTable::new();
    let list = RawValue::list(vec![RawValue::Int(1), RawValue::Int(2), RawValue::Int(3)]);
    let heap = snapshot(&[list.clone()], &mut ids);
    assert_eq!(heap.len(), 1);
    let id = crate::value::referenced_object(&list, &mut ids).unwrap();
    match &heap[&id] {
        HeapObject::List(items) => assert_eq!(items.len(), 3),
        other => panic!("expected list, got {other:?}"),
    }
}

#[test]
fn tuple_is_never_tracked_but_its_children_are() {
    let mut ids = IdentityTable::new();
    let inner = RawValue::list(vec![RawValue::Int(9)]);
    let tuple = RawValue::Tuple(vec![RawValue::Int(1), inner.clone()]);
    let heap = snapshot(&[tuple], &mut ids);
    // Only the inner list is tracked; the tuple itself never gets an id.
    assert_eq!(heap.len(), 1);
    let inner_id = crate::value::referenced_object(&inner, &mut ids).unwrap();
    assert!(heap.contains_key(&inner_id));
}

#[test]
fn cyclic_list_terminates_and_keeps_a_self_reference() {
    let mut ids = IdentityTable::new();
    let node = RawValue::list(vec![RawValue::Int(0)]);
    if let RawValue::List(rc) = &node {
        rc.borrow_mut().push(node.clone());
    }
    let heap = snapshot(&[node.clone()], &mut ids);
    assert_eq!(heap.len(), 1, "cycle must not blow up into repeated entries");
    let id = crate::value::referenced_object(&node, &mut ids).unwrap();
    match &heap[&id] {
        HeapObject::List(items) => {
            assert_eq!(items.len(), 2);
            assert_eq!(items[0], encode(&RawValue::Int(0), &mut ids));
            assert_eq!(items[1], crate::value::encode(&node, &mut ids));
        }
        other => panic!("expected list, got {other:?}"),
    }
}

#[test]
fn record_members_preserve_insertion_order() {
    let mut ids = IdentityTable::new();
    let mut members = IndexMap::new();
    members.insert("left".to_string(), RawValue::Null);
    members.insert("right".to_string(), RawValue::Null);
    members.insert("data".to_string(), RawValue::Int(5));
    let record = RawValue::record("TreeNode", members);
    let heap = snapshot(&[record.clone()], &mut ids);
    let id = crate::value::referenced_object(&record, &mut ids).unwrap();
    match &heap[&id] {
        HeapObject::Record { type_name, members } => {
            assert_eq!(type_name, "TreeNode");
            let keys: Vec<&str> = members.keys().map(String::as_str).collect();
            assert_eq!(keys, vec!["left", "right", "data"]);
        }
        other => panic!("expected record, got {other:?}"),
    }
}

#[test]
fn two_roots_sharing_one_object_track_it_once() {
    let mut ids = IdentityTable::new();
    let shared = RawValue::list(vec![RawValue::Int(1)]);
    let heap = snapshot(&[shared.clone(), shared.clone()], &mut ids);
    assert_eq!(heap.len(), 1);
}

/// Property #1 (reachability closure): every identity reachable from a live
/// frame or a global must already be a key in the heap snapshot taken over
/// those same roots.
#[test]
fn live_object_ids_are_all_present_in_the_matching_heap_snapshot() {
    let mut ids = IdentityTable::new();
    let mut state = State::new();

    let nested = RawValue::list(vec![RawValue::Int(1)]);
    let mut members = IndexMap::new();
    members.insert("left".to_string(), nested.clone());
    members.insert("data".to_string(), RawValue::Int(5));
    let record = RawValue::record("TreeNode", members);

    let mut locals = IndexMap::new();
    locals.insert("node".to_string(), record);
    state.push_frame(Frame {
        function: "main".to_string(),
        line: 1,
        locals,
    });

    let global_list = RawValue::list(vec![RawValue::Int(2), RawValue::Int(3)]);
    let mut globals = IndexMap::new();
    globals.insert("totals_g".to_string(), global_list);
    state.set_globals(globals);

    let roots: Vec<RawValue> = state
        .reachable_roots()
        .into_iter()
        .chain(state.globals.values().cloned())
        .collect();
    let heap = snapshot(&roots, &mut ids);

    let live = state.live_object_ids(&mut ids);
    assert!(!live.is_empty());
    for id in live {
        assert!(heap.contains_key(&id), "live id {id:?} is missing from the heap snapshot");
    }
}

use std::time::Duration;

use tracer_core::{HeapObject, LogEvent, Value};

use crate::error::InterpError;
use crate::interp::Interpreter;
use crate::programs;

fn flatten(log: &[LogEvent]) -> Vec<&LogEvent> {
    let mut out = Vec::new();
    for event in log {
        if let LogEvent::Batch(inner) = event {
            out.extend(flatten(inner));
        } else {
            out.push(event);
        }
    }
    out
}

fn run(name: &str) -> Interpreter<'static> {
    // Demo programs are 'static since they're freshly built each call and
    // the interpreter only needs to live as long as the caller's scope; we
    // leak the small AST deliberately so tests can own `Interpreter<'static>`
    // without fighting lifetimes over an owned `Program`.
    let program: &'static crate::ast::Program = Box::leak(Box::new(programs::lookup(name).unwrap()));
    let mut interp = Interpreter::new(program, Duration::from_millis(2000));
    let _ = interp.run();
    interp
}

#[test]
fn fibonacci_never_touches_the_heap() {
    let interp = run("fibonacci");
    let log = interp.history().log();
    assert!(
        !flatten(log).iter().any(|e| matches!(e, LogEvent::New(_, _))),
        "a scalar-only trace must never allocate a heap object"
    );
    assert!(flatten(log).iter().any(|e| matches!(e, LogEvent::NewGlobal(name, _) if name == "result_g")));
}

#[test]
fn mergesort_sorts_the_root_list_in_place() {
    let interp = run("mergesort");
    let log = interp.history().log();
    let flat = flatten(log);

    // The first list ever created is `xs`, the root object the whole sort
    // runs against; it must be length 9 and hold the unsorted input.
    let (root_id, root_values) = flat
        .iter()
        .find_map(|e| match e {
            LogEvent::New(id, HeapObject::List(values)) => Some((*id, values.clone())),
            _ => None,
        })
        .expect("at least one list is created");
    assert_eq!(root_values.len(), 9);

    // The root list is never deleted, and every write back into it lands as
    // a `modifyPos` on that same id, never a `reset` (it never changes
    // length) and never a second `new` for the same identity.
    assert!(!flat.iter().any(|e| matches!(e, LogEvent::Delete(id) if *id == root_id)));
    assert!(!flat.iter().any(|e| matches!(e, LogEvent::Reset(id, _) if *id == root_id)));
    let root_writes: Vec<_> = flat
        .iter()
        .filter_map(|e| match e {
            LogEvent::ModifyPos(id, index, value) if *id == root_id => Some((*index, value.clone())),
            _ => None,
        })
        .collect();
    assert!(!root_writes.is_empty(), "mergesort must write back into the root list in place");

    // `left`/`right` scratch lists are separate, shorter-lived objects.
    assert!(flat.iter().any(|e| matches!(e, LogEvent::New(id, HeapObject::List(values)) if *id != root_id && values.len() < 9)));

    // Replay every recorded write against the initial snapshot and check it
    // lands on the fully sorted list.
    let mut sorted = root_values;
    for (index, value) in root_writes {
        sorted[index] = value;
    }
    let expected: Vec<Value> = (1..=9i64).map(|n| Value::Prim(tracer_core::Primitive::Int(n))).collect();
    assert_eq!(sorted, expected);
}

#[test]
fn tree_traverses_in_order_into_an_output_list() {
    let interp = run("tree");
    let log = interp.history().log();
    let flat = flatten(log);

    let tree_node_count = flat
        .iter()
        .filter(|e| matches!(e, LogEvent::New(_, HeapObject::Record { type_name, .. }) if type_name == "TreeNode"))
        .count();
    assert_eq!(tree_node_count, 4);

    let out_id = flat
        .iter()
        .find_map(|e| match e {
            LogEvent::New(id, HeapObject::List(values)) if values.is_empty() => Some(*id),
            _ => None,
        })
        .expect("out_list starts out empty");

    let appends: Vec<_> = flat
        .iter()
        .filter_map(|e| match e {
            LogEvent::ModifyPos(id, index, value) if *id == out_id => Some((*index, value.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(appends.len(), 4);

    let mut out = vec![Value::NULL; appends.len()];
    for (index, value) in appends {
        out[index] = value;
    }
    let expected: Vec<Value> = vec![1, 2, 3, 4]
        .into_iter()
        .map(|n| Value::Prim(tracer_core::Primitive::Int(n)))
        .collect();
    assert_eq!(out, expected);
}

#[test]
fn dict_mutation_goes_through_the_full_lifecycle() {
    let interp = run("dict-mutation");
    let log = interp.history().log();
    let flat = flatten(log);
    assert!(flat.iter().any(|e| matches!(e, LogEvent::New(_, HeapObject::Map(_)))));
    assert!(flat.iter().any(|e| matches!(e, LogEvent::AddKey(..))));
    assert!(flat.iter().any(|e| matches!(e, LogEvent::ModifyKey(..))));
    assert!(flat.iter().any(|e| matches!(e, LogEvent::RemoveKey(..))));
}

#[test]
fn append_then_multi_element_growth_is_modify_then_reset() {
    let interp = run("append-reset");
    let log = interp.history().log();
    let flat = flatten(log);
    assert!(flat.iter().any(|e| matches!(e, LogEvent::ModifyPos(..))));
    assert!(flat.iter().any(|e| matches!(e, LogEvent::Reset(..))));
}

#[test]
fn infinite_loop_eventually_times_out() {
    let program: &'static crate::ast::Program = Box::leak(Box::new(programs::lookup("infinite-loop").unwrap()));
    let mut interp = Interpreter::new(program, Duration::from_millis(5));
    let result = interp.run();
    assert!(matches!(result, Err(InterpError::Trace(tracer_core::TraceError::Timeout { .. }))));
    // The log recorded up to the timeout must survive.
    assert!(!interp.history().log().is_empty());
}

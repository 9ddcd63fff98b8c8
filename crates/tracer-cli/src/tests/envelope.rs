use std::time::Duration;

use crate::{run_module, run_source};

fn ops(doc: &serde_json::Value) -> Vec<&str> {
    doc["log"]
        .as_array()
        .expect("log is an array")
        .iter()
        .map(|e| e["op"].as_str().expect("op is a string"))
        .collect()
}

/// Recurse into `batch` entries so nested heap edits are visible too.
fn flatten_ops<'a>(events: &'a [serde_json::Value], out: &mut Vec<&'a serde_json::Value>) {
    for event in events {
        if event["op"] == "batch" {
            flatten_ops(event["info"].as_array().expect("batch info is an array"), out);
        } else {
            out.push(event);
        }
    }
}

#[test]
fn fibonacci_module_traces_cleanly_with_no_heap_batches() {
    let doc = run_module("fibonacci", Duration::from_secs(2)).expect("known module");
    assert!(doc["error"].is_null());
    assert!(!ops(&doc).is_empty());
    assert!(!ops(&doc).contains(&"batch"));
}

#[test]
fn tree_module_builds_record_aggregates_and_appends_in_order() {
    let doc = run_module("tree", Duration::from_secs(2)).expect("known module");
    assert!(doc["error"].is_null());
    assert!(ops(&doc).contains(&"batch"));
    assert_eq!(doc["infer"].as_array().unwrap().len(), 0);

    let mut flat = Vec::new();
    flatten_ops(doc["log"].as_array().unwrap(), &mut flat);

    let record_news = flat.iter().filter(|e| e["op"] == "new" && e["info"][1]["type"] == "TreeNode").count();
    assert_eq!(record_news, 4);

    let appends: Vec<_> = flat.iter().filter(|e| e["op"] == "modifyPos").collect();
    assert_eq!(appends.len(), 4);
    let out_id = appends[0]["info"][0].clone();
    assert!(appends.iter().all(|e| e["info"][0] == out_id));

    let mut out = vec![serde_json::Value::Null; appends.len()];
    for e in &appends {
        let index = e["info"][1].as_u64().unwrap() as usize;
        out[index] = e["info"][2].clone();
    }
    assert_eq!(out, vec![serde_json::json!([false, 1]), serde_json::json!([false, 2]), serde_json::json!([false, 3]), serde_json::json!([false, 4])]);
}

#[test]
fn infinite_loop_module_reports_a_timeout_and_keeps_the_partial_log() {
    let doc = run_module("infinite-loop", Duration::from_millis(20)).expect("known module");
    assert_eq!(doc["error"]["type"], "timeout");
    assert!(!ops(&doc).is_empty());
}

#[test]
fn unknown_module_name_is_a_runtime_error() {
    let err = run_module("does-not-exist", Duration::from_secs(1)).unwrap_err();
    assert!(matches!(err, crate::CliError::Runtime { .. }));
}

#[test]
fn security_rejection_from_source_never_runs_and_reports_no_log() {
    let src = r#"
fn main() {
    let data = open("secrets.txt");
}
"#;
    let doc = run_source(src, Duration::from_secs(2));
    assert_eq!(doc["error"]["type"], "security");
    assert_eq!(doc["log"].as_array().unwrap().len(), 0);
}

#[test]
fn syntax_error_from_source_carries_a_line_number() {
    let doc = run_source("fn broken( {", Duration::from_secs(2));
    assert_eq!(doc["error"]["type"], "syntax_error");
    assert!(doc["error"]["line"].as_u64().is_some());
}

const SUM_LIST_SRC: &str = r#"
global result_g = 0;

fn sum_list(xs) doc "index: xs[i]" {
    let total = 0;
    let i = 0;
    while i < len(xs) {
        total = total + xs[i];
        i = i + 1;
    }
    return total;
}

fn main() {
    let xs = [1, 2, 3];
    result_g = sum_list(xs);
}
"#;

fn new_global(doc: &serde_json::Value, name: &str) -> Option<serde_json::Value> {
    doc["log"].as_array().unwrap().iter().find_map(|e| {
        let is_new_or_update = e["op"] == "newGlobal" || e["op"] == "updateGlobal";
        if is_new_or_update && e["info"][0] == name {
            Some(e["info"][1].clone())
        } else {
            None
        }
    })
}

#[test]
fn a_parsed_file_runs_through_analyzer_interpreter_and_core_together() {
    let doc = run_source(SUM_LIST_SRC, Duration::from_secs(2));
    assert!(doc["error"].is_null());

    let infer = doc["infer"].as_array().unwrap();
    assert_eq!(infer.len(), 1);
    assert_eq!(infer[0]["type"], "arrayIndex");
    assert_eq!(infer[0]["data"]["array"], "xs");

    assert_eq!(new_global(&doc, "result_g"), Some(serde_json::json!(6)));
}

//! Docstring-style hint extraction, preserving the exact `type: value` and
//! token-splitting rules of the original `tracer/infer.py` (ported to the
//! `regex` crate since `tracer-analyzer` walks its own AST rather than
//! Python's).

use regex::Regex;
use tracer_host::{FunctionDef, Program, RecordDef};

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayIndexInference {
    pub func_name: String,
    pub array: String,
    pub var: String,
    pub index: usize,
}

impl ArrayIndexInference {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "arrayIndex",
            "data": {
                "funcName": self.func_name,
                "array": self.array,
                "var": self.var,
                "index": self.index,
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberPointerInference {
    pub class_name: String,
    pub member: String,
}

impl MemberPointerInference {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "memberPointer",
            "data": { "className": self.class_name, "member": self.member }
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inference {
    ArrayIndex(ArrayIndexInference),
    MemberPointer(MemberPointerInference),
}

impl Inference {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Inference::ArrayIndex(i) => i.to_json(),
            Inference::MemberPointer(i) => i.to_json(),
        }
    }
}

fn array_root(pattern: &Regex, value: &str) -> Option<String> {
    pattern.captures(value).map(|c| c[1].to_string())
}

fn parse_array_index_line(func_name: &str, raw: &str) -> Vec<ArrayIndexInference> {
    let Some((kind, value)) = raw.split_once(':') else {
        return Vec::new();
    };
    let (kind, value) = (kind.trim(), value.trim());
    if kind != "index" {
        return Vec::new();
    }
    let root_pattern = Regex::new(r"(\w+)(?:\[\w+\])+").expect("static pattern");
    let Some(array) = array_root(&root_pattern, value) else {
        return Vec::new();
    };
    let bracket_pattern = Regex::new(r"\[(\w+)\]").expect("static pattern");
    bracket_pattern
        .captures_iter(value)
        .enumerate()
        .map(|(index, cap)| ArrayIndexInference {
            func_name: func_name.to_string(),
            array: array.clone(),
            var: cap[1].to_string(),
            index,
        })
        .collect()
}

fn parse_member_pointer_line(class_name: &str, raw: &str) -> Vec<MemberPointerInference> {
    let Some((kind, value)) = raw.split_once(':') else {
        return Vec::new();
    };
    let (kind, value) = (kind.trim(), value.trim());
    if kind != "pointers" {
        return Vec::new();
    }
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|member| MemberPointerInference {
            class_name: class_name.to_string(),
            member: member.to_string(),
        })
        .collect()
}

fn function_inferences(func: &FunctionDef) -> Vec<Inference> {
    let Some(doc) = &func.doc else {
        return Vec::new();
    };
    doc.lines()
        .flat_map(|line| parse_array_index_line(&func.name, line))
        .map(Inference::ArrayIndex)
        .collect()
}

fn record_inferences(record: &RecordDef) -> Vec<Inference> {
    let Some(doc) = &record.doc else {
        return Vec::new();
    };
    doc.lines()
        .flat_map(|line| parse_member_pointer_line(&record.name, line))
        .map(Inference::MemberPointer)
        .collect()
}

pub fn extract(program: &Program) -> Vec<Inference> {
    let mut out = Vec::new();
    for func in &program.functions {
        out.extend(function_inferences(func));
    }
    for record in &program.records {
        out.extend(record_inferences(record));
    }
    out
}

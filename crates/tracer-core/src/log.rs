//! Canonical JSON log shapes (spec §4.G).

use indexmap::IndexMap;
use serde_json::json;

use crate::diff::HeapEdit;
use crate::heap::HeapObject;
use crate::identity::ObjectId;
use crate::value::Value;

/// One entry in the trace log. Variant names mirror spec §4.G's `op` column;
/// [`LogEvent::to_json`] produces the exact `{op, info}` shape for each.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEvent {
    Line(u32),
    NewLocal(String, Value),
    UpdateLocal(String, Value),
    /// Globals are logged with the *raw* host value, not the `[isRef,val]`
    /// encoding locals get — see SPEC_FULL.md §4.G and the original
    /// implementation's `ProgramHistory.update`, which logs `varVal` itself
    /// rather than `Variable.fromReal(varVal)` for globals.
    NewGlobal(String, serde_json::Value),
    UpdateGlobal(String, serde_json::Value),
    PushFrame {
        function: String,
        locals: IndexMap<String, Value>,
        line: u32,
    },
    PopFrame,
    Return(Value),
    New(ObjectId, HeapObject),
    Delete(ObjectId),
    AddKey(ObjectId, String, Value),
    ModifyKey(ObjectId, String, Value),
    RemoveKey(ObjectId, String),
    ModifyPos(ObjectId, usize, Value),
    Reset(ObjectId, Vec<Value>),
    /// Skipped entirely (never appended) if the inner list is empty.
    Batch(Vec<LogEvent>),
}

impl From<HeapEdit> for LogEvent {
    fn from(edit: HeapEdit) -> Self {
        match edit {
            HeapEdit::Delete(id) => LogEvent::Delete(id),
            HeapEdit::New(id, obj) => LogEvent::New(id, obj),
            HeapEdit::RemoveKey(id, key) => LogEvent::RemoveKey(id, key),
            HeapEdit::AddKey(id, key, value) => LogEvent::AddKey(id, key, value),
            HeapEdit::ModifyKey(id, key, value) => LogEvent::ModifyKey(id, key, value),
            HeapEdit::ModifyPos(id, index, value) => LogEvent::ModifyPos(id, index, value),
            HeapEdit::Reset(id, values) => LogEvent::Reset(id, values),
        }
    }
}

fn heap_object_json(obj: &HeapObject) -> serde_json::Value {
    match obj {
        HeapObject::List(values) => {
            serde_json::Value::Array(values.iter().map(Value::to_json).collect())
        }
        HeapObject::Map(members) => {
            let members_json: serde_json::Map<String, serde_json::Value> =
                members.iter().map(|(k, v)| (k.clone(), v.to_json())).collect();
            json!({ "type": "dict", "members": members_json })
        }
        HeapObject::Record { type_name, members } => {
            let members_json: serde_json::Map<String, serde_json::Value> =
                members.iter().map(|(k, v)| (k.clone(), v.to_json())).collect();
            json!({ "type": type_name, "members": members_json })
        }
    }
}

impl LogEvent {
    pub fn to_json(&self) -> serde_json::Value {
        let (op, info): (&str, serde_json::Value) = match self {
            LogEvent::Line(n) => ("line", json!(n)),
            LogEvent::NewLocal(name, v) => ("newLocal", json!([name, v.to_json()])),
            LogEvent::UpdateLocal(name, v) => ("updateLocal", json!([name, v.to_json()])),
            LogEvent::NewGlobal(name, raw) => ("newGlobal", json!([name, raw])),
            LogEvent::UpdateGlobal(name, raw) => ("updateGlobal", json!([name, raw])),
            LogEvent::PushFrame { function, locals, line } => {
                let locals_json: serde_json::Map<String, serde_json::Value> =
                    locals.iter().map(|(k, v)| (k.clone(), v.to_json())).collect();
                (
                    "pushFrame",
                    json!({ "function": function, "locals": locals_json, "line": line }),
                )
            }
            LogEvent::PopFrame => ("popFrame", serde_json::Value::Null),
            LogEvent::Return(v) => ("return", v.to_json()),
            LogEvent::New(id, obj) => ("new", json!([id.as_i64(), heap_object_json(obj)])),
            LogEvent::Delete(id) => ("delete", json!(id.as_i64())),
            LogEvent::AddKey(id, key, v) => ("addKey", json!([id.as_i64(), key, v.to_json()])),
            LogEvent::ModifyKey(id, key, v) => ("modifyKey", json!([id.as_i64(), key, v.to_json()])),
            LogEvent::RemoveKey(id, key) => ("removeKey", json!([id.as_i64(), key])),
            LogEvent::ModifyPos(id, index, v) => {
                ("modifyPos", json!([id.as_i64(), index, v.to_json()]))
            }
            LogEvent::Reset(id, values) => {
                let values_json: Vec<serde_json::Value> = values.iter().map(Value::to_json).collect();
                ("reset", json!([id.as_i64(), values_json]))
            }
            LogEvent::Batch(events) => {
                let events_json: Vec<serde_json::Value> = events.iter().map(LogEvent::to_json).collect();
                ("batch", serde_json::Value::Array(events_json))
            }
        };
        json!({ "op": op, "info": info })
    }
}

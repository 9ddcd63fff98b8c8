//! Raw host values and their compact two-field encoding.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::identity::{IdentityTable, ObjectId};

/// A list aggregate, shared by every binding that aliases it.
pub type ListHandle = Rc<RefCell<Vec<RawValue>>>;
/// A string-keyed map aggregate.
pub type MapHandle = Rc<RefCell<IndexMap<String, RawValue>>>;
/// A user-defined record aggregate.
pub type RecordHandle = Rc<RefCell<Record>>;

/// A user-defined record: a class/type name plus named members.
#[derive(Debug, Clone)]
pub struct Record {
    pub type_name: String,
    pub members: IndexMap<String, RawValue>,
}

/// A raw value as held in a local slot, global slot, or aggregate position.
///
/// Aggregates are shared handles (`Rc<RefCell<_>>`); cloning a [`RawValue`]
/// clones the *binding*, not the underlying data, which is what lets the
/// tracer observe in-place mutation through any alias.
#[derive(Debug, Clone)]
pub enum RawValue {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    /// Immutable aggregate, walked for reachability but never itself tracked.
    Tuple(Vec<RawValue>),
    List(ListHandle),
    Map(MapHandle),
    Record(RecordHandle),
}

impl RawValue {
    pub fn list(items: Vec<RawValue>) -> Self {
        RawValue::List(Rc::new(RefCell::new(items)))
    }

    pub fn map(entries: IndexMap<String, RawValue>) -> Self {
        RawValue::Map(Rc::new(RefCell::new(entries)))
    }

    pub fn record(type_name: impl Into<String>, members: IndexMap<String, RawValue>) -> Self {
        RawValue::Record(Rc::new(RefCell::new(Record {
            type_name: type_name.into(),
            members,
        })))
    }

    fn is_primitive(&self) -> bool {
        matches!(
            self,
            RawValue::Int(_) | RawValue::Float(_) | RawValue::Str(_) | RawValue::Bool(_)
        )
    }

    /// "Host equality" between two bindings: structural for primitives
    /// (matches the host language's own `==`), identity for aggregates and
    /// tuples (a rebinding to a different object is observable even when the
    /// two objects currently hold equal contents; in-place mutation of the
    /// *same* object is never reported here — it surfaces through the heap
    /// diff instead). See SPEC_FULL.md §6 for why identity is the right
    /// reading of "host equality" for this encoding.
    pub fn same_binding(&self, other: &RawValue) -> bool {
        match (self, other) {
            (RawValue::Null, RawValue::Null) => true,
            (RawValue::Int(a), RawValue::Int(b)) => a == b,
            (RawValue::Float(a), RawValue::Float(b)) => a == b,
            (RawValue::Str(a), RawValue::Str(b)) => a == b,
            (RawValue::Bool(a), RawValue::Bool(b)) => a == b,
            (RawValue::Tuple(a), RawValue::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_binding(y))
            }
            (RawValue::List(a), RawValue::List(b)) => Rc::ptr_eq(a, b),
            (RawValue::Map(a), RawValue::Map(b)) => Rc::ptr_eq(a, b),
            (RawValue::Record(a), RawValue::Record(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A JSON number, string, or bool primitive payload for an encoded [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl Primitive {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Primitive::Int(i) => serde_json::json!(i),
            Primitive::Float(f) => serde_json::json!(f),
            Primitive::Str(s) => serde_json::json!(s),
            Primitive::Bool(b) => serde_json::json!(b),
        }
    }
}

/// The atomic two-field cell: `{isRef, val}`, encoded per spec §3.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `isRef = true`. `0` = null, `-1` = opaque tuple, otherwise a live
    /// heap identity.
    Ref(i64),
    /// `isRef = false`.
    Prim(Primitive),
}

impl Value {
    pub const NULL: Value = Value::Ref(0);
    pub const TUPLE_SENTINEL: Value = Value::Ref(-1);

    pub fn is_ref(&self) -> bool {
        matches!(self, Value::Ref(_))
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Ref(id) => serde_json::json!([true, id]),
            Value::Prim(p) => serde_json::json!([false, p.to_json()]),
        }
    }
}

/// Classify a raw host value into its compact encoding. Pure function; the
/// only external input is the [`IdentityTable`] used to resolve/allocate
/// identities for aggregates (encoding an aggregate never changes its
/// contents, only looks up or allocates its id).
pub fn encode(raw: &RawValue, ids: &mut IdentityTable) -> Value {
    match raw {
        RawValue::Null => Value::NULL,
        RawValue::Tuple(_) => Value::TUPLE_SENTINEL,
        RawValue::Int(i) => Value::Prim(Primitive::Int(*i)),
        RawValue::Float(f) => Value::Prim(Primitive::Float(*f)),
        RawValue::Str(s) => Value::Prim(Primitive::Str(s.clone())),
        RawValue::Bool(b) => Value::Prim(Primitive::Bool(*b)),
        RawValue::List(rc) => Value::Ref(ids.id_for(rc).as_i64()),
        RawValue::Map(rc) => Value::Ref(ids.id_for(rc).as_i64()),
        RawValue::Record(rc) => Value::Ref(ids.id_for(rc).as_i64()),
    }
}

/// The identity referenced by an encoded `Value`, if it names one actually
/// present in the heap (i.e. excludes the `0`/`-1` sentinels).
pub fn referenced_object(raw: &RawValue, ids: &mut IdentityTable) -> Option<ObjectId> {
    match raw {
        RawValue::List(rc) => Some(ids.id_for(rc)),
        RawValue::Map(rc) => Some(ids.id_for(rc)),
        RawValue::Record(rc) => Some(ids.id_for(rc)),
        _ => None,
    }
}

impl RawValue {
    /// `encode(x).isRef == false` law, exposed for the "encoding law" test.
    pub fn is_primitive_value(&self) -> bool {
        self.is_primitive()
    }

    /// Serialize the raw host value itself, recursively, rather than its
    /// encoding. Globals are logged this way (spec §4.G: `[name, raw
    /// value]`), unlike locals which always go through [`encode`].
    pub fn to_raw_json(&self) -> serde_json::Value {
        match self {
            RawValue::Null => serde_json::Value::Null,
            RawValue::Int(i) => serde_json::json!(i),
            RawValue::Float(f) => serde_json::json!(f),
            RawValue::Str(s) => serde_json::json!(s),
            RawValue::Bool(b) => serde_json::json!(b),
            RawValue::Tuple(items) => {
                serde_json::Value::Array(items.iter().map(RawValue::to_raw_json).collect())
            }
            RawValue::List(rc) => serde_json::Value::Array(
                rc.borrow().iter().map(RawValue::to_raw_json).collect(),
            ),
            RawValue::Map(rc) => {
                let map: serde_json::Map<String, serde_json::Value> = rc
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_raw_json()))
                    .collect();
                serde_json::Value::Object(map)
            }
            RawValue::Record(rc) => {
                let record = rc.borrow();
                let map: serde_json::Map<String, serde_json::Value> = record
                    .members
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_raw_json()))
                    .collect();
                serde_json::Value::Object(map)
            }
        }
    }
}

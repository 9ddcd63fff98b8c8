//! A minimal tree-walking interpreter for `stepscript`, driving `tracer-core`
//! through real `on_call`/`on_line`/`on_return`/`on_exception` events
//! (SPEC_FULL.md §6.1). This is the "instrumentation source" collaborator the
//! core treats as an opaque `Host`.

use std::time::Duration;

use indexmap::IndexMap;
use tracer_core::{History, HostFrame, RawValue};

use crate::ast::{BinOp, Expr, Program, Stmt, StmtKind, UnOp};
use crate::error::InterpError;

struct Scope {
    function: String,
    locals: IndexMap<String, RawValue>,
}

/// A snapshot of the interpreter's current execution point, handed to
/// `tracer-core` at each callback. Shaped like `tests::helpers::TestFrame`
/// but built from live interpreter state rather than hand-authored.
struct LiveFrame {
    function: String,
    line: u32,
    locals: IndexMap<String, RawValue>,
    globals: IndexMap<String, RawValue>,
    ancestors: Vec<String>,
}

impl HostFrame for LiveFrame {
    fn function_name(&self) -> &str {
        &self.function
    }

    fn line(&self) -> u32 {
        self.line
    }

    fn locals(&self) -> IndexMap<String, RawValue> {
        self.locals.clone()
    }

    fn globals(&self) -> IndexMap<String, RawValue> {
        self.globals.clone()
    }

    fn ancestor_function_names(&self) -> Vec<String> {
        self.ancestors.clone()
    }
}

pub struct Interpreter<'p> {
    program: &'p Program,
    history: History,
    globals: IndexMap<String, RawValue>,
    stack: Vec<Scope>,
}

impl<'p> Interpreter<'p> {
    pub fn new(program: &'p Program, budget: Duration) -> Self {
        Self {
            program,
            history: History::new(budget),
            globals: IndexMap::new(),
            stack: Vec::new(),
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Evaluate module-level initializers, then run `main` to completion.
    pub fn run(&mut self) -> Result<RawValue, InterpError> {
        let globals = self.program.globals.clone();
        for (name, expr) in &globals {
            let value = self.eval(expr)?;
            self.globals.insert(name.clone(), value);
        }
        self.call_function("main", Vec::new())
    }

    fn current_frame(&self, line: u32) -> LiveFrame {
        let top = self.stack.last().expect("frame stack non-empty while executing");
        let ancestors = self.stack[..self.stack.len() - 1]
            .iter()
            .rev()
            .map(|s| s.function.clone())
            .collect();
        LiveFrame {
            function: top.function.clone(),
            line,
            locals: top.locals.clone(),
            globals: self.globals.clone(),
            ancestors,
        }
    }

    fn on_line_event(&mut self, line: u32) -> Result<(), InterpError> {
        let frame = self.current_frame(line);
        self.history.on_line(&frame)?;
        Ok(())
    }

    fn set_local(&mut self, name: &str, value: RawValue) {
        if let Some(top) = self.stack.last_mut() {
            top.locals.insert(name.to_string(), value);
        }
    }

    fn call_function(&mut self, name: &str, args: Vec<RawValue>) -> Result<RawValue, InterpError> {
        if let Some(result) = self.call_builtin(name, &args)? {
            return Ok(result);
        }

        let def = self
            .program
            .function(name)
            .ok_or_else(|| InterpError::UnknownFunction(name.to_string()))?;

        let mut locals = IndexMap::new();
        for (param, arg) in def.params.iter().zip(args) {
            locals.insert(param.clone(), arg);
        }
        let first_line = def.body.first().map(|s| s.line).unwrap_or(0);
        self.stack.push(Scope {
            function: name.to_string(),
            locals,
        });

        let call_frame = self.current_frame(first_line);
        self.history.on_call(&call_frame)?;

        let body = def.body.clone();
        match self.exec_block(&body) {
            Ok(returned) => {
                let return_value = returned.unwrap_or(RawValue::Null);
                let return_frame = self.current_frame(first_line);
                self.history.on_return(&return_frame, return_value.clone())?;
                self.stack.pop();
                Ok(return_value)
            }
            Err(InterpError::Trace(e)) => {
                self.stack.pop();
                Err(InterpError::Trace(e))
            }
            Err(other) => {
                let frame = self.current_frame(first_line);
                let _ = self.history.on_exception(&frame);
                self.stack.pop();
                Err(other)
            }
        }
    }

    /// Native operations that don't produce a traced call frame, matching
    /// built-in functions (`len`, list methods) in the original Python,
    /// which never emit their own `call` event either.
    fn call_builtin(&mut self, name: &str, args: &[RawValue]) -> Result<Option<RawValue>, InterpError> {
        let result = match name {
            "len" => Some(RawValue::Int(match &args[0] {
                RawValue::List(rc) => rc.borrow().len() as i64,
                RawValue::Map(rc) => rc.borrow().len() as i64,
                RawValue::Str(s) => s.len() as i64,
                other => return Err(InterpError::TypeMismatch(format!("len() on {other:?}"))),
            })),
            "append" => {
                match &args[0] {
                    RawValue::List(rc) => rc.borrow_mut().push(args[1].clone()),
                    other => return Err(InterpError::TypeMismatch(format!("append() on {other:?}"))),
                }
                Some(RawValue::Null)
            }
            "extend" => {
                match (&args[0], &args[1]) {
                    (RawValue::List(rc), RawValue::List(items)) => {
                        let to_add = items.borrow().clone();
                        rc.borrow_mut().extend(to_add);
                    }
                    _ => return Err(InterpError::TypeMismatch("extend() expects two lists".into())),
                }
                Some(RawValue::Null)
            }
            "remove" => {
                match (&args[0], &args[1]) {
                    (RawValue::Map(rc), RawValue::Str(key)) => {
                        rc.borrow_mut().shift_remove(key);
                    }
                    _ => return Err(InterpError::TypeMismatch("remove() expects a dict and a string key".into())),
                }
                Some(RawValue::Null)
            }
            _ => None,
        };
        Ok(result)
    }

    /// `on_line` fires *after* each statement runs, not before: the core
    /// diffs locals/globals against whatever it last saw, so logging before
    /// a statement would mean the effect of a function's very last statement
    /// (e.g. a trailing global write) never gets flushed, since nothing runs
    /// after it to trigger the next snapshot.
    fn exec_block(&mut self, stmts: &[Stmt]) -> Result<Option<RawValue>, InterpError> {
        for stmt in stmts {
            let outcome = self.exec_stmt(stmt)?;
            self.on_line_event(stmt.line)?;
            if let Some(v) = outcome {
                return Ok(Some(v));
            }
        }
        Ok(None)
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<Option<RawValue>, InterpError> {
        match &stmt.kind {
            StmtKind::Let(name, expr) | StmtKind::Assign(name, expr) => {
                let value = self.eval(expr)?;
                self.set_local(name, value);
                Ok(None)
            }
            StmtKind::AssignGlobal(name, expr) => {
                let value = self.eval(expr)?;
                self.globals.insert(name.clone(), value);
                Ok(None)
            }
            StmtKind::IndexAssign(target, index, value) => {
                let target_val = self.eval(target)?;
                let index_val = self.eval(index)?;
                let value_val = self.eval(value)?;
                self.assign_index(&target_val, index_val, value_val)?;
                Ok(None)
            }
            StmtKind::FieldAssign(target, field, value) => {
                let target_val = self.eval(target)?;
                let value_val = self.eval(value)?;
                self.assign_field(&target_val, field, value_val)?;
                Ok(None)
            }
            StmtKind::If(cond, then_branch, else_branch) => {
                if truthy(&self.eval(cond)?) {
                    self.exec_block(then_branch)
                } else {
                    self.exec_block(else_branch)
                }
            }
            StmtKind::While(cond, body) => {
                while truthy(&self.eval(cond)?) {
                    if let Some(v) = self.exec_block(body)? {
                        return Ok(Some(v));
                    }
                    self.on_line_event(stmt.line)?;
                }
                Ok(None)
            }
            StmtKind::Return(expr) => {
                let value = self.eval(expr)?;
                Ok(Some(value))
            }
            StmtKind::Expr(expr) => {
                self.eval(expr)?;
                Ok(None)
            }
        }
    }

    fn lookup(&self, name: &str) -> Result<RawValue, InterpError> {
        if let Some(top) = self.stack.last() {
            if let Some(value) = top.locals.get(name) {
                return Ok(value.clone());
            }
        }
        if let Some(value) = self.globals.get(name) {
            return Ok(value.clone());
        }
        Err(InterpError::UnboundVariable(name.to_string()))
    }

    fn eval(&mut self, expr: &Expr) -> Result<RawValue, InterpError> {
        match expr {
            Expr::IntLit(i) => Ok(RawValue::Int(*i)),
            Expr::FloatLit(f) => Ok(RawValue::Float(*f)),
            Expr::StrLit(s) => Ok(RawValue::Str(s.clone())),
            Expr::BoolLit(b) => Ok(RawValue::Bool(*b)),
            Expr::NoneLit => Ok(RawValue::Null),
            Expr::Var(name) => self.lookup(name),
            Expr::ListLit(items) => {
                let values = items.iter().map(|e| self.eval(e)).collect::<Result<Vec<_>, _>>()?;
                Ok(RawValue::list(values))
            }
            Expr::DictLit(pairs) => {
                let mut map = IndexMap::new();
                for (key, expr) in pairs {
                    map.insert(key.clone(), self.eval(expr)?);
                }
                Ok(RawValue::map(map))
            }
            Expr::TupleLit(items) => {
                let values = items.iter().map(|e| self.eval(e)).collect::<Result<Vec<_>, _>>()?;
                Ok(RawValue::Tuple(values))
            }
            Expr::RecordLit { type_name, fields } => {
                if !self.program.records.iter().any(|r| &r.name == type_name) {
                    return Err(InterpError::UnknownRecord(type_name.clone()));
                }
                let mut members = IndexMap::new();
                for (key, expr) in fields {
                    members.insert(key.clone(), self.eval(expr)?);
                }
                Ok(RawValue::record(type_name.clone(), members))
            }
            Expr::Index(target, index) => {
                let target_val = self.eval(target)?;
                let index_val = self.eval(index)?;
                self.index_get(&target_val, &index_val)
            }
            Expr::Field(target, field) => {
                let target_val = self.eval(target)?;
                self.field_get(&target_val, field)
            }
            Expr::Call(name, args) => {
                let values = args.iter().map(|e| self.eval(e)).collect::<Result<Vec<_>, _>>()?;
                self.call_function(name, values)
            }
            Expr::BinOp(op, lhs, rhs) => {
                let l = self.eval(lhs)?;
                let r = self.eval(rhs)?;
                apply_binop(*op, l, r)
            }
            Expr::UnOp(op, inner) => {
                let v = self.eval(inner)?;
                apply_unop(*op, v)
            }
        }
    }

    fn index_get(&self, target: &RawValue, index: &RawValue) -> Result<RawValue, InterpError> {
        match target {
            RawValue::List(rc) => {
                let i = as_index(index)?;
                rc.borrow()
                    .get(i)
                    .cloned()
                    .ok_or_else(|| InterpError::IndexOutOfRange(format!("{i}")))
            }
            RawValue::Map(rc) => {
                let key = as_str_key(index)?;
                rc.borrow()
                    .get(&key)
                    .cloned()
                    .ok_or_else(|| InterpError::NoSuchField(key))
            }
            other => Err(InterpError::TypeMismatch(format!("cannot index {other:?}"))),
        }
    }

    fn assign_index(&mut self, target: &RawValue, index: RawValue, value: RawValue) -> Result<(), InterpError> {
        match target {
            RawValue::List(rc) => {
                let i = as_index(&index)?;
                let mut list = rc.borrow_mut();
                if i < list.len() {
                    list[i] = value;
                } else if i == list.len() {
                    list.push(value);
                } else {
                    return Err(InterpError::IndexOutOfRange(format!("{i}")));
                }
                Ok(())
            }
            RawValue::Map(rc) => {
                let key = as_str_key(&index)?;
                rc.borrow_mut().insert(key, value);
                Ok(())
            }
            other => Err(InterpError::TypeMismatch(format!("cannot index-assign {other:?}"))),
        }
    }

    fn field_get(&self, target: &RawValue, field: &str) -> Result<RawValue, InterpError> {
        match target {
            RawValue::Record(rc) => rc
                .borrow()
                .members
                .get(field)
                .cloned()
                .ok_or_else(|| InterpError::NoSuchField(field.to_string())),
            other => Err(InterpError::TypeMismatch(format!("cannot read field on {other:?}"))),
        }
    }

    fn assign_field(&mut self, target: &RawValue, field: &str, value: RawValue) -> Result<(), InterpError> {
        match target {
            RawValue::Record(rc) => {
                rc.borrow_mut().members.insert(field.to_string(), value);
                Ok(())
            }
            other => Err(InterpError::TypeMismatch(format!("cannot assign field on {other:?}"))),
        }
    }
}

fn as_index(v: &RawValue) -> Result<usize, InterpError> {
    match v {
        RawValue::Int(i) if *i >= 0 => Ok(*i as usize),
        other => Err(InterpError::TypeMismatch(format!("expected a non-negative integer index, got {other:?}"))),
    }
}

fn as_str_key(v: &RawValue) -> Result<String, InterpError> {
    match v {
        RawValue::Str(s) => Ok(s.clone()),
        other => Err(InterpError::TypeMismatch(format!("expected a string key, got {other:?}"))),
    }
}

fn truthy(v: &RawValue) -> bool {
    match v {
        RawValue::Bool(b) => *b,
        RawValue::Int(i) => *i != 0,
        RawValue::Float(f) => *f != 0.0,
        RawValue::Str(s) => !s.is_empty(),
        RawValue::Null => false,
        _ => true,
    }
}

fn as_f64(v: &RawValue) -> Result<f64, InterpError> {
    match v {
        RawValue::Int(i) => Ok(*i as f64),
        RawValue::Float(f) => Ok(*f),
        other => Err(InterpError::TypeMismatch(format!("expected a number, got {other:?}"))),
    }
}

fn apply_binop(op: BinOp, l: RawValue, r: RawValue) -> Result<RawValue, InterpError> {
    match op {
        BinOp::Add => match (&l, &r) {
            (RawValue::Str(a), RawValue::Str(b)) => Ok(RawValue::Str(format!("{a}{b}"))),
            (RawValue::Int(a), RawValue::Int(b)) => Ok(RawValue::Int(a + b)),
            _ => Ok(RawValue::Float(as_f64(&l)? + as_f64(&r)?)),
        },
        BinOp::Sub => numeric(l, r, |a, b| a - b, |a, b| a - b),
        BinOp::Mul => numeric(l, r, |a, b| a * b, |a, b| a * b),
        BinOp::Div => match (&l, &r) {
            (RawValue::Int(_), RawValue::Int(b)) if *b == 0 => Err(InterpError::DivisionByZero),
            (RawValue::Int(a), RawValue::Int(b)) => Ok(RawValue::Int(a.div_euclid(*b))),
            _ => {
                let b = as_f64(&r)?;
                if b == 0.0 {
                    return Err(InterpError::DivisionByZero);
                }
                Ok(RawValue::Float(as_f64(&l)? / b))
            }
        },
        BinOp::Mod => match (&l, &r) {
            (RawValue::Int(_), RawValue::Int(b)) if *b == 0 => Err(InterpError::DivisionByZero),
            (RawValue::Int(a), RawValue::Int(b)) => Ok(RawValue::Int(a.rem_euclid(*b))),
            _ => Err(InterpError::TypeMismatch("% requires integers".into())),
        },
        BinOp::Eq => Ok(RawValue::Bool(l.same_binding(&r))),
        BinOp::NotEq => Ok(RawValue::Bool(!l.same_binding(&r))),
        BinOp::Lt => Ok(RawValue::Bool(as_f64(&l)? < as_f64(&r)?)),
        BinOp::LtEq => Ok(RawValue::Bool(as_f64(&l)? <= as_f64(&r)?)),
        BinOp::Gt => Ok(RawValue::Bool(as_f64(&l)? > as_f64(&r)?)),
        BinOp::GtEq => Ok(RawValue::Bool(as_f64(&l)? >= as_f64(&r)?)),
        BinOp::And => Ok(if truthy(&l) { r } else { l }),
        BinOp::Or => Ok(if truthy(&l) { l } else { r }),
    }
}

fn numeric(
    l: RawValue,
    r: RawValue,
    int_op: impl Fn(i64, i64) -> i64,
    float_op: impl Fn(f64, f64) -> f64,
) -> Result<RawValue, InterpError> {
    match (&l, &r) {
        (RawValue::Int(a), RawValue::Int(b)) => Ok(RawValue::Int(int_op(*a, *b))),
        _ => Ok(RawValue::Float(float_op(as_f64(&l)?, as_f64(&r)?))),
    }
}

fn apply_unop(op: UnOp, v: RawValue) -> Result<RawValue, InterpError> {
    match op {
        UnOp::Neg => match v {
            RawValue::Int(i) => Ok(RawValue::Int(-i)),
            RawValue::Float(f) => Ok(RawValue::Float(-f)),
            other => Err(InterpError::TypeMismatch(format!("cannot negate {other:?}"))),
        },
        UnOp::Not => Ok(RawValue::Bool(!truthy(&v))),
    }
}

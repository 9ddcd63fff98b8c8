//! `stepscript`'s program representation: a small teaching language with
//! integers, floats, strings, booleans, `None`, lists, dicts, tuples,
//! records, functions, and the control flow needed to exercise the core
//! tracer end to end (spec.md §6, expanded in SPEC_FULL.md §6.1).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLit(i64),
    FloatLit(f64),
    StrLit(String),
    BoolLit(bool),
    NoneLit,
    Var(String),
    ListLit(Vec<Expr>),
    /// String-keyed dict literal; runtime dicts may also grow further keys
    /// via `StmtKind::IndexAssign`.
    DictLit(Vec<(String, Expr)>),
    TupleLit(Vec<Expr>),
    RecordLit {
        type_name: String,
        fields: Vec<(String, Expr)>,
    },
    Index(Box<Expr>, Box<Expr>),
    Field(Box<Expr>, String),
    Call(String, Vec<Expr>),
    BinOp(BinOp, Box<Expr>, Box<Expr>),
    UnOp(UnOp, Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Let(String, Expr),
    Assign(String, Expr),
    /// Assignment to a module-level global (spec.md's `_g` convention).
    AssignGlobal(String, Expr),
    IndexAssign(Expr, Expr, Expr),
    FieldAssign(Expr, String, Expr),
    If(Expr, Vec<Stmt>, Vec<Stmt>),
    While(Expr, Vec<Stmt>),
    Return(Expr),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub line: u32,
    pub kind: StmtKind,
}

impl Stmt {
    pub fn new(line: u32, kind: StmtKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    /// Docstring-style metadata used by `tracer-analyzer`'s hint extraction
    /// (`index: v[i][j]`), e.g. `Some("index: v[i][j]")`.
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordDef {
    pub name: String,
    pub fields: Vec<String>,
    /// Docstring-style metadata (`pointers: left, right`).
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub records: Vec<RecordDef>,
    pub functions: Vec<FunctionDef>,
    /// Module-level initializers, evaluated once before `main` runs.
    pub globals: Vec<(String, Expr)>,
}

impl Program {
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.iter().find(|f| f.name == name)
    }
}

//! An in-place merge sort exercising list creation and `modifyPos` writes
//! back into the one root list that threads through every recursive call,
//! rather than building a new list at each level.

use crate::ast::{BinOp, Expr, FunctionDef, Program, Stmt, StmtKind};

fn v(name: &str) -> Expr {
    Expr::Var(name.to_string())
}

fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Call(name.to_string(), args)
}

fn add(a: Expr, b: Expr) -> Expr {
    Expr::BinOp(BinOp::Add, Box::new(a), Box::new(b))
}

fn lt(a: Expr, b: Expr) -> Expr {
    Expr::BinOp(BinOp::Lt, Box::new(a), Box::new(b))
}

fn idx(target: Expr, index: Expr) -> Expr {
    Expr::Index(Box::new(target), Box::new(index))
}

pub fn program() -> Program {
    // merge_inplace(lst, start, mid, end): copies lst[start..mid] and
    // lst[mid..end] out into `left`/`right`, then merges them back into
    // lst itself via index assignment, so the edits land on the one list
    // object `lst` names no matter how deep the recursion went to get here.
    let merge_inplace = FunctionDef {
        name: "merge_inplace".to_string(),
        params: vec!["lst".into(), "start".into(), "mid".into(), "end".into()],
        doc: None,
        body: vec![
            Stmt::new(2, StmtKind::Let("left".into(), Expr::ListLit(vec![]))),
            Stmt::new(3, StmtKind::Let("i".into(), v("start"))),
            Stmt::new(
                4,
                StmtKind::While(
                    lt(v("i"), v("mid")),
                    vec![
                        Stmt::new(5, StmtKind::Expr(call("append", vec![v("left"), idx(v("lst"), v("i"))]))),
                        Stmt::new(6, StmtKind::Assign("i".into(), add(v("i"), Expr::IntLit(1)))),
                    ],
                ),
            ),
            Stmt::new(8, StmtKind::Let("right".into(), Expr::ListLit(vec![]))),
            Stmt::new(9, StmtKind::Let("j".into(), v("mid"))),
            Stmt::new(
                10,
                StmtKind::While(
                    lt(v("j"), v("end")),
                    vec![
                        Stmt::new(11, StmtKind::Expr(call("append", vec![v("right"), idx(v("lst"), v("j"))]))),
                        Stmt::new(12, StmtKind::Assign("j".into(), add(v("j"), Expr::IntLit(1)))),
                    ],
                ),
            ),
            Stmt::new(14, StmtKind::Let("li".into(), Expr::IntLit(0))),
            Stmt::new(15, StmtKind::Let("ri".into(), Expr::IntLit(0))),
            Stmt::new(16, StmtKind::Let("pos".into(), v("start"))),
            Stmt::new(
                17,
                StmtKind::While(
                    Expr::BinOp(
                        BinOp::And,
                        Box::new(lt(v("li"), call("len", vec![v("left")]))),
                        Box::new(lt(v("ri"), call("len", vec![v("right")]))),
                    ),
                    vec![
                        Stmt::new(
                            18,
                            StmtKind::If(
                                lt(idx(v("left"), v("li")), idx(v("right"), v("ri"))),
                                vec![
                                    Stmt::new(19, StmtKind::IndexAssign(v("lst"), v("pos"), idx(v("left"), v("li")))),
                                    Stmt::new(20, StmtKind::Assign("li".into(), add(v("li"), Expr::IntLit(1)))),
                                ],
                                vec![
                                    Stmt::new(22, StmtKind::IndexAssign(v("lst"), v("pos"), idx(v("right"), v("ri")))),
                                    Stmt::new(23, StmtKind::Assign("ri".into(), add(v("ri"), Expr::IntLit(1)))),
                                ],
                            ),
                        ),
                        Stmt::new(25, StmtKind::Assign("pos".into(), add(v("pos"), Expr::IntLit(1)))),
                    ],
                ),
            ),
            Stmt::new(
                27,
                StmtKind::While(
                    lt(v("li"), call("len", vec![v("left")])),
                    vec![
                        Stmt::new(28, StmtKind::IndexAssign(v("lst"), v("pos"), idx(v("left"), v("li")))),
                        Stmt::new(29, StmtKind::Assign("li".into(), add(v("li"), Expr::IntLit(1)))),
                        Stmt::new(30, StmtKind::Assign("pos".into(), add(v("pos"), Expr::IntLit(1)))),
                    ],
                ),
            ),
            Stmt::new(
                32,
                StmtKind::While(
                    lt(v("ri"), call("len", vec![v("right")])),
                    vec![
                        Stmt::new(33, StmtKind::IndexAssign(v("lst"), v("pos"), idx(v("right"), v("ri")))),
                        Stmt::new(34, StmtKind::Assign("ri".into(), add(v("ri"), Expr::IntLit(1)))),
                        Stmt::new(35, StmtKind::Assign("pos".into(), add(v("pos"), Expr::IntLit(1)))),
                    ],
                ),
            ),
            Stmt::new(37, StmtKind::Return(Expr::NoneLit)),
        ],
    };

    let mergesort = FunctionDef {
        name: "mergesort".to_string(),
        params: vec!["lst".into(), "start".into(), "end".into()],
        doc: None,
        body: vec![
            Stmt::new(
                40,
                StmtKind::If(
                    Expr::BinOp(
                        BinOp::LtEq,
                        Box::new(Expr::BinOp(BinOp::Sub, Box::new(v("end")), Box::new(v("start")))),
                        Box::new(Expr::IntLit(1)),
                    ),
                    vec![Stmt::new(41, StmtKind::Return(Expr::NoneLit))],
                    vec![],
                ),
            ),
            Stmt::new(
                43,
                StmtKind::Let(
                    "mid".into(),
                    add(
                        v("start"),
                        Expr::BinOp(BinOp::Div, Box::new(Expr::BinOp(BinOp::Sub, Box::new(v("end")), Box::new(v("start")))), Box::new(Expr::IntLit(2))),
                    ),
                ),
            ),
            Stmt::new(44, StmtKind::Expr(call("mergesort", vec![v("lst"), v("start"), v("mid")]))),
            Stmt::new(45, StmtKind::Expr(call("mergesort", vec![v("lst"), v("mid"), v("end")]))),
            Stmt::new(46, StmtKind::Expr(call("merge_inplace", vec![v("lst"), v("start"), v("mid"), v("end")]))),
            Stmt::new(47, StmtKind::Return(Expr::NoneLit)),
        ],
    };

    let main = FunctionDef {
        name: "main".to_string(),
        params: vec![],
        doc: None,
        body: vec![
            Stmt::new(
                50,
                StmtKind::Let(
                    "xs".into(),
                    Expr::ListLit(vec![
                        Expr::IntLit(9),
                        Expr::IntLit(8),
                        Expr::IntLit(7),
                        Expr::IntLit(6),
                        Expr::IntLit(5),
                        Expr::IntLit(4),
                        Expr::IntLit(3),
                        Expr::IntLit(2),
                        Expr::IntLit(1),
                    ]),
                ),
            ),
            Stmt::new(51, StmtKind::Expr(call("mergesort", vec![v("xs"), Expr::IntLit(0), call("len", vec![v("xs")])]))),
        ],
    };

    Program {
        records: vec![],
        functions: vec![merge_inplace, mergesort, main],
        globals: vec![],
    }
}

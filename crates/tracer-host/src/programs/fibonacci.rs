//! S1: scalar-only recursion. No aggregates are ever created, so a trace of
//! this program must never emit a heap batch.

use crate::ast::{BinOp, Expr, FunctionDef, Program, Stmt, StmtKind};

pub fn program() -> Program {
    let fib = FunctionDef {
        name: "fib".to_string(),
        params: vec!["n".to_string()],
        doc: None,
        body: vec![
            Stmt::new(
                2,
                StmtKind::If(
                    Expr::BinOp(BinOp::Lt, Box::new(Expr::Var("n".into())), Box::new(Expr::IntLit(2))),
                    vec![Stmt::new(3, StmtKind::Return(Expr::Var("n".into())))],
                    vec![],
                ),
            ),
            Stmt::new(
                4,
                StmtKind::Return(Expr::BinOp(
                    BinOp::Add,
                    Box::new(Expr::Call(
                        "fib".into(),
                        vec![Expr::BinOp(BinOp::Sub, Box::new(Expr::Var("n".into())), Box::new(Expr::IntLit(1)))],
                    )),
                    Box::new(Expr::Call(
                        "fib".into(),
                        vec![Expr::BinOp(BinOp::Sub, Box::new(Expr::Var("n".into())), Box::new(Expr::IntLit(2)))],
                    )),
                )),
            ),
        ],
    };

    let main = FunctionDef {
        name: "main".to_string(),
        params: vec![],
        doc: None,
        body: vec![
            Stmt::new(8, StmtKind::Let("n".into(), Expr::IntLit(7))),
            Stmt::new(
                9,
                StmtKind::AssignGlobal("result_g".into(), Expr::Call("fib".into(), vec![Expr::Var("n".into())])),
            ),
        ],
    };

    Program {
        records: vec![],
        functions: vec![fib, main],
        globals: vec![],
    }
}

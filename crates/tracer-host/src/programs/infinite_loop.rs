//! S6: a program that never terminates on its own, for exercising the
//! wall-clock timeout.

use crate::ast::{BinOp, Expr, FunctionDef, Program, Stmt, StmtKind};

fn v(name: &str) -> Expr {
    Expr::Var(name.to_string())
}

pub fn program() -> Program {
    let main = FunctionDef {
        name: "main".to_string(),
        params: vec![],
        doc: None,
        body: vec![
            Stmt::new(2, StmtKind::AssignGlobal("counter_g".into(), Expr::IntLit(0))),
            Stmt::new(
                3,
                StmtKind::While(
                    Expr::BoolLit(true),
                    vec![Stmt::new(
                        4,
                        StmtKind::AssignGlobal(
                            "counter_g".into(),
                            Expr::BinOp(BinOp::Add, Box::new(v("counter_g")), Box::new(Expr::IntLit(1))),
                        ),
                    )],
                ),
            ),
        ],
    };

    Program {
        records: vec![],
        functions: vec![main],
        globals: vec![],
    }
}

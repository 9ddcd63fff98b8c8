//! S4: a single-element append collapses to one `modifyPos`; a multi-element
//! growth in one step must fall back to `reset`.

use crate::ast::{Expr, FunctionDef, Program, Stmt, StmtKind};

fn v(name: &str) -> Expr {
    Expr::Var(name.to_string())
}

pub fn program() -> Program {
    let main = FunctionDef {
        name: "main".to_string(),
        params: vec![],
        doc: None,
        body: vec![
            Stmt::new(2, StmtKind::Let("xs".into(), Expr::ListLit(vec![Expr::IntLit(1), Expr::IntLit(2)]))),
            Stmt::new(3, StmtKind::Expr(Expr::Call("append".into(), vec![v("xs"), Expr::IntLit(3)]))),
            Stmt::new(
                4,
                StmtKind::Expr(Expr::Call(
                    "extend".into(),
                    vec![v("xs"), Expr::ListLit(vec![Expr::IntLit(9), Expr::IntLit(9)])],
                )),
            ),
        ],
    };

    Program {
        records: vec![],
        functions: vec![main],
        globals: vec![],
    }
}

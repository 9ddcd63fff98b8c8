//! S5: a dict goes through `new` -> `addKey` -> `modifyKey` -> `removeKey`.

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
            Stmt::new(2, StmtKind::Let("counts".into(), Expr::DictLit(vec![]))),
            Stmt::new(3, StmtKind::IndexAssign(v("counts"), Expr::StrLit("a".into()), Expr::IntLit(1))),
            Stmt::new(4, StmtKind::IndexAssign(v("counts"), Expr::StrLit("a".into()), Expr::IntLit(2))),
            Stmt::new(
                5,
                StmtKind::Expr(Expr::Call("remove".into(), vec![v("counts"), Expr::StrLit("a".into())])),
            ),
        ],
    };

    Program {
        records: vec![],
        functions: vec![main],
        globals: vec![],
    }
}

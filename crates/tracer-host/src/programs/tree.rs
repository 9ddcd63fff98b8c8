//! A small binary tree built from `TreeNode` records, then walked in order
//! into an output list. Exercises record aggregates, the `pointers:`
//! analyzer hint, and `modifyPos` appends onto a second, independent list.

use crate::ast::{BinOp, Expr, FunctionDef, Program, RecordDef, Stmt, StmtKind};

fn v(name: &str) -> Expr {
    Expr::Var(name.to_string())
}

fn field(target: &str, name: &str) -> Expr {
    Expr::Field(Box::new(v(target)), name.to_string())
}

fn leaf(data: i64) -> Expr {
    Expr::RecordLit {
        type_name: "TreeNode".to_string(),
        fields: vec![
            ("left".to_string(), Expr::NoneLit),
            ("right".to_string(), Expr::NoneLit),
            ("data".to_string(), Expr::IntLit(data)),
        ],
    }
}

pub fn program() -> Program {
    let tree_node = RecordDef {
        name: "TreeNode".to_string(),
        fields: vec!["left".into(), "right".into(), "data".into()],
        doc: Some("pointers: left, right".to_string()),
    };

    // In-order traversal: visit left, append this node's data, visit right.
    let traverse_in_order = FunctionDef {
        name: "traverse_in_order".to_string(),
        params: vec!["node".into(), "out".into()],
        doc: None,
        body: vec![
            Stmt::new(
                2,
                StmtKind::If(
                    Expr::BinOp(BinOp::Eq, Box::new(v("node")), Box::new(Expr::NoneLit)),
                    vec![Stmt::new(3, StmtKind::Return(Expr::NoneLit))],
                    vec![],
                ),
            ),
            Stmt::new(
                5,
                StmtKind::Expr(Expr::Call("traverse_in_order".into(), vec![field("node", "left"), v("out")])),
            ),
            Stmt::new(
                6,
                StmtKind::Expr(Expr::Call("append".into(), vec![v("out"), field("node", "data")])),
            ),
            Stmt::new(
                7,
                StmtKind::Expr(Expr::Call("traverse_in_order".into(), vec![field("node", "right"), v("out")])),
            ),
            Stmt::new(8, StmtKind::Return(Expr::NoneLit)),
        ],
    };

    let main = FunctionDef {
        name: "main".to_string(),
        params: vec![],
        doc: None,
        body: vec![
            Stmt::new(11, StmtKind::Let("n2".into(), leaf(2))),
            Stmt::new(
                12,
                StmtKind::Let(
                    "n1".into(),
                    Expr::RecordLit {
                        type_name: "TreeNode".to_string(),
                        fields: vec![
                            ("left".to_string(), Expr::NoneLit),
                            ("right".to_string(), v("n2")),
                            ("data".to_string(), Expr::IntLit(1)),
                        ],
                    },
                ),
            ),
            Stmt::new(13, StmtKind::Let("n4".into(), leaf(4))),
            Stmt::new(
                14,
                StmtKind::Let(
                    "root".into(),
                    Expr::RecordLit {
                        type_name: "TreeNode".to_string(),
                        fields: vec![
                            ("left".to_string(), v("n1")),
                            ("right".to_string(), v("n4")),
                            ("data".to_string(), Expr::IntLit(3)),
                        ],
                    },
                ),
            ),
            Stmt::new(15, StmtKind::Let("out_list".into(), Expr::ListLit(vec![]))),
            Stmt::new(
                16,
                StmtKind::Expr(Expr::Call("traverse_in_order".into(), vec![v("root"), v("out_list")])),
            ),
        ],
    };

    Program {
        records: vec![tree_node],
        functions: vec![traverse_in_order, main],
        globals: vec![],
    }
}

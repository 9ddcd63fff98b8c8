//! The static safety allow-list (spec.md §6): forbidden constructs are
//! rejected by walking the parsed AST rather than regexing source text.
//! `stepscript` has no import/exec/eval/exception-handling syntax at all —
//! the absence of those nodes is itself the allow-list for them; what
//! remains to police is ambient-I/O-or-dynamic-code-shaped *calls*, which the
//! AST can't rule out at parse time since any identifier is a valid call
//! target.

use tracer_host::{Expr, Program, Stmt, StmtKind};

use crate::error::AnalyzerError;

const FORBIDDEN_CALLS: &[&str] = &[
    "import", "__import__", "exec", "eval", "compile", "open", "system", "globals", "locals",
    "getattr", "setattr", "dir",
];

pub fn check(program: &Program) -> Result<(), AnalyzerError> {
    for func in &program.functions {
        check_block(&func.body)?;
    }
    for (_, expr) in &program.globals {
        check_expr(expr)?;
    }
    Ok(())
}

fn check_block(stmts: &[Stmt]) -> Result<(), AnalyzerError> {
    for stmt in stmts {
        check_stmt(stmt)?;
    }
    Ok(())
}

fn check_stmt(stmt: &Stmt) -> Result<(), AnalyzerError> {
    match &stmt.kind {
        StmtKind::Let(_, e) | StmtKind::Assign(_, e) | StmtKind::AssignGlobal(_, e) | StmtKind::Return(e) | StmtKind::Expr(e) => {
            check_expr(e)
        }
        StmtKind::IndexAssign(t, i, v) => {
            check_expr(t)?;
            check_expr(i)?;
            check_expr(v)
        }
        StmtKind::FieldAssign(t, _, v) => {
            check_expr(t)?;
            check_expr(v)
        }
        StmtKind::If(cond, then_b, else_b) => {
            check_expr(cond)?;
            check_block(then_b)?;
            check_block(else_b)
        }
        StmtKind::While(cond, body) => {
            check_expr(cond)?;
            check_block(body)
        }
    }
}

fn check_expr(expr: &Expr) -> Result<(), AnalyzerError> {
    match expr {
        Expr::Call(name, args) => {
            if FORBIDDEN_CALLS.contains(&name.as_str()) {
                return Err(AnalyzerError::Security {
                    msg: format!("call to '{name}' is not allowed"),
                });
            }
            for arg in args {
                check_expr(arg)?;
            }
            Ok(())
        }
        Expr::ListLit(items) | Expr::TupleLit(items) => {
            for item in items {
                check_expr(item)?;
            }
            Ok(())
        }
        Expr::DictLit(pairs) => {
            for (_, v) in pairs {
                check_expr(v)?;
            }
            Ok(())
        }
        Expr::RecordLit { fields, .. } => {
            for (_, v) in fields {
                check_expr(v)?;
            }
            Ok(())
        }
        Expr::Index(t, i) => {
            check_expr(t)?;
            check_expr(i)
        }
        Expr::Field(t, _) => check_expr(t),
        Expr::BinOp(_, l, r) => {
            check_expr(l)?;
            check_expr(r)
        }
        Expr::UnOp(_, e) => check_expr(e),
        Expr::IntLit(_)
        | Expr::FloatLit(_)
        | Expr::StrLit(_)
        | Expr::BoolLit(_)
        | Expr::NoneLit
        | Expr::Var(_) => Ok(()),
    }
}

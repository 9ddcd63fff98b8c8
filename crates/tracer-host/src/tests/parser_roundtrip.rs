use std::time::Duration;

use crate::ast::StmtKind;
use crate::interp::Interpreter;
use crate::parser::parse;

const SOURCE: &str = r#"
fn double(n) {
    return n * 2;
}

fn main() {
    let x = double(21);
    result_g = x;
}
"#;

#[test]
fn parses_functions_and_calls() {
    let program = parse(SOURCE).expect("valid stepscript source");
    assert_eq!(program.functions.len(), 2);
    let main = program.function("main").unwrap();
    assert!(matches!(main.body[1].kind, StmtKind::AssignGlobal(..)));
}

#[test]
fn parsed_program_runs_through_the_interpreter() {
    let program = parse(SOURCE).unwrap();
    let mut interp = Interpreter::new(&program, Duration::from_millis(2000));
    interp.run().expect("well-formed program should run");
    let found = interp
        .history()
        .log()
        .iter()
        .any(|e| matches!(e, tracer_core::LogEvent::NewGlobal(name, v) if name == "result_g" && v == &serde_json::json!(42)));
    assert!(found);
}

#[test]
fn rejects_unbalanced_source() {
    let err = parse("fn broken( {").unwrap_err();
    assert!(err.line >= 1);
}

#[test]
fn assigning_to_a_g_suffixed_name_is_a_global_write() {
    let src = "fn main() { total_g = 1; }";
    let program = parse(src).unwrap();
    let main = program.function("main").unwrap();
    assert!(matches!(main.body[0].kind, StmtKind::AssignGlobal(ref n, _) if n == "total_g"));
}

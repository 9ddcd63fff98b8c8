use crate::analyze;
use crate::error::AnalyzerError;

#[test]
fn forbidden_call_is_rejected_before_running() {
    let src = r#"
fn main() {
    let data = open("secrets.txt");
}
"#;
    let (error, inferences) = analyze(src);
    assert!(inferences.is_empty());
    match error {
        Some(AnalyzerError::Security { msg }) => assert!(msg.contains("open")),
        other => panic!("expected a security error, got {other:?}"),
    }
}

#[test]
fn forbidden_call_nested_inside_an_expression_is_still_caught() {
    let src = r#"
fn main() {
    let x = 1 + len(eval("1"));
}
"#;
    let (error, _) = analyze(src);
    assert!(matches!(error, Some(AnalyzerError::Security { .. })));
}

#[test]
fn ordinary_programs_pass_the_allow_list() {
    let src = r#"
fn double(n) {
    return n * 2;
}

fn main() {
    let x = double(21);
}
"#;
    let (error, _) = analyze(src);
    assert!(error.is_none());
}

#[test]
fn syntax_errors_surface_with_a_line_number() {
    let (error, inferences) = analyze("fn broken( {");
    assert!(inferences.is_empty());
    match error {
        Some(AnalyzerError::Syntax { line, .. }) => assert!(line >= 1),
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

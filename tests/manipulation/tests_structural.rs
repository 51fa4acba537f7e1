//! Structural edits: statements, list elements, order, unwrap.

#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use rstest::rstest;
use treemorph::parser::SyntaxKind;
use treemorph::{EditError, TextSize};

use crate::helpers::source_fixtures::{FOUR_CALLS, IF_WITH_BODY, NESTED_NAMESPACE, THREE_ARGS};
use crate::helpers::{first_of, ident, main_file, project_with, statements, texts};

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_insert_statement_between() {
    let mut project = project_with("a();\nc();");
    let file = main_file(&mut project);
    let root = file.root();
    let before = statements(file);

    let inserted = file.insert_statements(root, 1, "b();").unwrap();

    assert_eq!(file.full_text(), "a();\nb();\nc();");
    assert_eq!(texts(file, &inserted), vec!["b();"]);
    assert_eq!(statements(file), vec![before[0], inserted[0], before[1]]);
}

#[test]
fn test_insert_several_statements_at_start() {
    let mut project = project_with("a();");
    let file = main_file(&mut project);
    let root = file.root();
    let a = statements(file)[0];

    let inserted = file.insert_statements(root, 0, "x();\ny();").unwrap();

    assert_eq!(file.full_text(), "x();\ny();\na();");
    assert_eq!(texts(file, &inserted), vec!["x();", "y();"]);
    assert_eq!(file.text(a).unwrap(), "a();");
}

#[test]
fn test_insert_statement_into_empty_body() {
    let mut project = project_with("function f() {}");
    let file = main_file(&mut project);
    let function = first_of(file, SyntaxKind::FUNCTION_DECLARATION);

    let inserted = file.insert_statements(function, 0, "a();").unwrap();

    assert_eq!(file.full_text(), "function f() {\n    a();\n}");
    assert_eq!(texts(file, &inserted), vec!["a();"]);
    assert_eq!(file.statements(function).unwrap(), inserted);
}

#[test]
fn test_insert_statement_follows_body_indentation() {
    let mut project = project_with(IF_WITH_BODY);
    let file = main_file(&mut project);
    let if_statement = statements(file)[1];
    let body = file.statements(if_statement).unwrap();

    file.insert_statements(if_statement, 2, "c();").unwrap();

    assert_eq!(
        file.full_text(),
        "f();\nif (x) {\n    a();\n    b();\n    c();\n}\ng();"
    );
    assert_eq!(texts(file, &body), vec!["a();", "b();"]);
}

#[test]
fn test_insert_statement_index_out_of_range() {
    let mut project = project_with("a();");
    let file = main_file(&mut project);
    let root = file.root();

    let err = file.insert_statements(root, 3, "b();").unwrap_err();

    assert!(matches!(err, EditError::IndexOutOfRange { index: 3, len: 1 }));
}

#[rstest]
#[case::first(0, "b();\nc();\nd();")]
#[case::middle(1, "a();\nc();\nd();")]
#[case::last(3, "a();\nb();\nc();")]
fn test_remove_statement(#[case] index: usize, #[case] expected: &str) {
    let mut project = project_with(FOUR_CALLS);
    let file = main_file(&mut project);
    let mut before = statements(file);

    file.remove(before[index]).unwrap();

    assert_eq!(file.full_text(), expected);
    assert!(file.is_forgotten(before[index]));
    before.remove(index);
    assert_eq!(statements(file), before);
}

#[test]
fn test_replace_statement_with_text() {
    let mut project = project_with("a();\nb();\nc();");
    let file = main_file(&mut project);
    let before = statements(file);

    let replacement = file.replace_with_text(before[1], "x(1);").unwrap();

    assert_eq!(file.full_text(), "a();\nx(1);\nc();");
    assert!(file.is_forgotten(before[1]));
    assert_eq!(file.text(replacement).unwrap(), "x(1);");
    assert_eq!(statements(file), vec![before[0], replacement, before[2]]);
}

#[test]
fn test_replacement_declaring_same_name_keeps_name() {
    let mut project = project_with("function run() {}\nrun();");
    let file = main_file(&mut project);
    let function = statements(file)[0];
    let name = ident(file, "run", 0);

    let replacement = file.replace_with_text(function, "function run(x) {}").unwrap();

    assert_eq!(file.full_text(), "function run(x) {}\nrun();");
    assert!(file.is_forgotten(function));
    assert_eq!(file.text(name).unwrap(), "run");
    assert_eq!(file.range(name).unwrap(), treemorph::TextRange::new(9.into(), 12.into()));
    assert_eq!(file.parent(name).unwrap(), Some(replacement));
    assert_eq!(file.kind(replacement).unwrap(), SyntaxKind::FUNCTION_DECLARATION);
}

#[test]
fn test_replacement_with_other_name_forgets_name() {
    let mut project = project_with("function run() {}\nrun();");
    let file = main_file(&mut project);
    let function = statements(file)[0];
    let name = ident(file, "run", 0);
    let call = ident(file, "run", 1);

    file.replace_with_text(function, "function go() {}").unwrap();

    assert_eq!(file.full_text(), "function go() {}\nrun();");
    assert!(file.is_forgotten(name));
    assert_eq!(file.range(call).unwrap(), treemorph::TextRange::new(17.into(), 20.into()));
}

// ============================================================================
// Comma lists
// ============================================================================

#[rstest]
#[case::first(0, "x", "f(x, a, c);")]
#[case::middle(1, "b", "f(a, b, c);")]
#[case::last(2, "d", "f(a, c, d);")]
fn test_insert_list_element(#[case] index: usize, #[case] text: &str, #[case] expected: &str) {
    let mut project = project_with("f(a, c);");
    let file = main_file(&mut project);
    let a = ident(file, "a", 0);
    let c = ident(file, "c", 0);
    let call = first_of(file, SyntaxKind::CALL_EXPRESSION);

    let inserted = file.insert_list_element(call, index, text).unwrap();

    assert_eq!(file.full_text(), expected);
    assert_eq!(file.text(inserted).unwrap(), text);
    assert_eq!(texts(file, &[a, c]), vec!["a", "c"]);
}

#[test]
fn test_insert_into_empty_list() {
    let mut project = project_with("f();");
    let file = main_file(&mut project);
    let call = first_of(file, SyntaxKind::CALL_EXPRESSION);

    let inserted = file.insert_list_element(call, 0, "a").unwrap();

    assert_eq!(file.full_text(), "f(a);");
    assert_eq!(file.kind(inserted).unwrap(), SyntaxKind::IDENT);
}

#[test]
fn test_insert_list_element_needs_comma_list() {
    let mut project = project_with("a();");
    let file = main_file(&mut project);
    let root = file.root();

    let err = file.insert_list_element(root, 0, "b").unwrap_err();

    assert!(matches!(err, EditError::Unsupported { kind: SyntaxKind::SOURCE_FILE, .. }));
    assert_eq!(file.full_text(), "a();");
}

#[rstest]
#[case::first("a", "f(b, c);")]
#[case::middle("b", "f(a, c);")]
#[case::last("c", "f(a, b);")]
fn test_remove_list_element_with_comma(#[case] name: &str, #[case] expected: &str) {
    let mut project = project_with(THREE_ARGS);
    let file = main_file(&mut project);
    let removed = ident(file, name, 0);
    let kept: Vec<_> = ["a", "b", "c"]
        .into_iter()
        .filter(|other| *other != name)
        .map(|other| ident(file, other, 0))
        .collect();

    file.remove(removed).unwrap();

    assert_eq!(file.full_text(), expected);
    assert!(file.is_forgotten(removed));
    assert!(kept.iter().all(|id| !file.is_forgotten(*id)));
}

// ============================================================================
// Order
// ============================================================================

#[test]
fn test_move_statement_to_front() {
    let mut project = project_with(FOUR_CALLS);
    let file = main_file(&mut project);
    let before = statements(file);

    file.set_order(before[2], 0).unwrap();

    assert_eq!(file.full_text(), "c();\na();\nb();\nd();");
    assert_eq!(
        statements(file),
        vec![before[2], before[0], before[1], before[3]]
    );
    assert_eq!(file.text(before[2]).unwrap(), "c();");
}

#[test]
fn test_move_list_element_keeps_commas() {
    let mut project = project_with(THREE_ARGS);
    let file = main_file(&mut project);
    let b = ident(file, "b", 0);

    file.set_order(b, 2).unwrap();

    assert_eq!(file.full_text(), "f(a, c, b);");
    assert_eq!(file.range(b).unwrap(), treemorph::TextRange::new(8.into(), 9.into()));
}

#[test]
fn test_move_to_same_index_changes_nothing() {
    let mut project = project_with(FOUR_CALLS);
    let file = main_file(&mut project);
    let before = statements(file);

    file.set_order(before[1], 1).unwrap();

    assert_eq!(file.full_text(), FOUR_CALLS);
    assert_eq!(statements(file), before);
}

// ============================================================================
// Unwrap
// ============================================================================

#[test]
fn test_unwrap_if_statement() {
    let mut project = project_with(IF_WITH_BODY);
    let file = main_file(&mut project);
    let before = statements(file);
    let if_statement = before[1];
    let body = file.statements(if_statement).unwrap();

    file.unwrap(if_statement).unwrap();

    assert_eq!(file.full_text(), "f();\na();\nb();\ng();");
    assert!(file.is_forgotten(if_statement));
    assert_eq!(texts(file, &body), vec!["a();", "b();"]);
    assert_eq!(
        statements(file),
        vec![before[0], body[0], body[1], before[2]]
    );
}

#[test]
fn test_unwrap_nested_namespace() {
    let mut project = project_with(NESTED_NAMESPACE);
    let file = main_file(&mut project);
    let outer = statements(file)[0];
    let inner = file.statements(outer).unwrap()[0];
    let run = file.statements(inner).unwrap()[0];

    file.unwrap(inner).unwrap();

    assert_eq!(file.full_text(), "namespace Outer {\n    run();\n}");
    assert!(file.is_forgotten(inner));
    assert_eq!(file.statements(outer).unwrap(), vec![run]);
}

#[test]
fn test_unwrap_if_with_else_is_rejected() {
    let text = "if (x) {\n    a();\n} else {\n    b();\n}";
    let mut project = project_with(text);
    let file = main_file(&mut project);
    let if_statement = statements(file)[0];

    let err = file.unwrap(if_statement).unwrap_err();

    assert!(matches!(
        err,
        EditError::Unsupported { kind: SyntaxKind::IF_STATEMENT, .. }
    ));
    assert_eq!(file.full_text(), text);
    assert!(!file.is_forgotten(if_statement));
}

#[test]
fn test_unwrap_needs_a_body() {
    let mut project = project_with("a();");
    let file = main_file(&mut project);
    let statement = statements(file)[0];

    let err = file.unwrap(statement).unwrap_err();

    assert!(matches!(
        err,
        EditError::Unsupported { kind: SyntaxKind::EXPRESSION_STATEMENT, .. }
    ));
}

// ============================================================================
// Hooks
// ============================================================================

#[test]
fn test_before_modify_runs_for_every_manipulation() {
    let mut project = project_with("a();");
    let file = main_file(&mut project);
    let seen: Rc<RefCell<Vec<PathBuf>>> = Rc::default();
    let sink = Rc::clone(&seen);
    file.on_before_modify(move |path| sink.borrow_mut().push(path.to_path_buf()));

    file.insert_text(TextSize::new(4), "\nb();").unwrap();
    let _ = file.move_to("data.json");

    assert_eq!(
        *seen.borrow(),
        vec![PathBuf::from("main.ts"), PathBuf::from("main.ts")]
    );
}

//! Navigating wrappers of a source file.

#![allow(clippy::unwrap_used)]

use treemorph::parser::SyntaxKind;
use treemorph::{NodeVariant, TextRange, TextSize};

use crate::helpers::source_fixtures::IF_WITH_BODY;
use crate::helpers::{first_of, main_file, project_with, statements, texts};

#[test]
fn test_navigation_returns_stable_handles() {
    let mut project = project_with("a();\nb();");
    let file = main_file(&mut project);

    assert_eq!(statements(file), statements(file));
    let root = file.root();
    assert_eq!(file.kind(root).unwrap(), SyntaxKind::SOURCE_FILE);
    assert_eq!(file.parent(root).unwrap(), None);
}

#[test]
fn test_parent_and_child_index() {
    let mut project = project_with("f(a, b);");
    let file = main_file(&mut project);
    let call = first_of(file, SyntaxKind::CALL_EXPRESSION);
    let list = file.child_syntax_list(call).unwrap().unwrap();

    let args = file.children(list).unwrap();

    assert_eq!(texts(file, &args), vec!["a", ",", "b"]);
    assert_eq!(file.child_index(args[2]).unwrap(), 2);
    assert_eq!(file.parent(args[0]).unwrap(), Some(list));
    assert_eq!(file.parent(list).unwrap(), Some(call));
}

#[test]
fn test_children_include_tokens_and_child_nodes_do_not() {
    let mut project = project_with("if (x) { a(); }");
    let file = main_file(&mut project);
    let if_statement = statements(file)[0];

    let children = file.children(if_statement).unwrap();
    let kinds: Vec<_> = children.iter().map(|id| file.kind(*id).unwrap()).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::IF_KW,
            SyntaxKind::L_PAREN,
            SyntaxKind::IDENT,
            SyntaxKind::R_PAREN,
            SyntaxKind::BLOCK,
        ]
    );

    let nodes = file.child_nodes(if_statement).unwrap();
    assert_eq!(nodes, vec![children[4]]);
}

#[test]
fn test_variants_and_names() {
    let mut project = project_with("function run(x) {}\nimport { a as b } from \"m\";");
    let file = main_file(&mut project);
    let stmts = statements(file);

    assert_eq!(file.variant(stmts[0]).unwrap(), NodeVariant::Declaration);
    assert_eq!(file.variant(stmts[1]).unwrap(), NodeVariant::Statement);
    let name = file.name_node(stmts[0]).unwrap().unwrap();
    assert_eq!(file.text(name).unwrap(), "run");
    assert_eq!(file.variant(name).unwrap(), NodeVariant::Identifier);

    let specifier = first_of(file, SyntaxKind::IMPORT_SPECIFIER);
    let local = file.name_node(specifier).unwrap().unwrap();
    assert_eq!(file.text(local).unwrap(), "b");
    assert!(file.name_node(file.root()).unwrap().is_none());
}

#[test]
fn test_body_statements() {
    let mut project = project_with(IF_WITH_BODY);
    let file = main_file(&mut project);
    let if_statement = statements(file)[1];

    let body = file.statements(if_statement).unwrap();

    assert_eq!(texts(file, &body), vec!["a();", "b();"]);
    let calls = file
        .descendants_of_kind(if_statement, SyntaxKind::CALL_EXPRESSION)
        .unwrap();
    assert_eq!(texts(file, &calls), vec!["a()", "b()"]);
}

#[test]
fn test_node_at_offset() {
    let mut project = project_with("a();  b();");
    let file = main_file(&mut project);

    let a = file.node_at_offset(TextSize::new(0)).unwrap();
    assert_eq!(file.text(a).unwrap(), "a");
    let paren = file.node_at_offset(TextSize::new(1)).unwrap();
    assert_eq!(file.kind(paren).unwrap(), SyntaxKind::L_PAREN);
    let b = file.node_at_offset(TextSize::new(6)).unwrap();
    assert_eq!(file.range(b).unwrap(), TextRange::new(6.into(), 7.into()));
    assert!(file.node_at_offset(TextSize::new(5)).is_none());
}

#[test]
fn test_diagnostics_of_current_text() {
    let mut project = project_with("f(;");
    let file = main_file(&mut project);

    assert!(!file.diagnostics().is_empty());
    let root = file.root();
    file.replace_all_text("f();").unwrap();
    assert!(file.diagnostics().is_empty());
    assert!(!file.is_forgotten(root));
}

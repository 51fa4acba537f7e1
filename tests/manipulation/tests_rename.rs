//! Renames: plain references, shorthand properties and specifiers.

#![allow(clippy::unwrap_used)]

use rstest::rstest;
use treemorph::parser::SyntaxKind;
use treemorph::{EditError, ReconcileError};

use crate::helpers::source_fixtures::SHORTHAND;
use crate::helpers::{ident, main_file, project_with};

#[rstest]
#[case::declaration_and_uses("const a = 1;\na + a;", "const b = 1;\nb + b;")]
#[case::member_name_untouched("const a = 1;\nx.a(a);", "const b = 1;\nx.a(b);")]
#[case::property_name_untouched("const a = 1;\nf({ a: a });", "const b = 1;\nf({ a: b });")]
fn test_rename_text(#[case] text: &str, #[case] expected: &str) {
    let mut project = project_with(text);
    let file = main_file(&mut project);
    let declared = ident(file, "a", 0);

    file.rename(declared, "b").unwrap();

    assert_eq!(file.full_text(), expected);
    assert_eq!(file.text(declared).unwrap(), "b");
}

#[test]
fn test_rename_through_declaration_node() {
    let mut project = project_with("function run() {}\nrun();");
    let file = main_file(&mut project);
    let root = file.root();
    let function = file.statements(root).unwrap()[0];

    file.rename(function, "go").unwrap();

    assert_eq!(file.full_text(), "function go() {}\ngo();");
    assert_eq!(file.kind(function).unwrap(), SyntaxKind::FUNCTION_DECLARATION);
    assert!(!file.is_forgotten(function));
}

#[test]
fn test_rename_expands_shorthand_property() {
    let mut project = project_with(SHORTHAND);
    let file = main_file(&mut project);
    let declared = ident(file, "a", 0);
    let short_name = ident(file, "a", 1);
    let shorthand = file.parent(short_name).unwrap().unwrap();
    assert_eq!(
        file.kind(shorthand).unwrap(),
        SyntaxKind::SHORTHAND_PROPERTY_ASSIGNMENT
    );

    file.rename(declared, "b").unwrap();

    assert_eq!(file.full_text(), "const b = 1;\nconst o = { a: b };");
    assert_eq!(file.text(declared).unwrap(), "b");
    // the identifier now refers to the property's value
    assert_eq!(file.text(short_name).unwrap(), "b");
    let property = file.parent(short_name).unwrap().unwrap();
    assert_eq!(file.kind(property).unwrap(), SyntaxKind::PROPERTY_ASSIGNMENT);
    assert!(file.is_forgotten(shorthand));
}

#[test]
fn test_rename_import_keeps_imported_name() {
    let mut project = project_with("import { a } from \"m\";\na();");
    let file = main_file(&mut project);
    let local = ident(file, "a", 0);
    let specifier = file.parent(local).unwrap().unwrap();

    file.rename(local, "z").unwrap();

    assert_eq!(file.full_text(), "import { a as z } from \"m\";\nz();");
    assert_eq!(file.text(local).unwrap(), "z");
    assert_eq!(file.text(specifier).unwrap(), "a as z");
}

#[test]
fn test_rename_export_keeps_exported_name() {
    let mut project = project_with("const a = 1;\nexport { a };");
    let file = main_file(&mut project);
    let declared = ident(file, "a", 0);
    let exported = ident(file, "a", 1);

    file.rename(declared, "z").unwrap();

    assert_eq!(file.full_text(), "const z = 1;\nexport { z as a };");
    assert_eq!(file.text(exported).unwrap(), "z");
}

#[test]
fn test_rename_to_same_name_changes_nothing() {
    let mut project = project_with(SHORTHAND);
    let file = main_file(&mut project);
    let declared = ident(file, "a", 0);
    let shorthand_name = ident(file, "a", 1);
    let count = file.wrapper_count();

    file.rename(declared, "a").unwrap();

    assert_eq!(file.full_text(), SHORTHAND);
    assert_eq!(file.wrapper_count(), count);
    assert!(!file.is_forgotten(shorthand_name));
}

#[rstest]
#[case::keyword("const")]
#[case::not_an_identifier("1x")]
#[case::two_words("a b")]
fn test_rename_rejects_invalid_names(#[case] name: &str) {
    let mut project = project_with("const a = 1;");
    let file = main_file(&mut project);
    let declared = ident(file, "a", 0);

    let err = file.rename(declared, name).unwrap_err();

    assert!(matches!(err, EditError::Reconcile(ReconcileError::TextEdit(_))));
    assert_eq!(file.full_text(), "const a = 1;");
}

#[test]
fn test_rename_needs_a_name() {
    let mut project = project_with("a();");
    let file = main_file(&mut project);
    let root = file.root();

    let err = file.rename(root, "b").unwrap_err();

    assert!(matches!(err, EditError::Unsupported { kind: SyntaxKind::SOURCE_FILE, .. }));
}

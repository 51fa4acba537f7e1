//! Failed manipulations: what the error carries and what the file keeps.

#![allow(clippy::unwrap_used)]

use std::path::Path;

use treemorph::manipulation::{
    FullReplacementTextManipulator, Orchestrator, StraightReplacementNodeHandler,
};
use treemorph::parser::{OracleError, SyntaxKind};
use treemorph::{EditError, ReconcileError, ScriptParser};

use crate::helpers::{first_of, main_file, project_with, statements};

#[test]
fn test_child_count_mismatch_leaves_text_unchanged() {
    let mut project = project_with("a();\nb();");
    let file = main_file(&mut project);
    statements(file);

    let err = Orchestrator::new(&ScriptParser)
        .perform(
            &mut *file,
            &FullReplacementTextManipulator::new("a();"),
            &mut StraightReplacementNodeHandler,
            None,
        )
        .unwrap_err();

    assert_eq!(
        err.cause,
        ReconcileError::ChildCountMismatch { current: 2, new: 1 }
    );
    assert!(!err.inserted_syntax_error());
    assert_eq!(err.old_text, "a();\nb();");
    assert_eq!(err.new_text, "a();");
    assert_eq!(file.full_text(), "a();\nb();");
}

#[test]
fn test_kind_mismatch_message() {
    let mut project = project_with("a();");
    let file = main_file(&mut project);
    first_of(file, SyntaxKind::CALL_EXPRESSION);

    let err = Orchestrator::new(&ScriptParser)
        .perform(
            &mut *file,
            &FullReplacementTextManipulator::new("(a);"),
            &mut StraightReplacementNodeHandler,
            None,
        )
        .unwrap_err();

    assert!(err.to_string().starts_with(
        "Manipulation error: Error replacing tree! Perhaps a syntax error was inserted \
         (Current: CALL_EXPRESSION -- New: PARENTHESIZED_EXPRESSION)."
    ));
    assert!(err.to_string().contains("-- Details --\nPath: main.ts"));
}

#[test]
fn test_inserted_syntax_error_is_reported() {
    let mut project = project_with("f(a);");
    let file = main_file(&mut project);
    let call = first_of(file, SyntaxKind::CALL_EXPRESSION);

    let err = file.insert_list_element(call, 1, "b c").unwrap_err();

    let manipulation = err.as_manipulation().unwrap();
    assert!(manipulation.inserted_syntax_error());
    assert!(matches!(
        manipulation.cause,
        ReconcileError::ChildCountMismatch { current: 1, .. }
    ));
    let rendered = err.to_string();
    assert!(rendered.contains("A syntax error was inserted."));
    assert!(rendered.contains("main.ts:1:"));
    assert_eq!(manipulation.new_text, "f(a, b c);");
    assert_eq!(file.full_text(), "f(a);");
}

#[test]
fn test_move_to_unsupported_kind_keeps_path() {
    let mut project = project_with("a();");
    let file = main_file(&mut project);
    let root = file.root();

    let err = file.move_to("data.json").unwrap_err();

    let manipulation = err.as_manipulation().unwrap();
    assert!(matches!(
        manipulation.cause,
        ReconcileError::Oracle(OracleError::UnsupportedScriptKind { .. })
    ));
    assert_eq!(file.path(), Path::new("main.ts"));
    assert!(!file.is_forgotten(root));
}

#[test]
fn test_forgotten_handle_fails_before_any_change() {
    let mut project = project_with("a();\nb();");
    let file = main_file(&mut project);
    let b = statements(file)[1];
    file.remove(b).unwrap();

    let err = file.replace_with_text(b, "c();").unwrap_err();

    assert!(matches!(err, EditError::Node(_)));
    assert_eq!(file.full_text(), "a();");
}

//! Wrappers outside an edit keep their identity; wrappers inside it are
//! forgotten.

#![allow(clippy::unwrap_used)]

use rstest::rstest;
use treemorph::parser::SyntaxKind;
use treemorph::{EditError, NodeError, NodeId, SourceFile, TextRange, TextSize};

use crate::helpers::source_fixtures::{FOUR_CALLS, SHORTHAND};
use crate::helpers::{first_of, ident, main_file, project_with, statements, texts};

/// Every live wrapper's range must slice its own text out of the file
fn assert_ranges_match_text(file: &SourceFile, ids: &[NodeId]) {
    for id in ids.iter().filter(|id| !file.is_forgotten(**id)) {
        let range = file.range(*id).unwrap();
        assert_eq!(
            &file.full_text()[range],
            file.text(*id).unwrap(),
            "wrapper out of step with the text at {range:?}"
        );
    }
}

// ============================================================================
// Text edits
// ============================================================================

#[rstest]
#[case::at_start(0, "x();\n", "x();\na();\nb();\nc();\nd();", 0)]
#[case::in_middle(10, "x();\n", "a();\nb();\nx();\nc();\nd();", 2)]
#[case::at_end(19, "\nx();", "a();\nb();\nc();\nd();\nx();", 4)]
fn test_insertion_keeps_every_statement(
    #[case] pos: u32,
    #[case] inserted: &str,
    #[case] expected: &str,
    #[case] new_index: usize,
) {
    let mut project = project_with(FOUR_CALLS);
    let file = main_file(&mut project);
    let before = statements(file);

    file.insert_text(TextSize::new(pos), inserted).unwrap();

    assert_eq!(file.full_text(), expected);
    assert_eq!(
        texts(file, &before),
        vec!["a();", "b();", "c();", "d();"]
    );
    let mut after = statements(file);
    assert_eq!(file.text(after[new_index]).unwrap(), "x();");
    after.remove(new_index);
    assert_eq!(after, before);
}

#[rstest]
#[case::inside_token(1, "X", "aX();")]
#[case::between_tokens(2, "1", "a(1);")]
#[case::before_semicolon(3, "\n", "a()\n;")]
fn test_point_insertion_is_exact(#[case] pos: u32, #[case] inserted: &str, #[case] expected: &str) {
    let mut project = project_with("a();");
    let file = main_file(&mut project);
    let root = file.root();

    file.insert_text(TextSize::new(pos), inserted).unwrap();

    assert_eq!(file.full_text(), expected);
    assert!(!file.is_forgotten(root));
}

#[test]
fn test_replaced_statement_is_forgotten() {
    let mut project = project_with(FOUR_CALLS);
    let file = main_file(&mut project);
    let before = statements(file);

    file.replace_text(TextRange::new(5.into(), 9.into()), "x();")
        .unwrap();

    assert_eq!(file.full_text(), "a();\nx();\nc();\nd();");
    assert!(file.is_forgotten(before[1]));
    assert_eq!(
        file.text(before[1]).unwrap_err(),
        NodeError::Forgotten {
            kind: SyntaxKind::EXPRESSION_STATEMENT
        }
    );
    assert_eq!(texts(file, &[before[0], before[2], before[3]]), vec!["a();", "c();", "d();"]);
}

#[test]
fn test_edit_inside_statement_keeps_it() {
    let mut project = project_with(FOUR_CALLS);
    let file = main_file(&mut project);
    let before = statements(file);

    file.replace_text(TextRange::new(5.into(), 6.into()), "foo")
        .unwrap();

    assert_eq!(file.full_text(), "a();\nfoo();\nc();\nd();");
    assert_eq!(file.text(before[1]).unwrap(), "foo();");
    assert_eq!(statements(file), before);
}

#[rstest]
#[case::tail_of_one_and_head_of_next(5, 11, "x", "a();\nx();", &[0], &[1, 2])]
#[case::joins_two_statements(6, 11, "", "a();\nb();", &[0], &[1, 2])]
#[case::statement_survives_after(1, 6, "", "a();\nc();", &[2], &[0, 1])]
fn test_edit_across_siblings(
    #[case] start: u32,
    #[case] end: u32,
    #[case] text: &str,
    #[case] expected: &str,
    #[case] kept: &[usize],
    #[case] forgotten: &[usize],
) {
    let mut project = project_with("a();\nb();\nc();");
    let file = main_file(&mut project);
    let before = statements(file);

    file.replace_text(TextRange::new(start.into(), end.into()), text)
        .unwrap();

    assert_eq!(file.full_text(), expected);
    for &index in kept {
        assert!(!file.is_forgotten(before[index]));
    }
    for &index in forgotten {
        assert!(file.is_forgotten(before[index]));
    }
    assert_ranges_match_text(file, &before);
}

#[test]
fn test_removed_text_forgets_only_covered_tokens() {
    let mut project = project_with("f(a, b);");
    let file = main_file(&mut project);
    let a = ident(file, "a", 0);
    let b = ident(file, "b", 0);

    file.remove_text(TextRange::new(3.into(), 6.into())).unwrap();

    assert_eq!(file.full_text(), "f(a);");
    assert_eq!(file.text(a).unwrap(), "a");
    assert!(file.is_forgotten(b));
}

#[test]
fn test_out_of_bounds_edit_is_rejected() {
    let mut project = project_with("a();");
    let file = main_file(&mut project);

    let err = file.insert_text(TextSize::new(10), "x").unwrap_err();

    assert!(matches!(err, EditError::RangeOutOfBounds { start: 10, end: 10, len: 4 }));
    assert_eq!(file.full_text(), "a();");
}

// ============================================================================
// Whole-text replacement
// ============================================================================

#[test]
fn test_same_shape_replacement_keeps_wrappers() {
    let mut project = project_with("a();\nb();");
    let file = main_file(&mut project);
    let before = statements(file);

    file.replace_all_text("c();\nd();").unwrap();

    assert_eq!(texts(file, &before), vec!["c();", "d();"]);
}

#[test]
fn test_different_shape_replacement_forgets_all_but_root() {
    let mut project = project_with("a();\nb();");
    let file = main_file(&mut project);
    let root = file.root();
    let before = statements(file);
    let call = first_of(file, SyntaxKind::CALL_EXPRESSION);

    file.replace_all_text("x();").unwrap();

    assert_eq!(file.full_text(), "x();");
    assert!(before.iter().all(|id| file.is_forgotten(*id)));
    assert!(file.is_forgotten(call));
    assert_eq!(file.text(root).unwrap(), "x();");
    let after = statements(file);
    assert_eq!(texts(file, &after), vec!["x();"]);
}

// ============================================================================
// Stale and foreign handles
// ============================================================================

#[test]
fn test_stale_handle_is_rejected_by_edits() {
    let mut project = project_with(FOUR_CALLS);
    let file = main_file(&mut project);
    let before = statements(file);

    file.remove(before[1]).unwrap();
    let err = file.remove(before[1]).unwrap_err();

    assert!(matches!(err, EditError::Node(NodeError::Forgotten { .. })));
    assert_eq!(file.full_text(), "a();\nc();\nd();");
}

#[test]
fn test_handle_of_another_file_is_rejected() {
    let mut project = project_with("a();");
    let other_root = project.add_file("other.ts", "b();").unwrap().root();
    let file = main_file(&mut project);

    let err = file.text(other_root).unwrap_err();

    assert!(matches!(err, NodeError::Foreign { .. }));
}

// ============================================================================
// Edits in a row
// ============================================================================

#[test]
fn test_wrappers_stay_in_step_over_several_edits() {
    let mut project = project_with(FOUR_CALLS);
    let file = main_file(&mut project);
    let before = statements(file);
    let d = ident(file, "d", 0);

    file.insert_text(TextSize::new(0), "x();\n").unwrap();
    file.replace_text(TextRange::new(10.into(), 11.into()), "bee")
        .unwrap();
    file.remove_text(TextRange::new(17.into(), 22.into())).unwrap();

    assert_eq!(file.full_text(), "x();\na();\nbee();\nd();");
    assert_eq!(texts(file, &[before[0], before[1], before[3]]), vec!["a();", "bee();", "d();"]);
    assert!(file.is_forgotten(before[2]));
    assert_eq!(file.range(d).unwrap(), TextRange::new(17.into(), 18.into()));
    let mut all = before.clone();
    all.push(d);
    assert_ranges_match_text(file, &all);
}

#[test]
fn test_expanded_shorthand_follows_later_edits() {
    let mut project = project_with(SHORTHAND);
    let file = main_file(&mut project);
    let declared = ident(file, "a", 0);
    let short_name = ident(file, "a", 1);
    file.rename(declared, "b").unwrap();

    file.insert_text(TextSize::new(0), "x();\n").unwrap();

    assert_eq!(file.full_text(), "x();\nconst b = 1;\nconst o = { a: b };");
    assert!(!file.is_forgotten(short_name));
    assert_eq!(file.range(short_name).unwrap(), TextRange::new(33.into(), 34.into()));
    assert_eq!(file.kind(short_name).unwrap(), SyntaxKind::IDENT);
    let property = file.parent(short_name).unwrap().unwrap();
    assert_eq!(file.kind(property).unwrap(), SyntaxKind::PROPERTY_ASSIGNMENT);
    assert_ranges_match_text(file, &[declared, short_name, property]);
}

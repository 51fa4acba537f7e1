//! Projects: several files, moves and renames across files.

#![allow(clippy::unwrap_used)]

use std::path::Path;

use treemorph::{EditError, Project};

use crate::helpers::ident;
use crate::helpers::source_fixtures::{EXPORTER, IMPORTER};

fn two_file_project() -> Project {
    let mut project = Project::new();
    project.add_file("a.ts", EXPORTER).unwrap();
    project.add_file("b.ts", IMPORTER).unwrap();
    project.add_file("c.ts", "other();").unwrap();
    project
}

#[test]
fn test_rename_across_files() {
    let mut project = two_file_project();
    let declared = ident(project.file_mut("a.ts").unwrap(), "a", 0);
    let b = project.file_mut("b.ts").unwrap();
    let imported = ident(b, "a", 0);
    let called = ident(b, "a", 1);
    let untouched = ident(project.file_mut("c.ts").unwrap(), "other", 0);

    project.rename("a.ts", declared, "z").unwrap();

    let a = project.file("a.ts").unwrap();
    assert_eq!(a.full_text(), "export const z = 1;");
    assert_eq!(a.text(declared).unwrap(), "z");

    let b = project.file("b.ts").unwrap();
    assert_eq!(b.full_text(), "import { z } from \"./a\";\nz();");
    assert_eq!(b.text(imported).unwrap(), "z");
    assert_eq!(b.text(called).unwrap(), "z");

    let c = project.file("c.ts").unwrap();
    assert_eq!(c.full_text(), "other();");
    assert!(!c.is_forgotten(untouched));
}

#[test]
fn test_rename_in_unknown_file() {
    let mut project = two_file_project();
    let declared = ident(project.file_mut("a.ts").unwrap(), "a", 0);

    let err = project.rename("missing.ts", declared, "z").unwrap_err();

    assert!(matches!(err, EditError::FileNotFound(_)));
    assert_eq!(project.file("a.ts").unwrap().full_text(), EXPORTER);
}

#[test]
fn test_move_keeps_wrappers() {
    let mut project = two_file_project();
    let declared = ident(project.file_mut("a.ts").unwrap(), "a", 0);

    project.move_file("a.ts", "lib/a.js").unwrap();

    let moved = project.file("lib/a.js").unwrap();
    assert_eq!(moved.path(), Path::new("lib/a.js"));
    assert_eq!(moved.script_kind(), treemorph::ScriptKind::Js);
    assert_eq!(moved.text(declared).unwrap(), "a");
    let order: Vec<_> = project.files().map(|file| file.path().to_path_buf()).collect();
    assert_eq!(order[0], Path::new("lib/a.js"));
}

#[test]
fn test_failed_move_keeps_file_in_place() {
    let mut project = two_file_project();

    let err = project.move_file("a.ts", "a.json").unwrap_err();

    assert!(err.as_manipulation().is_some());
    assert!(project.file("a.json").is_none());
    let file = project.file("a.ts").unwrap();
    assert_eq!(file.path(), Path::new("a.ts"));
    assert_eq!(file.full_text(), EXPORTER);
}

#[test]
fn test_move_onto_existing_file_is_rejected() {
    let mut project = two_file_project();

    let err = project.move_file("a.ts", "b.ts").unwrap_err();

    assert!(matches!(err, EditError::FileExists(_)));
    assert_eq!(project.file("b.ts").unwrap().full_text(), IMPORTER);
}

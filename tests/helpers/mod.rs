//! Shared fixtures and lookups for the integration tests.

#![allow(dead_code)]

pub mod source_fixtures;

use treemorph::parser::SyntaxKind;
use treemorph::{NodeId, Project, SourceFile};

pub const MAIN: &str = "main.ts";

/// A project holding one file, `main.ts`, with `text`
pub fn project_with(text: &str) -> Project {
    let mut project = Project::new();
    project.add_file(MAIN, text).unwrap();
    project
}

pub fn main_file(project: &mut Project) -> &mut SourceFile {
    project.file_mut(MAIN).unwrap()
}

/// Wrappers of the root statements, in order
pub fn statements(file: &mut SourceFile) -> Vec<NodeId> {
    let root = file.root();
    file.statements(root).unwrap()
}

/// The `nth` identifier spelled `name`, in document order
pub fn ident(file: &mut SourceFile, name: &str, nth: usize) -> NodeId {
    let root = file.root();
    let idents = file.descendants_of_kind(root, SyntaxKind::IDENT).unwrap();
    idents
        .into_iter()
        .filter(|id| file.text(*id).unwrap() == name)
        .nth(nth)
        .unwrap_or_else(|| panic!("no identifier #{nth} named {name:?}"))
}

pub fn first_of(file: &mut SourceFile, kind: SyntaxKind) -> NodeId {
    let root = file.root();
    file.first_descendant_of_kind(root, kind)
        .unwrap()
        .unwrap_or_else(|| panic!("no {kind:?} in {:?}", file.full_text()))
}

/// Texts of the given wrappers
pub fn texts(file: &SourceFile, ids: &[NodeId]) -> Vec<String> {
    ids.iter().map(|id| file.text(*id).unwrap()).collect()
}

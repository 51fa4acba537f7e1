//! Project level tests: several files, moves and cross-file renames.

pub mod tests_navigation;
pub mod tests_project;

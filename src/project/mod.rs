//! Project: the set of source files being edited together.
//!
//! Each [`SourceFile`] owns its text, its current tree and the cache of
//! wrappers handed out for it. Files are keyed by path; a move re-keys the
//! file only once the manipulation behind it succeeded.

mod error;
mod source_file;

pub use error::EditError;
pub use source_file::{BeforeModifyHook, SourceFile};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::base::FileId;
use crate::manipulation::ManipulationSettings;
use crate::parser::{ParserOracle, ScriptParser};
use crate::wrapper::NodeId;

pub struct Project {
    files: IndexMap<PathBuf, SourceFile>,
    oracle: Arc<dyn ParserOracle>,
    settings: ManipulationSettings,
    next_file: u32,
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("files", &self.files.keys().collect::<Vec<_>>())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl Project {
    /// A project parsing with the built-in [`ScriptParser`]
    pub fn new() -> Self {
        Self::with_oracle(Arc::new(ScriptParser))
    }

    pub fn with_oracle(oracle: Arc<dyn ParserOracle>) -> Self {
        Self {
            files: IndexMap::new(),
            oracle,
            settings: ManipulationSettings::default(),
            next_file: 0,
        }
    }

    pub fn with_settings(mut self, settings: ManipulationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &ManipulationSettings {
        &self.settings
    }

    pub fn add_file(
        &mut self,
        path: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> Result<&mut SourceFile, EditError> {
        let path = path.into();
        if self.files.contains_key(&path) {
            return Err(EditError::FileExists(path));
        }
        let id = FileId::new(self.next_file);
        let file = SourceFile::new(
            id,
            path.clone(),
            text,
            Arc::clone(&self.oracle),
            self.settings.clone(),
        )?;
        self.next_file += 1;
        info!(path = %path.display(), %id, "added source file");
        Ok(self.files.entry(path).or_insert(file))
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<&SourceFile> {
        self.files.get(path.as_ref())
    }

    pub fn file_mut(&mut self, path: impl AsRef<Path>) -> Option<&mut SourceFile> {
        self.files.get_mut(path.as_ref())
    }

    fn require_mut(&mut self, path: &Path) -> Result<&mut SourceFile, EditError> {
        self.files
            .get_mut(path)
            .ok_or_else(|| EditError::FileNotFound(path.to_path_buf()))
    }

    /// Files in insertion order
    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.values()
    }

    /// Drop a file; every wrapper handed out for it is forgotten
    pub fn remove_file(&mut self, path: impl AsRef<Path>) -> Option<SourceFile> {
        let mut file = self.files.shift_remove(path.as_ref())?;
        file.forget();
        debug!(path = %file.path().display(), "removed source file");
        Some(file)
    }

    /// Move a file to `to`; on failure the file stays at `from`
    pub fn move_file(
        &mut self,
        from: impl AsRef<Path>,
        to: impl Into<PathBuf>,
    ) -> Result<(), EditError> {
        let from = from.as_ref();
        let to = to.into();
        if self.files.contains_key(&to) {
            return Err(EditError::FileExists(to));
        }
        self.require_mut(from)?.move_to(to.clone())?;
        if let Some(index) = self.files.get_index_of(from) {
            if let Some((_, file)) = self.files.shift_remove_index(index) {
                self.files.shift_insert(index, to.clone(), file);
            }
        }
        info!(from = %from.display(), to = %to.display(), "moved source file");
        Ok(())
    }

    /// Rename the symbol named by `id` (a wrapper of the file at `path`) in
    /// every file that mentions it. Other files rename their import and
    /// export specifiers outright. Files are edited one at a time; an error
    /// stops the rename with earlier files already changed.
    pub fn rename(
        &mut self,
        path: impl AsRef<Path>,
        id: NodeId,
        new_name: &str,
    ) -> Result<(), EditError> {
        let path = path.as_ref();
        let name = self.require_mut(path)?.name_text(id)?;
        if name == new_name {
            return Ok(());
        }
        for file in self.files.values_mut() {
            let is_origin = file.path() == path;
            let locations = file.rename_locations(&name, is_origin);
            if locations.is_empty() {
                continue;
            }
            debug!(
                path = %file.path().display(),
                count = locations.len(),
                "renaming in file"
            );
            file.apply_rename(locations, new_name)?;
        }
        Ok(())
    }
}

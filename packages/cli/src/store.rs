//! File-backed draft/publish store

use pagecraft_editor::{DraftStore, EditorError, ExportedDocument};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Editor(#[from] EditorError),
}

/// Writes `<name>.json` into a draft directory or a publish directory
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    name: String,
    draft_dir: PathBuf,
    publish_dir: PathBuf,
}

impl FileDraftStore {
    pub fn new(name: impl Into<String>, draft_dir: PathBuf, publish_dir: PathBuf) -> Self {
        Self {
            name: name.into(),
            draft_dir,
            publish_dir,
        }
    }

    pub fn draft_path(&self) -> PathBuf {
        self.draft_dir.join(format!("{}.json", self.name))
    }

    pub fn publish_path(&self) -> PathBuf {
        self.publish_dir.join(format!("{}.json", self.name))
    }

    fn write(&self, path: &Path, document: &ExportedDocument) -> Result<(), StoreError> {
        let json = document.to_json()?;
        let io_err = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, json).map_err(io_err)?;

        tracing::debug!(path = %path.display(), "document written");
        Ok(())
    }
}

impl DraftStore for FileDraftStore {
    type Error = StoreError;

    fn save_draft(&self, document: &ExportedDocument) -> Result<(), Self::Error> {
        self.write(&self.draft_path(), document)
    }

    fn publish(&self, document: &ExportedDocument) -> Result<(), Self::Error> {
        self.write(&self.publish_path(), document)
    }
}

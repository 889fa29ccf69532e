//! Writes exports to disk under their fixed file names.

use orc_core::error::Result;
use orc_core::export::ExportKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ExportWriter {
    dir: PathBuf,
}

impl ExportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `content` as the whole file for `kind`, replacing any previous
    /// export, and returns the written path.
    pub fn write(&self, kind: ExportKind, content: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(kind.file_name());
        std::fs::write(&path, content)?;
        tracing::info!("Exported {} to {:?}", kind, path);
        Ok(path)
    }
}

//! File-backed key-value store for the persisted session entries.

use super::atomic_toml::AtomicTomlFile;
use orc_core::error::Result;
use orc_core::storage::KeyValueStore;
use std::collections::BTreeMap;
use std::path::PathBuf;

type Entries = BTreeMap<String, String>;

/// Stores string entries in a single TOML table.
///
/// Every `set`/`remove` is a locked read-modify-write of the whole file, so
/// entries written by another process are preserved.
pub struct TomlKeyValueStore {
    file: AtomicTomlFile<Entries>,
}

impl TomlKeyValueStore {
    pub fn new(path: PathBuf) -> Self {
        tracing::debug!("Using state file {:?}", path);
        Self {
            file: AtomicTomlFile::new(path),
        }
    }
}

impl KeyValueStore for TomlKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.file.load()?.unwrap_or_default();
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.file.update(Entries::new(), |entries| {
            entries.insert(key.to_string(), value.to_string());
            Ok(())
        })?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if !self.file.path().exists() {
            return Ok(());
        }
        self.file.update(Entries::new(), |entries| {
            entries.remove(key);
            Ok(())
        })?;
        Ok(())
    }
}

//! Storage layer for atomic file operations.

mod atomic_toml;
mod toml_kv_store;

pub use atomic_toml::{AtomicTomlError, AtomicTomlFile};
pub use toml_kv_store::TomlKeyValueStore;

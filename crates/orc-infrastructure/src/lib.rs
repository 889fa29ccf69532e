//! Infrastructure layer: paths, file-backed storage, configuration and exports.

pub mod config_service;
pub mod export_writer;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::export_writer::ExportWriter;
pub use crate::paths::OrcPaths;
pub use crate::storage::TomlKeyValueStore;

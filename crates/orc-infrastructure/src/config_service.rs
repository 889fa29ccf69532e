//! Configuration service.
//!
//! Loads `ClientConfig` from `config.toml` in the config directory and applies
//! the `ORC_BASE_URL` environment override.

use crate::paths::OrcPaths;
use orc_core::config::ClientConfig;
use orc_core::error::Result;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Environment variable overriding the remote service base URL.
pub const BASE_URL_ENV: &str = "ORC_BASE_URL";

/// Loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: OrcPaths,
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    pub fn new(paths: OrcPaths) -> Self {
        Self {
            paths,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the configuration, loading it on first access.
    ///
    /// A missing `config.toml` yields the defaults; a malformed one is an error.
    pub fn get_config(&self) -> Result<ClientConfig> {
        if let Ok(read_lock) = self.config.read()
            && let Some(cached) = read_lock.as_ref()
        {
            return Ok(cached.clone());
        }

        let file_config = self.load_file()?;
        let config = apply_env_override(file_config, std::env::var(BASE_URL_ENV).ok());

        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(config.clone());
        }

        Ok(config)
    }

    /// Resolves the state file: configured path, else `state.toml` in the
    /// config directory.
    pub fn state_file(&self, config: &ClientConfig) -> Result<PathBuf> {
        match &config.state_file {
            Some(path) => Ok(path.clone()),
            None => Ok(self.paths.state_file()?),
        }
    }

    fn load_file(&self) -> Result<ClientConfig> {
        let path = self.paths.config_file()?;
        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Ok(ClientConfig::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }
}

fn apply_env_override(config: ClientConfig, base_url: Option<String>) -> ClientConfig {
    match base_url.filter(|url| !url.trim().is_empty()) {
        Some(url) => config.with_base_url(url.trim()),
        None => config,
    }
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Endpoint used when no configuration overrides it.
pub const DEFAULT_BASE_URL: &str = "https://ruby-api.kevinzonda.com";

/// Client configuration, stored as `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the remote compiler service, without the `/ruby/...` path.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Where `code`/`taskId` are persisted. Defaults to `state.toml` in the
    /// config directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
    /// Directory exports are written to. Defaults to the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            state_file: None,
            export_dir: None,
        }
    }
}

impl ClientConfig {
    /// Overrides the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_partial_toml() {
        let config: ClientConfig =
            toml::from_str("base_url = \"http://localhost:8080\"\nexport_dir = \"/tmp/out\"")
                .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/out")));
        assert!(config.state_file.is_none());
    }
}

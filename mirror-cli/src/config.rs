//! Configuration for mirror-cli.
//!
//! ```toml
//! [remote]
//! name = "home"
//! address = "wss://relay.example:9000/api"
//!
//! [mirror]
//! sync_colors = "weechat"
//! buffer_name_prefix = "remote"
//! max_nicklist_depth = 64
//! ```
//!
//! Every key is optional.

use relay_mirror_core::MirrorConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// The remote being mirrored.
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Reconciliation tunables.
    #[serde(default)]
    pub mirror: MirrorConfig,
}

/// Remote identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteConfig {
    /// Local name of the remote (default: `remote`).
    #[serde(default = "default_remote_name")]
    pub name: String,
    /// Relay API address (default: `mock://replay`).
    #[serde(default = "default_address")]
    pub address: String,
}

fn default_remote_name() -> String {
    "remote".to_string()
}

fn default_address() -> String {
    "mock://replay".to_string()
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            name: default_remote_name(),
            address: default_address(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load from `path` if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}

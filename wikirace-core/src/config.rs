use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use wikirace_client::ClientOptions;

pub const DEFAULT_CONFIG_DIR: &str = "~/.config/wikirace/";
pub const CONFIG_FILE_NAME: &str = "config.json";
/// Algorithm preselected in the form when nothing else is given. The backend
/// decides which names it accepts.
pub const DEFAULT_ALGORITHM: &str = "BFS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration in {path}: {source}")]
    Format {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{0} already exists (use --force to overwrite)")]
    AlreadyExists(PathBuf),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    #[serde(flatten)]
    pub client: ClientOptions,
    pub default_algorithm: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client: ClientOptions::default(),
            default_algorithm: DEFAULT_ALGORITHM.to_string(),
        }
    }
}

impl ClientConfig {
    /// Read `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Format {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write to `path`, creating parent directories. Refuses to replace an
    /// existing file unless `force` is set.
    pub fn save(&self, path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_endpoint(mut self, endpoint: Option<&str>) -> Self {
        if let Some(endpoint) = endpoint {
            self.client.endpoint = endpoint.to_string();
        }
        self
    }

    pub fn with_timeout(mut self, timeout_secs: Option<u64>) -> Self {
        if timeout_secs.is_some() {
            self.client.timeout_secs = timeout_secs;
        }
        self
    }
}

/// Expand `~` in a configuration directory and append the file name.
pub fn config_file_in(dir: &str) -> PathBuf {
    let expanded = shellexpand::tilde(dir);
    Path::new(expanded.as_ref()).join(CONFIG_FILE_NAME)
}

pub fn default_config_path() -> PathBuf {
    config_file_in(DEFAULT_CONFIG_DIR)
}

//! Project configuration stored in `.grove/config.json`.

use grove_indexer::{IndexOptions, DEFAULT_IGNORE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_DIR: &str = ".grove";
pub const CONFIG_FILE: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed config {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings for one project. Every field falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroveConfig {
    pub version: String,
    /// Depth for relatedness queries when none is given.
    pub max_depth: usize,
    /// Directory names skipped while indexing.
    pub ignore: Vec<String>,
    pub server: ServerSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for GroveConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            max_depth: 2,
            ignore: DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect(),
            server: ServerSection::default(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7432,
        }
    }
}

impl GroveConfig {
    /// Path of the config file for a project root.
    pub fn path_for(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Loads the project config, or defaults when there is none.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = Self::path_for(root);
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Malformed { path, source })
    }

    /// Writes this config under `root`, creating `.grove/` if needed.
    pub fn write(&self, root: &Path) -> Result<PathBuf, ConfigError> {
        let path = Self::path_for(root);
        let io_err = |source| ConfigError::Io {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(root.join(CONFIG_DIR)).map_err(io_err)?;
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Malformed {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(io_err)?;

        Ok(path)
    }

    pub fn index_options(&self) -> IndexOptions {
        IndexOptions {
            ignore: self.ignore.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = GroveConfig::load(dir.path()).unwrap();

        assert_eq!(config, GroveConfig::default());
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.server.port, 7432);
        assert!(config.ignore.contains(&"target".to_string()));
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempdir().unwrap();
        let mut config = GroveConfig::default();
        config.max_depth = 4;
        config.ignore = vec!["generated".into()];

        let path = config.write(dir.path()).unwrap();
        assert!(path.ends_with(".grove/config.json"));

        let loaded = GroveConfig::load(dir.path()).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.index_options().ignore, vec!["generated"]);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(CONFIG_DIR)).unwrap();
        fs::write(
            GroveConfig::path_for(dir.path()),
            r#"{"max_depth": 3, "server": {"port": 9000}}"#,
        )
        .unwrap();

        let config = GroveConfig::load(dir.path()).unwrap();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.version, "1.0");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(CONFIG_DIR)).unwrap();
        fs::write(GroveConfig::path_for(dir.path()), "{ not json").unwrap();

        let err = GroveConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }
}

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ingestion::ttrpg::{ContentKind, ImportOptions};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub import: ImportConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Parser defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Strip a leading tradition word from creature spell entries.
    pub normalize_traditions: bool,
    /// Content kind used when none is given on the command line.
    pub default_kind: ContentKind,
}

/// Record output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print each record.
    pub pretty: bool,
    /// Destination folder id attached to every record.
    pub folder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            normalize_traditions: true,
            default_kind: ContentKind::Creature,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            folder: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/sotdl-import/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        if !config_path.exists() {
            log::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Self::default();
        }

        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit path, reporting any failure.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parser options with the command-line override applied.
    pub fn import_options(&self, no_clean_traditions: bool) -> ImportOptions {
        ImportOptions {
            normalize_traditions: self.import.normalize_traditions && !no_clean_traditions,
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("sotdl-import").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

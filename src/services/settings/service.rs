use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;

use crate::models::settings::TimelineConfig;

const CONFIG_FILE: &str = "timeline.toml";

/// Failures reading or writing the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Loads and stores [`TimelineConfig`] as TOML.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Per-user config location, e.g. `~/.config/resource-timeline/timeline.toml`.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "ResourceTimeline", "ResourceTimeline")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Service for the per-user location, falling back to the working directory.
    pub fn from_default_location() -> Self {
        Self::new(Self::default_path().unwrap_or_else(|| PathBuf::from(CONFIG_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the config. A missing file yields the defaults.
    pub fn load(&self) -> Result<TimelineConfig, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!(
                    "No config at {}, using defaults",
                    self.path.display()
                );
                return Ok(TimelineConfig::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let config: TimelineConfig = toml::from_str(&text)?;
        log::debug!("Loaded timeline config from {}", self.path.display());
        Ok(config)
    }

    /// Write the config, creating parent directories as needed.
    pub fn save(&self, config: &TimelineConfig) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(config)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, text).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

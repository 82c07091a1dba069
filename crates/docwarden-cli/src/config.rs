//! Configuration loading
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. TOML file (`<config_dir>/docwarden/config.toml` unless overridden)
//! 3. `DOCWARDEN_*` environment variables, `__` separating nested keys
//!    (e.g. `DOCWARDEN_STORAGE__DATA_DIR`, `DOCWARDEN_ENGINE__WARNING_WINDOW_DAYS`)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use docwarden_application::EngineSettings;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Where records and files are kept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("docwarden"),
        }
    }
}

impl StorageConfig {
    /// JSON snapshot of organizations, members and documents
    pub fn records_path(&self) -> PathBuf {
        self.data_dir.join("records.json")
    }

    /// Directory holding uploaded document files
    pub fn files_dir(&self) -> PathBuf {
        self.data_dir.join("files")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when no verbosity flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Complete CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocWardenConfig {
    pub engine: EngineSettings,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Configuration manager
pub struct ConfigManager {
    /// Configuration file path
    config_path: PathBuf,
    /// Environment prefix
    env_prefix: String,
}

impl ConfigManager {
    /// Create a new configuration manager
    pub fn new() -> Self {
        Self::with_path(Self::default_config_path())
    }

    /// Create with custom config path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            env_prefix: "DOCWARDEN".to_string(),
        }
    }

    /// Override the environment variable prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Get default config path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docwarden")
            .join("config.toml")
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load and validate the configuration
    pub fn load_config(&self) -> Result<DocWardenConfig, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(self.config_path.clone()).required(false))
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: DocWardenConfig = builder.build()?.try_deserialize()?;
        self.validate_config(&config)?;
        Ok(config)
    }

    /// Write the configuration as TOML, creating the parent directory
    pub fn save_config(&self, config: &DocWardenConfig) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(config)?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.config_path, toml)?;
        Ok(())
    }

    pub fn validate_config(&self, config: &DocWardenConfig) -> Result<(), ConfigError> {
        if config.engine.warning_window_days == 0 {
            return Err(ConfigError::Validation(
                "engine.warning_window_days must be greater than 0".to_string(),
            ));
        }
        if config.engine.dashboard_window_days < config.engine.warning_window_days {
            return Err(ConfigError::Validation(
                "engine.dashboard_window_days must be at least engine.warning_window_days"
                    .to_string(),
            ));
        }
        if config.storage.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "storage.data_dir must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use eggtally_core::sync::DEFAULT_BASE_URL;
use eggtally_core::DEFAULT_TRAY_VALUE;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Collection backend settings
#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub base_url: ConfigValue<String>,
    /// Request timeout in seconds; none means the client default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<ConfigValue<u64>>,
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the state snapshots
    pub data_dir: ConfigValue<PathBuf>,
    /// Eggs per tray when no aviary is selected
    pub default_tray_value: ConfigValue<u32>,
    pub api: ApiConfig,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ApiFile {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    default_tray_value: Option<u32>,
    api: Option<ApiFile>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut default_tray_value = ConfigValue::new(DEFAULT_TRAY_VALUE, ConfigSource::Default);
        let mut base_url = ConfigValue::new(DEFAULT_BASE_URL.to_string(), ConfigSource::Default);
        let mut timeout_secs: Option<ConfigValue<u64>> = None;
        let mut config_file = None;

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Relative to the config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(value) = file_config.default_tray_value {
                default_tray_value = ConfigValue::new(value, ConfigSource::File);
            }
            if let Some(api) = file_config.api {
                if let Some(url) = api.base_url {
                    base_url = ConfigValue::new(url, ConfigSource::File);
                }
                timeout_secs = api
                    .timeout_secs
                    .map(|secs| ConfigValue::new(secs, ConfigSource::File));
            }
        }

        // Apply environment variable overrides
        if let Ok(dir) = std::env::var("TALLY_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(raw) = std::env::var("TALLY_DEFAULT_TRAY_VALUE") {
            let value = parse_env("TALLY_DEFAULT_TRAY_VALUE", &raw)?;
            default_tray_value = ConfigValue::new(value, ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("TALLY_API_URL") {
            base_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Ok(raw) = std::env::var("TALLY_API_TIMEOUT") {
            let secs = parse_env("TALLY_API_TIMEOUT", &raw)?;
            timeout_secs = Some(ConfigValue::new(secs, ConfigSource::Environment));
        }

        if default_tray_value.value == 0 {
            return Err(ConfigError::InvalidValue(
                "default_tray_value".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        if timeout_secs.as_ref().is_some_and(|t| t.value == 0) {
            return Err(ConfigError::InvalidValue(
                "api.timeout_secs".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            data_dir,
            default_tray_value,
            api: ApiConfig {
                base_url,
                timeout_secs,
            },
            config_file,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/eggtally/
    /// - macOS: ~/Library/Application Support/eggtally/
    /// - Windows: %APPDATA%/eggtally/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("eggtally")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/eggtally/
    /// - macOS: ~/Library/Application Support/eggtally/
    /// - Windows: %APPDATA%/eggtally/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("eggtally")
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name.to_string(), format!("'{}' is not a number", raw)))
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(String, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(name, reason) => {
                write!(f, "Invalid value for {}: {}", name, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

use mdbatch_engine::compile::{
    DEFAULT_INITIAL_OFFSET, DEFAULT_MONOSPACE_FONT, DEFAULT_ORDERED_PRESET,
    DEFAULT_UNORDERED_PRESET,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://docs.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read access token from {token_path}: {source}")]
    TokenReadError {
        token_path: PathBuf,
        source: std::io::Error,
    },
}

/// Where and how to reach the Document Update Service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
    /// File holding an OAuth access token, used when none is given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_file: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_file: None,
        }
    }
}

/// Defaults for compilation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    pub initial_offset: usize,
    pub monospace_font: String,
    pub ordered_preset: String,
    pub unordered_preset: String,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            initial_offset: DEFAULT_INITIAL_OFFSET,
            monospace_font: DEFAULT_MONOSPACE_FONT.to_string(),
            ordered_preset: DEFAULT_ORDERED_PRESET.to_string(),
            unordered_preset: DEFAULT_UNORDERED_PRESET.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub compile: CompileConfig,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the token file path
        if let Some(token_file) = config.service.token_file.take() {
            config.service.token_file =
                Some(Self::expand_path(&token_file).unwrap_or(token_file));
        }

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Loads the config file at `path` (or the default location), falling back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let loaded = match path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::load()?,
        };
        Ok(loaded.unwrap_or_default())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/mdbatch");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Reads the access token from the configured token file, if any.
    pub fn read_token(&self) -> Result<Option<String>, ConfigError> {
        let Some(token_path) = &self.service.token_file else {
            return Ok(None);
        };
        let token = std::fs::read_to_string(token_path).map_err(|source| {
            ConfigError::TokenReadError {
                token_path: token_path.clone(),
                source,
            }
        })?;
        let token = token.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

use super::interpolation::{
    interpolate_toml,
    InterpolationError,
};
use super::schema::RunboardConfig;

pub const CONFIG_PATH_ENV: &str = "RUNBOARD_CONFIG_PATH";
pub const BASE_URL_ENV: &str = "RUNBOARD_BASE_URL";
pub const BIND_ADDR_ENV: &str = "RUNBOARD_BIND_ADDR";
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Environment variable interpolation failed: {0}")]
    InterpolationError(#[from] InterpolationError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type ConfigLoadResult<T> = Result<T, ConfigLoadError>;

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn discover_config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            tracing::debug!("Using config path from {}: {}", CONFIG_PATH_ENV, path);
            return PathBuf::from(path);
        }

        let path = RunboardConfig::default_config_path();
        tracing::debug!("Using default config path: {}", path.display());
        path
    }

    pub fn load(path: &Path) -> ConfigLoadResult<RunboardConfig> {
        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Loads the file if there is one, otherwise starts from defaults. Either
    /// way the environment overrides are applied last.
    pub fn load_or_default(path: &Path) -> ConfigLoadResult<RunboardConfig> {
        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            tracing::debug!(
                path = %path.display(),
                "No config file found, using defaults"
            );
            RunboardConfig::default()
        };

        Self::apply_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn parse(content: &str) -> ConfigLoadResult<RunboardConfig> {
        let mut value: toml::Value = toml::from_str(content)?;

        interpolate_toml(&mut value)?;

        let config: RunboardConfig = value.try_into().map_err(|e| {
            ConfigLoadError::InvalidConfig(format!("Failed to deserialize config: {}", e))
        })?;

        tracing::debug!(
            base_url = %config.client.base_url,
            plugin_id = %config.client.plugin_id,
            "Loaded config"
        );

        Ok(config)
    }

    pub fn apply_overrides<F>(config: &mut RunboardConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.client.base_url = base_url;
        }

        if let Some(bind_addr) = lookup(BIND_ADDR_ENV).filter(|v| !v.trim().is_empty()) {
            config.server.bind_addr = bind_addr;
        }

        let token_missing = config
            .github
            .token
            .as_deref()
            .map_or(true, |t| t.trim().is_empty());
        if token_missing {
            if let Some(token) = lookup(GITHUB_TOKEN_ENV).filter(|v| !v.trim().is_empty()) {
                config.github.token = Some(token);
            }
        }
    }
}

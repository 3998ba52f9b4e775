// src/config.rs
use thiserror::Error;

use crate::services::gemini::DEFAULT_API_BASE;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MODEL: &str = "gemini-pro";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub api_key: String,
    pub port: u16,
    pub default_model: String,
    pub api_base: String,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("GEMINI_API_KEY").ok_or(ConfigError::MissingApiKey)?;

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            api_key,
            port,
            default_model: get("GEMINI_DEFAULT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: get("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        })
    }
}

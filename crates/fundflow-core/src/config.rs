use std::path::PathBuf;

use thiserror::Error;

use crate::adapters::mfapi::DEFAULT_BASE_URL;
use crate::store::DEFAULT_DATA_FILE;

pub const ENV_BASE_URL: &str = "FUNDFLOW_MFAPI_BASE_URL";
pub const ENV_DATA_FILE: &str = "FUNDFLOW_DATA_FILE";
pub const ENV_LOOKBACK_DAYS: &str = "FUNDFLOW_LOOKBACK_DAYS";
pub const ENV_TIMEOUT_MS: &str = "FUNDFLOW_TIMEOUT_MS";

/// Three calendar years.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 1_095;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Runtime settings for the loader and its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundflowConfig {
    pub base_url: String,
    pub data_file: PathBuf,
    /// Observations older than `latest - lookback_days` are dropped; `0` keeps all.
    pub lookback_days: u32,
    pub timeout_ms: u64,
}

impl Default for FundflowConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl FundflowConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_BASE_URL) {
            config.base_url = non_empty(ENV_BASE_URL, value)?;
        }
        if let Some(value) = lookup(ENV_DATA_FILE) {
            config.data_file = PathBuf::from(non_empty(ENV_DATA_FILE, value)?);
        }
        if let Some(value) = lookup(ENV_LOOKBACK_DAYS) {
            config.lookback_days = parse_number(ENV_LOOKBACK_DAYS, &value)?;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_MS) {
            config.timeout_ms = parse_number(ENV_TIMEOUT_MS, &value)?;
        }

        Ok(config)
    }
}

fn non_empty(var: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Empty { var });
    }
    Ok(trimmed.to_owned())
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            var,
            value: value.to_owned(),
        })
}

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use client_core::{ClientSettings, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT};
use thiserror::Error;

pub const CONFIG_FILE: &str = "admin.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{key} must be a positive integer, got '{value}'")]
    InvalidNumber { key: String, value: String },
}

/// Defaults, then the config file if it exists, then the environment.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg = parse_file(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
            settings.apply_file(&file_cfg)?;
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    settings.apply_env(|key| std::env::var(key).ok())?;
    Ok(settings)
}

/// Flat `key = value` table; numbers may be written bare or quoted.
fn parse_file(raw: &str) -> Result<HashMap<String, String>, toml::de::Error> {
    let table = toml::from_str::<HashMap<String, toml::Value>>(raw)?;
    Ok(table
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                toml::Value::String(s) => s,
                toml::Value::Integer(n) => n.to_string(),
                _ => return None,
            };
            Some((key, value))
        })
        .collect())
}

impl Settings {
    fn apply_file(&mut self, file_cfg: &HashMap<String, String>) -> Result<(), ConfigError> {
        if let Some(v) = file_cfg.get("api_base_url") {
            self.api_base_url = v.clone();
        }
        if let Some(v) = file_cfg.get("request_timeout_secs") {
            self.request_timeout_secs = positive("request_timeout_secs", v)?;
        }
        if let Some(v) = file_cfg.get("page_size") {
            self.page_size = positive("page_size", v)?;
        }
        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(v) = var("API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = var("APP__API_BASE_URL") {
            self.api_base_url = v;
        }

        if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = positive("APP__REQUEST_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = var("APP__PAGE_SIZE") {
            self.page_size = positive("APP__PAGE_SIZE", &v)?;
        }
        Ok(())
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.api_base_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            page_size: self.page_size,
        }
    }
}

fn positive<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(ConfigError::InvalidNumber {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

//! # Service Configuration
//!
//! [`AppConfig`] is read once at startup from environment variables:
//!
//! | Variable                 | Default | Meaning                                   |
//! |--------------------------|---------|-------------------------------------------|
//! | `PORT`                   | `8080`  | HTTP listen port                          |
//! | `DATABASE_URL`           | unset   | Postgres URL; unset means in-memory store |
//! | `LOG_FORMAT`             | `text`  | `text` or `json`                          |
//! | `AGRO_SLOW_OPERATION_MS` | `1000`  | Mutations slower than this are recorded   |

use std::str::FromStr;

use thiserror::Error;

/// Diagnostic log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::Invalid {
                var: "LOG_FORMAT",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Application configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub log_format: LogFormat,
    pub slow_operation_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
            .field("log_format", &self.log_format)
            .field("slow_operation_ms", &self.slow_operation_ms)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: None,
            log_format: LogFormat::Text,
            slow_operation_ms: 1000,
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                value: raw,
            })?,
            None => defaults.port,
        };
        let log_format = match get("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => defaults.log_format,
        };
        let slow_operation_ms = match get("AGRO_SLOW_OPERATION_MS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "AGRO_SLOW_OPERATION_MS",
                value: raw,
            })?,
            None => defaults.slow_operation_ms,
        };

        Ok(Self {
            port,
            database_url: get("DATABASE_URL"),
            log_format,
            slow_operation_ms,
        })
    }
}

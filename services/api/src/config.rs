//! Service configuration
//!
//! Defaults are layered under `MARKETPLACE__SECTION__KEY` environment
//! variables, e.g. `MARKETPLACE__SERVER__PORT=8080` or
//! `MARKETPLACE__STORAGE__BACKEND=postgres`.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::fmt;

/// Where entities are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Postgres,
}

/// Where session tokens are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    Memory,
    Redis,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Insert the default categories and templates at startup
    pub seed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub backend: SessionBackend,
    pub cookie_name: String,
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
}

#[derive(Debug)]
pub enum ConfigValidationError {
    InvalidPort,
    EmptyCookieName,
    ZeroSessionTtl,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValidationError::InvalidPort => write!(f, "server.port must not be 0"),
            ConfigValidationError::EmptyCookieName => {
                write!(f, "session.cookie_name must not be empty")
            }
            ConfigValidationError::ZeroSessionTtl => {
                write!(f, "session.ttl_seconds must be greater than 0")
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

impl AppConfig {
    /// Load defaults overridden by the environment
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001)?
            .set_default("server.log_level", "info")?
            .set_default("storage.backend", "memory")?
            .set_default("storage.seed", true)?
            .set_default("session.backend", "memory")?
            .set_default("session.cookie_name", "sid")?
            .set_default("session.ttl_seconds", 60 * 60 * 24 * 7)?
            .add_source(
                Environment::with_prefix("MARKETPLACE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Configuration used by tests: in-memory everything, seeded
    pub fn in_memory() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3001,
                log_level: "info".to_string(),
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                seed: true,
            },
            session: SessionConfig {
                backend: SessionBackend::Memory,
                cookie_name: "sid".to_string(),
                ttl_seconds: 60 * 60,
            },
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

pub fn validate_config(config: &AppConfig) -> Result<(), ConfigValidationError> {
    if config.server.port == 0 {
        return Err(ConfigValidationError::InvalidPort);
    }
    if config.session.cookie_name.trim().is_empty() {
        return Err(ConfigValidationError::EmptyCookieName);
    }
    if config.session.ttl_seconds == 0 {
        return Err(ConfigValidationError::ZeroSessionTtl);
    }
    Ok(())
}

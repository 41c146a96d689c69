//! Client configuration

use std::env;

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API origin without a trailing slash, e.g. `http://localhost:3001`
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ClientError::Config("API base URL is empty".to_string()));
        }
        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    /// Read `API_BASE_URL`
    pub fn from_env() -> ClientResult<Self> {
        let base_url = env::var("API_BASE_URL")
            .map_err(|_| ClientError::Config("API_BASE_URL is not defined".to_string()))?;
        Self::new(base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = ClientConfig::new("http://localhost:3001/").unwrap();
        assert_eq!(config.base_url, "http://localhost:3001");
        assert!(ClientConfig::new(" / ").is_err());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        unsafe {
            env::remove_var("API_BASE_URL");
        }
        assert!(matches!(ClientConfig::from_env(), Err(ClientError::Config(_))));

        unsafe {
            env::set_var("API_BASE_URL", "https://api.example.com/");
        }
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.base_url, "https://api.example.com");

        unsafe {
            env::remove_var("API_BASE_URL");
        }
    }
}

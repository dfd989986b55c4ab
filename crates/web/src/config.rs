//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_BASE_URL` - Base URL of the remote book-catalog API
//!
//! ## Optional
//! - `SHELFSIDE_HOST` - Bind address (default: 127.0.0.1)
//! - `SHELFSIDE_PORT` - Listen port (default: 4000)
//! - `SHELFSIDE_DATA_DIR` - Directory holding the session slot file (default: ./data)
//! - `CATALOG_API_VERSION` - Catalog API version segment (default: v1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shelfside application configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the durable session slot
    pub data_dir: PathBuf,
    /// Remote book-catalog API configuration
    pub catalog: CatalogConfig,
}

/// Remote book-catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog service (e.g., <http://localhost:8000>)
    pub base_url: String,
    /// API version segment (e.g., v1)
    pub api_version: String,
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("SHELFSIDE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHELFSIDE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SHELFSIDE_PORT", "4000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHELFSIDE_PORT".to_string(), e.to_string()))?;
        let data_dir = PathBuf::from(get_env_or_default("SHELFSIDE_DATA_DIR", "./data"));

        let catalog = CatalogConfig::from_env()?;

        Ok(Self {
            host,
            port,
            data_dir,
            catalog,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_required_env("CATALOG_BASE_URL")?;
        validate_base_url(&base_url)?;

        Ok(Self {
            base_url,
            api_version: get_env_or_default("CATALOG_API_VERSION", "v1"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that the catalog base URL parses and has a host.
fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let url = url::Url::parse(base_url).map_err(|e| {
        ConfigError::InvalidEnvVar("CATALOG_BASE_URL".to_string(), e.to_string())
    })?;

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            "CATALOG_BASE_URL".to_string(),
            "must have a host".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_base_url_ok() {
        assert!(validate_base_url("http://localhost:8000").is_ok());
        assert!(validate_base_url("https://catalog.example.com").is_ok());
    }

    #[test]
    fn test_validate_base_url_not_a_url() {
        let result = validate_base_url("not a url");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_validate_base_url_missing_host() {
        let result = validate_base_url("file:///tmp/catalog");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_socket_addr() {
        let config = WebConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 4000,
            data_dir: PathBuf::from("./data"),
            catalog: CatalogConfig {
                base_url: "http://localhost:8000".to_string(),
                api_version: "v1".to_string(),
            },
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 4000);
    }
}

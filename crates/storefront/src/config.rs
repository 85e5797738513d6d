//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `VITRINA_HOST` - Bind address (default: 127.0.0.1)
//! - `VITRINA_PORT` - Listen port (default: 3000)
//! - `VITRINA_CATALOG_PATH` - Catalog JSON file (default: data/products.json)
//! - `VITRINA_CART_DIR` - Directory for cart records; carts are kept in memory
//!   when unset
//! - `VITRINA_CHECKOUT_URL` - Checkout location for new carts (default: /checkout)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0 to 1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;
use vitrina_core::DEFAULT_CHECKOUT_URL;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Catalog JSON file
    pub catalog_path: PathBuf,
    /// Directory for cart records (`None` keeps carts in memory)
    pub cart_dir: Option<PathBuf>,
    /// Checkout location for new carts
    pub checkout_url: String,
    /// Emit logs as JSON lines instead of text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            catalog_path: PathBuf::from("data/products.json"),
            cart_dir: None,
            checkout_url: DEFAULT_CHECKOUT_URL.to_string(),
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);
        let defaults = Self::default();

        let host = env.parse_or("VITRINA_HOST", defaults.host)?;
        let port = env.parse_or("VITRINA_PORT", defaults.port)?;
        let catalog_path = env
            .optional("VITRINA_CATALOG_PATH")
            .map_or(defaults.catalog_path, PathBuf::from);
        let cart_dir = env.optional("VITRINA_CART_DIR").map(PathBuf::from);
        let checkout_url = env
            .optional("VITRINA_CHECKOUT_URL")
            .unwrap_or(defaults.checkout_url);
        let log_json = env.parse_or("VITRINA_LOG_JSON", defaults.log_json)?;

        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate =
            validate_rate("SENTRY_SAMPLE_RATE", env.parse_or("SENTRY_SAMPLE_RATE", 1.0)?)?;
        let sentry_traces_sample_rate = validate_rate(
            "SENTRY_TRACES_SAMPLE_RATE",
            env.parse_or("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        )?;

        Ok(Self {
            host,
            port,
            catalog_path,
            cart_dir,
            checkout_url,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Parse a variable, falling back to a default when unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

fn validate_rate(key: &str, rate: f32) -> Result<f32, ConfigError> {
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("{rate} is outside 0.0..=1.0"),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.catalog_path, PathBuf::from("data/products.json"));
        assert!(config.cart_dir.is_none());
        assert_eq!(config.checkout_url, "/checkout");
        assert!(!config.log_json);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("VITRINA_HOST", "0.0.0.0"),
            ("VITRINA_PORT", "8080"),
            ("VITRINA_CART_DIR", "/var/lib/vitrina/carts"),
            ("VITRINA_CHECKOUT_URL", "https://pay.example.com"),
            ("VITRINA_LOG_JSON", "true"),
            ("SENTRY_TRACES_SAMPLE_RATE", "0.25"),
        ])
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.cart_dir, Some(PathBuf::from("/var/lib/vitrina/carts")));
        assert_eq!(config.checkout_url, "https://pay.example.com");
        assert!(config.log_json);
        assert!((config.sentry_traces_sample_rate - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = load(&[("VITRINA_PORT", " "), ("SENTRY_DSN", "")]).unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("VITRINA_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "VITRINA_PORT"));
    }

    #[test]
    fn test_sample_rate_out_of_range() {
        let err = load(&[("SENTRY_SAMPLE_RATE", "1.5")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }
}

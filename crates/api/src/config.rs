//! # API Configuration Module
//!
//! Loads the Rollcall server configuration from environment variables,
//! falling back to defaults where a value is optional.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string. When unset, snapshots are
//!   kept in memory and lost on exit.
//! - `LOG_LEVEL`: Log filter directive (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)
//! - `QR_TTL_SECONDS`: Lifetime of issued QR payloads, at most one day
//!   (default: 300)
//! - `SEED_DEMO_DATA`: Seed a demo history into an empty store (default: true)

use eyre::{eyre, Result, WrapErr};
use rollcall_core::qr::{DEFAULT_QR_TTL_SECS, MAX_QR_TTL_SECS};
use std::env;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Rollcall API server
///
/// # Example
///
/// ```
/// use eyre::Result;
/// use rollcall_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string (optional)
    pub database_url: Option<String>,

    /// `tracing_subscriber::EnvFilter` directive
    pub log_level: String,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Default lifetime of QR payloads in seconds
    pub qr_ttl_seconds: u64,

    /// Whether an empty store is filled with generated demo records
    pub seed_demo_data: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: None,
            log_level: "info".to_string(),
            cors_origins: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            qr_ttl_seconds: DEFAULT_QR_TTL_SECS as u64,
            seed_demo_data: true,
        }
    }
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// Fails if `API_PORT`, `QR_TTL_SECONDS` or `SEED_DEMO_DATA` hold a value
    /// that cannot be parsed, or if `QR_TTL_SECONDS` is zero or longer than a
    /// day. An unparsable request timeout falls back to its default instead.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // Network settings
        let host = lookup("API_HOST").unwrap_or(defaults.host);
        let port = match lookup("API_PORT") {
            Some(port) => port.parse().wrap_err("Invalid API_PORT value")?,
            None => defaults.port,
        };

        // Database settings
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        // Logging settings
        let log_level = lookup("LOG_LEVEL").unwrap_or(defaults.log_level);

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = lookup("API_REQUEST_TIMEOUT_SECONDS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.request_timeout);

        // Attendance settings
        let qr_ttl_seconds = match lookup("QR_TTL_SECONDS") {
            Some(ttl) => ttl.parse().wrap_err("Invalid QR_TTL_SECONDS value")?,
            None => defaults.qr_ttl_seconds,
        };
        if qr_ttl_seconds == 0 || qr_ttl_seconds > MAX_QR_TTL_SECS as u64 {
            return Err(eyre!(
                "QR_TTL_SECONDS must be between 1 and {}, got {}",
                MAX_QR_TTL_SECS,
                qr_ttl_seconds
            ));
        }
        let seed_demo_data = match lookup("SEED_DEMO_DATA") {
            Some(flag) => flag.parse().wrap_err("Invalid SEED_DEMO_DATA value")?,
            None => defaults.seed_demo_data,
        };

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            qr_ttl_seconds,
            seed_demo_data,
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

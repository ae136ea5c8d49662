//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TUTORLANE_STORE` - Persistence backend: `memory` or `supabase`
//! - `SUPABASE_URL` - Supabase project URL (required for the `supabase` backend)
//! - `SUPABASE_SERVICE_KEY` - Supabase service-role key (required for the `supabase` backend)
//!
//! ## Optional
//! - `TUTORLANE_HOST` - Bind address (default: 127.0.0.1)
//! - `TUTORLANE_PORT` - Listen port (default: 8000)
//! - `SMTP_HOST` - SMTP relay host; notifications are skipped when unset
//! - `SMTP_PORT` - SMTP relay port (default: 587)
//! - `SMTP_USERNAME` - SMTP username
//! - `SMTP_PASSWORD` - SMTP password
//! - `NOTIFY_FROM` - Sender address for staff notifications
//! - `NOTIFY_TO` - Recipient address for staff notifications
//! - `WHATSAPP_NUMBER` - Contact number used for WhatsApp deep-links
//! - `CORS_ORIGINS` - Comma-separated allowed origins (default: *)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Persistence backend selection
    pub store: StoreConfig,
    /// SMTP notification configuration; `None` disables notifications
    pub smtp: Option<SmtpConfig>,
    /// Contact number used for WhatsApp deep-links (E.164, digits only)
    pub whatsapp_number: String,
    /// Allowed CORS origins; `["*"]` allows any origin
    pub cors_origins: Vec<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Which persistence backend to run against.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// In-process document store (development and tests).
    Memory,
    /// Supabase REST tables.
    Supabase(SupabaseConfig),
}

/// Supabase REST backend configuration.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`
    pub url: String,
    /// Service-role API key
    pub service_key: SecretString,
}

/// SMTP notification configuration.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    /// Sender address for staff notifications
    pub from_address: String,
    /// Recipient address for staff notifications
    pub to_address: String,
}

impl Config {
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

        let host = get_env_or_default("TUTORLANE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("TUTORLANE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("TUTORLANE_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("TUTORLANE_PORT".to_string(), e.to_string()))?;

        let store = match get_required_env("TUTORLANE_STORE")?.as_str() {
            "memory" => StoreConfig::Memory,
            "supabase" => StoreConfig::Supabase(SupabaseConfig {
                url: get_required_env("SUPABASE_URL")?,
                service_key: get_required_secret("SUPABASE_SERVICE_KEY")?,
            }),
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "TUTORLANE_STORE".to_string(),
                    format!("expected 'memory' or 'supabase', got '{other}'"),
                ));
            }
        };

        let smtp = SmtpConfig::from_env()?;

        let cors_origins = get_env_or_default("CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            store,
            smtp,
            whatsapp_number: get_env_or_default("WHATSAPP_NUMBER", ""),
            cors_origins,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SmtpConfig {
    /// Load SMTP configuration; returns `None` when `SMTP_HOST` is unset,
    /// which is a normal startup state (notifications disabled).
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(host) = get_optional_env("SMTP_HOST") else {
            return Ok(None);
        };

        let port = get_env_or_default("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string()))?;

        Ok(Some(Self {
            host,
            port,
            username: get_required_env("SMTP_USERNAME")?,
            password: get_required_secret("SMTP_PASSWORD")?,
            from_address: get_required_env("NOTIFY_FROM")?,
            to_address: get_required_env("NOTIFY_TO")?,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a config without touching the environment.
    #[must_use]
    pub fn test_config() -> Config {
        Config {
            host: "127.0.0.1".parse().expect("valid IP"),
            port: 0,
            store: StoreConfig::Memory,
            smtp: None,
            whatsapp_number: "919876543210".to_owned(),
            cors_origins: vec!["*".to_owned()],
            sentry_dsn: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        assert_eq!(config.socket_addr().port(), 0);
        assert!(config.socket_addr().ip().is_loopback());
    }
}

//! Application configuration loaded from environment variables.
//!
//! Secrets are read once at startup and held in memory for the lifetime of
//! the process.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Session token lifetime in seconds
    pub token_ttl_secs: u64,
    /// Timeout applied to every outbound provider call, in seconds
    pub provider_timeout_secs: u64,

    // --- Secrets ---
    /// HS256 signing key for session tokens (raw bytes)
    pub token_secret: Vec<u8>,
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// Facebook OAuth client secret
    pub facebook_client_secret: String,
    /// Twitter OAuth1 consumer secret
    pub twitter_consumer_secret: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            token_ttl_secs: 3600,
            provider_timeout_secs: 10,
            token_secret: b"test_token_secret_32_bytes_min!!".to_vec(),
            google_client_secret: "test_google_secret".to_string(),
            facebook_client_secret: "test_facebook_secret".to_string(),
            twitter_consumer_secret: "test_twitter_secret".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            token_ttl_secs: env::var("TOKEN_TTL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .unwrap_or(3600),
            provider_timeout_secs: env::var("PROVIDER_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),

            token_secret: env::var("TOKEN_SECRET")
                .map_err(|_| ConfigError::Missing("TOKEN_SECRET"))?
                .into_bytes(),
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_SECRET"))?,
            facebook_client_secret: env::var("FACEBOOK_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FACEBOOK_CLIENT_SECRET"))?,
            twitter_consumer_secret: env::var("TWITTER_CONSUMER_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("TWITTER_CONSUMER_SECRET"))?,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

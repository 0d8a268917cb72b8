//! Application configuration loaded from environment variables.
//!
//! In Cloud Run the signing key is injected from Secret Manager as an
//! environment variable, so there is a single loading path.

use chrono::Duration;
use std::env;
use std::str::FromStr;

/// Cookie carrying the session token.
pub const AUTH_COOKIE_NAME: &str = "auth_token";

/// Where journal data is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Firestore,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(Self::Firestore),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::Invalid("STORAGE_BACKEND", s.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL (CORS origin, decides the cookie `Secure` flag)
    pub frontend_url: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// OAuth client ID expected as the `aud` of Google ID tokens
    pub google_client_id: Option<String>,
    pub storage_backend: StorageBackend,
    /// Lifetime of a freshly minted session token
    pub session_ttl: Duration,
    /// Sessions older than this are rejected even if not yet expired
    pub max_session_age: Duration,
    /// Deadline applied to every request
    pub request_timeout: std::time::Duration,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let jwt_signing_key = env::var("JWT_SIGNING_KEY")
            .map(|v| v.trim().to_string())
            .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?;
        if jwt_signing_key.len() < 32 {
            return Err(ConfigError::Invalid(
                "JWT_SIGNING_KEY",
                "must be at least 32 bytes".to_string(),
            ));
        }

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: parse_or("PORT", 8080)?,
            google_client_id: env::var("GOOGLE_CLIENT_ID")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            storage_backend: env::var("STORAGE_BACKEND")
                .map(|v| v.parse::<StorageBackend>())
                .unwrap_or(Ok(StorageBackend::Firestore))?,
            session_ttl: parse_hours("SESSION_TTL_HOURS", env::var("SESSION_TTL_HOURS").ok(), 24)?,
            max_session_age: parse_hours(
                "SESSION_MAX_AGE_HOURS",
                env::var("SESSION_MAX_AGE_HOURS").ok(),
                24,
            )?,
            request_timeout: std::time::Duration::from_secs(parse_or("REQUEST_TIMEOUT_SECS", 30)?),
            jwt_signing_key: jwt_signing_key.into_bytes(),
        })
    }

    /// Deterministic configuration for tests.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            google_client_id: Some("test-client-id.apps.googleusercontent.com".to_string()),
            storage_backend: StorageBackend::Memory,
            session_ttl: Duration::hours(24),
            max_session_age: Duration::hours(24),
            request_timeout: std::time::Duration::from_secs(30),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!!".to_vec(),
        }
    }

    /// Whether cookies must carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// A positive whole number of hours.
fn parse_hours(
    name: &'static str,
    raw: Option<String>,
    default: i64,
) -> Result<Duration, ConfigError> {
    let hours = match raw {
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigError::Invalid(name, raw.clone()))?,
        None => default,
    };
    if hours <= 0 {
        return Err(ConfigError::Invalid(name, format!("{hours} (must be positive)")));
    }
    Duration::try_hours(hours).ok_or_else(|| ConfigError::Invalid(name, format!("{hours} (too large)")))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

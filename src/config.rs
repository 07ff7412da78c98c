//! Environment-driven configuration.
//!
//! DESIGN
//! ======
//! Everything is read once at startup and carried by value; there is no
//! runtime reload. Defaults favor local development: the API is assumed to
//! listen on localhost:8080 and the session token lands in the platform
//! config directory.
//!
//! Variables:
//! - `ZONEBOARD_BASE_URL`: API origin, default `http://127.0.0.1:8080`.
//! - `ZONEBOARD_TOKEN_FILE`: override for the persisted-token path. An
//!   empty value disables persistence entirely.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API origin without a trailing slash.
    pub base_url: String,
    /// Where the session token is persisted, or `None` to keep it in memory.
    pub token_file: Option<PathBuf>,
}

impl AppConfig {
    /// Read configuration from the environment, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var("ZONEBOARD_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "http://127.0.0.1:8080".to_string());
        let base_url = base_url.trim_end_matches('/').to_string();

        let token_file = match std::env::var("ZONEBOARD_TOKEN_FILE") {
            Ok(v) if v.trim().is_empty() => None,
            Ok(v) => Some(PathBuf::from(v)),
            Err(_) => default_token_file(),
        };

        Self {
            base_url,
            token_file,
        }
    }
}

/// Default token location under the platform config directory.
#[must_use]
pub fn default_token_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("zoneboard").join("session"))
}

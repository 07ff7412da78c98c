//! Wire DTOs for the management API boundary.
//!
//! Field names follow the server's JSON (camelCase) via serde renames;
//! everything else in the crate uses the Rust-side names.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Credentials posted to the auth endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub mail: String,
    pub password: String,
}

/// Body of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Human-readable status line, not machine-parsed.
    pub message: String,
    /// Opaque session credential for subsequent requests.
    pub token: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

/// Identity reported by the session-check endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCheckResponse {
    pub username: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

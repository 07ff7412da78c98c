//! Server-side session verification.
//!
//! DESIGN
//! ======
//! Client state is a cache; the server is the authority on who the token
//! belongs to. The guard re-verifies on every navigation through this
//! seam, injected as `Arc<dyn SessionVerifier>` so policy tests can swap
//! in a canned verdict.
//!
//! All failure modes collapse into a single `VerifyError`: at this layer
//! an expired token, a rejected cookie, and an unreachable server all
//! mean the same thing, the session cannot be trusted. The verifier never
//! mutates state; the caller decides what to do with the verdict.

#[cfg(test)]
#[path = "verify_test.rs"]
mod verify_test;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::net::api::{ApiClient, ApiError};
use crate::state::session::SessionStore;

/// Identity the server vouches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUser {
    pub username: String,
    pub is_admin: bool,
}

/// The single verification-failure outcome.
#[derive(Debug, Error)]
#[error("session verification failed: {reason}")]
pub struct VerifyError {
    reason: String,
}

impl From<ApiError> for VerifyError {
    fn from(e: ApiError) -> Self {
        Self {
            reason: e.to_string(),
        }
    }
}

/// Answers "who does the current credential belong to" once per call.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self) -> Result<VerifiedUser, VerifyError>;
}

/// Verifier backed by the live session-check endpoint, reading the ambient
/// token from the session store.
pub struct HttpSessionVerifier {
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
}

impl HttpSessionVerifier {
    #[must_use]
    pub fn new(api: Arc<ApiClient>, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }
}

#[async_trait]
impl SessionVerifier for HttpSessionVerifier {
    async fn verify(&self) -> Result<VerifiedUser, VerifyError> {
        let token = self.session.token().await;
        let identity = self.api.check_session(token.as_deref()).await?;
        Ok(VerifiedUser {
            username: identity.username,
            is_admin: identity.is_admin,
        })
    }
}

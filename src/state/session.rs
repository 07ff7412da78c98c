//! Session identity state shared across the app.
//!
//! DESIGN
//! ======
//! One store instance owns the current user identity behind an async
//! `RwLock`. Nothing here is global: the store is constructed once and
//! handed to collaborators as an `Arc`, so tests can build as many
//! independent stores as they need.
//!
//! Only the token survives a restart. Identity fields (username, admin
//! bit) are never persisted; they are re-established by verifying the
//! token against the server on the next navigation. A stale or revoked
//! token therefore degrades to an unauthenticated session instead of a
//! forged identity.
//!
//! ERROR HANDLING
//! ==============
//! Token-file IO is best-effort. A failed write or remove is logged and
//! otherwise ignored; the in-memory session is the source of truth.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fs;
use std::path::{Path, PathBuf};

use tokio::sync::RwLock;

/// Immutable view of the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Verified username, empty when signed out.
    pub username: String,
    /// Whether the verified user may enter the admin area.
    pub is_admin: bool,
    /// Opaque credential presented to the API, if any.
    pub token: Option<String>,
}

impl Session {
    /// A session counts as authenticated once a verified username is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.username.is_empty()
    }
}

/// Shared store for the current session.
pub struct SessionStore {
    inner: RwLock<Session>,
    token_file: Option<PathBuf>,
}

impl SessionStore {
    /// In-memory store with no persistence.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Session::default()),
            token_file: None,
        }
    }

    /// Store backed by a token file. Any token already on disk is loaded,
    /// leaving the session unauthenticated until the token is verified.
    #[must_use]
    pub fn with_token_file(path: PathBuf) -> Self {
        let token = read_token(&path);
        Self {
            inner: RwLock::new(Session {
                token,
                ..Session::default()
            }),
            token_file: Some(path),
        }
    }

    /// Copy of the current session.
    pub async fn snapshot(&self) -> Session {
        self.inner.read().await.clone()
    }

    /// Whether a verified user is present.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_authenticated()
    }

    /// Current token, if any.
    pub async fn token(&self) -> Option<String> {
        self.inner.read().await.token.clone()
    }

    /// Record a verified identity. The stored token is replaced only when a
    /// non-empty token is supplied; passing `None` keeps the existing one, so
    /// verification results (which carry no token) do not wipe the credential.
    pub async fn set_session(&self, username: &str, is_admin: bool, token: Option<&str>) {
        let mut session = self.inner.write().await;
        session.username = username.to_string();
        session.is_admin = is_admin;
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            session.token = Some(token.to_string());
            if let Some(path) = &self.token_file {
                write_token(path, token);
            }
        }
    }

    /// Drop identity and token. Safe to call repeatedly.
    pub async fn clear_session(&self) {
        let mut session = self.inner.write().await;
        *session = Session::default();
        if let Some(path) = &self.token_file {
            remove_token(path);
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn read_token(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(raw) => {
            let token = raw.trim();
            if token.is_empty() {
                None
            } else {
                Some(token.to_string())
            }
        }
        Err(_) => None,
    }
}

fn write_token(path: &Path, token: &str) {
    // parent() yields an empty path for bare relative filenames.
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent) {
            tracing::warn!(error = %e, path = %path.display(), "failed to create token directory");
            return;
        }
    }
    if let Err(e) = fs::write(path, token) {
        tracing::warn!(error = %e, path = %path.display(), "failed to persist session token");
    }
}

fn remove_token(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(error = %e, path = %path.display(), "failed to remove session token");
        }
    }
}

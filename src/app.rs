//! Application composition root.
//!
//! DESIGN
//! ======
//! `App::new` is the single place collaborators are constructed and wired:
//! one `ApiClient`, one `SessionStore`, one `ConnectionStore` fetching
//! through the live API, and the `RouteGuard` verifying through it. There
//! are no module-level globals; everything reaches its dependencies through
//! the `Arc`s handed out here, and tests assemble the same pieces around
//! stubs instead.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::guard::RouteGuard;
use crate::net::api::{ApiClient, ApiError, HttpConnectionsApi};
use crate::state::connection::ConnectionStore;
use crate::state::session::SessionStore;
use crate::verify::{HttpSessionVerifier, SessionVerifier, VerifiedUser, VerifyError};

/// Owns the stores and the guard for one running instance of the app.
pub struct App {
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
    connections: Arc<ConnectionStore>,
    verifier: Arc<dyn SessionVerifier>,
    guard: RouteGuard,
}

impl App {
    /// Wire up the full object graph. Fails only when the HTTP client
    /// cannot be built; no network traffic happens here.
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let api = Arc::new(ApiClient::new(config)?);
        let session = Arc::new(match &config.token_file {
            Some(path) => SessionStore::with_token_file(path.clone()),
            None => SessionStore::new(),
        });
        let connections = Arc::new(ConnectionStore::new(Arc::new(HttpConnectionsApi::new(
            Arc::clone(&api),
            Arc::clone(&session),
        ))));
        let verifier: Arc<dyn SessionVerifier> = Arc::new(HttpSessionVerifier::new(
            Arc::clone(&api),
            Arc::clone(&session),
        ));
        let guard = RouteGuard::new(
            Arc::clone(&verifier),
            Arc::clone(&session),
            Arc::clone(&connections),
        );
        Ok(Self {
            api,
            session,
            connections,
            verifier,
            guard,
        })
    }

    /// Exchange credentials for a session. On success the identity and the
    /// issued token land in the session store (and the token file, when
    /// configured).
    pub async fn login(&self, mail: &str, password: &str) -> Result<VerifiedUser, ApiError> {
        let response = self.api.login(mail, password).await?;
        self.session
            .set_session(mail, response.is_admin, Some(&response.token))
            .await;
        Ok(VerifiedUser {
            username: mail.to_string(),
            is_admin: response.is_admin,
        })
    }

    /// Sign out locally. The upstream API keeps no server-side session to
    /// destroy; dropping the credential is the whole operation.
    pub async fn logout(&self) {
        self.session.clear_session().await;
    }

    /// One verification round trip: who does the stored token belong to.
    /// Leaves the session store untouched; callers that want the store
    /// synced go through the guard.
    pub async fn verify(&self) -> Result<VerifiedUser, VerifyError> {
        self.verifier.verify().await
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub fn connections(&self) -> &ConnectionStore {
        &self.connections
    }

    #[must_use]
    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }
}

#[cfg(test)]
pub mod test_helpers {
    //! Canned collaborators for exercising stores and the guard offline.

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::net::api::ApiError;
    use crate::state::connection::{ConnectionOption, ConnectionsApi};
    use crate::verify::{SessionVerifier, VerifiedUser, VerifyError};

    /// Verifier with a fixed verdict.
    pub enum StubVerifier {
        Succeed { username: String, is_admin: bool },
        Fail,
    }

    impl StubVerifier {
        pub fn ok(username: &str, is_admin: bool) -> Self {
            Self::Succeed {
                username: username.to_string(),
                is_admin,
            }
        }
    }

    #[async_trait]
    impl SessionVerifier for StubVerifier {
        async fn verify(&self) -> Result<VerifiedUser, VerifyError> {
            match self {
                Self::Succeed { username, is_admin } => Ok(VerifiedUser {
                    username: username.clone(),
                    is_admin: *is_admin,
                }),
                Self::Fail => Err(VerifyError::from(ApiError::Request(
                    "connection refused".to_string(),
                ))),
            }
        }
    }

    /// Catalog source answering with a fixed list.
    pub struct StaticConnections(pub Vec<ConnectionOption>);

    #[async_trait]
    impl ConnectionsApi for StaticConnections {
        async fn fetch_connections(&self) -> Result<Vec<ConnectionOption>, ApiError> {
            Ok(self.0.clone())
        }
    }

    /// Catalog source that always errors.
    pub struct FailingConnections;

    #[async_trait]
    impl ConnectionsApi for FailingConnections {
        async fn fetch_connections(&self) -> Result<Vec<ConnectionOption>, ApiError> {
            Err(ApiError::Request("connection refused".to_string()))
        }
    }

    /// Catalog source that answers once, then errors.
    pub struct FlakyConnections {
        options: Vec<ConnectionOption>,
        calls: AtomicUsize,
    }

    impl FlakyConnections {
        pub fn new(options: Vec<ConnectionOption>) -> Self {
            Self {
                options,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ConnectionsApi for FlakyConnections {
        async fn fetch_connections(&self) -> Result<Vec<ConnectionOption>, ApiError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(self.options.clone())
            } else {
                Err(ApiError::Request("connection refused".to_string()))
            }
        }
    }
}

//! HTTP client for the management API.
//!
//! DESIGN
//! ======
//! One `ApiClient` per process, built from `AppConfig` with explicit
//! request and connect timeouts so a dead backend fails fast instead of
//! hanging a navigation. The session credential travels as the `session`
//! cookie, matching what the server's middleware reads.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `ApiError`. Transport failures and timeouts map to
//! `Request`, non-2xx responses to `Status` with the raw body preserved
//! for display, and body-shape mismatches to `Decode`. Callers decide
//! which of these are worth distinguishing; the verifier collapses all of
//! them into "not authenticated".

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::AppConfig;
use crate::net::types::{LoginRequest, LoginResponse, SessionCheckResponse};
use crate::state::connection::{ConnectionOption, ConnectionsApi};
use crate::state::session::SessionStore;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Errors surfaced by API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build http client: {0}")]
    ClientBuild(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Client for the management API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// Exchange credentials for a session token.
    pub async fn login(&self, mail: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let request = self.http.post(self.endpoint("/auth")).json(&LoginRequest {
            mail: mail.to_string(),
            password: password.to_string(),
        });
        execute(request).await
    }

    /// Ask the server who the given token belongs to.
    pub async fn check_session(
        &self,
        token: Option<&str>,
    ) -> Result<SessionCheckResponse, ApiError> {
        let request = with_session(self.http.get(self.endpoint("/check-session")), token);
        execute(request).await
    }

    /// Fetch the catalog of upstream DNS servers.
    pub async fn list_connections(
        &self,
        token: Option<&str>,
    ) -> Result<Vec<ConnectionOption>, ApiError> {
        let request = with_session(self.http.get(self.endpoint("/connections")), token);
        execute(request).await
    }

    /// Liveness probe, body ignored.
    pub async fn healthcheck(&self) -> Result<(), ApiError> {
        let response = self
            .http
            .get(self.endpoint("/healthcheck"))
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Attach the session cookie when a usable token is present.
fn with_session(
    request: reqwest::RequestBuilder,
    token: Option<&str>,
) -> reqwest::RequestBuilder {
    match token {
        Some(token) if !token.is_empty() => {
            request.header(header::COOKIE, format!("session={token}"))
        }
        _ => request,
    }
}

/// Send a request and decode the success body, mapping each failure mode
/// to its `ApiError` variant.
async fn execute<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::Request(e.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Request(e.to_string()))?;
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// `ConnectionsApi` backed by the live API, reading the ambient token from
/// the session store on every fetch.
pub struct HttpConnectionsApi {
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
}

impl HttpConnectionsApi {
    #[must_use]
    pub fn new(api: Arc<ApiClient>, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }
}

#[async_trait]
impl ConnectionsApi for HttpConnectionsApi {
    async fn fetch_connections(&self) -> Result<Vec<ConnectionOption>, ApiError> {
        let token = self.session.token().await;
        self.api.list_connections(token.as_deref()).await
    }
}

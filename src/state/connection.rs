//! Upstream-connection catalog and selection state.
//!
//! DESIGN
//! ======
//! The store caches the catalog of DNS servers the API offers and tracks
//! which one the user is working against. The catalog comes through the
//! `ConnectionsApi` seam so tests can feed a fixed list without a network.
//!
//! Changing the selection is the one state change here that demands a
//! navigation: picking a different server must land the user on that
//! server's dashboard. `select` reports that as an explicit return value
//! for the caller to act on instead of navigating from inside the store.
//!
//! `refresh` replaces the catalog wholesale under the write lock, so
//! concurrent readers observe either the old list or the new one, never a
//! mix. A failed fetch leaves the cached catalog untouched.

#[cfg(test)]
#[path = "connection_test.rs"]
mod connection_test;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::net::api::ApiError;
use crate::routes;

/// One upstream DNS server offered by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionOption {
    /// Server-issued identifier, opaque to this side.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Users allowed on this server; absent on the wire for open servers.
    #[serde(default, rename = "authorizedUsers")]
    pub authorized_users: Vec<String>,
}

/// Catalog source the store fetches through.
#[async_trait]
pub trait ConnectionsApi: Send + Sync {
    async fn fetch_connections(&self) -> Result<Vec<ConnectionOption>, ApiError>;
}

/// Shared store for the connection catalog and the active selection.
pub struct ConnectionStore {
    api: Arc<dyn ConnectionsApi>,
    catalog: RwLock<Vec<ConnectionOption>>,
    selected: RwLock<String>,
}

impl ConnectionStore {
    /// Empty store; the catalog fills on the first `refresh`.
    #[must_use]
    pub fn new(api: Arc<dyn ConnectionsApi>) -> Self {
        Self {
            api,
            catalog: RwLock::new(Vec::new()),
            selected: RwLock::new(String::new()),
        }
    }

    /// Snapshot of the cached catalog.
    pub async fn catalog(&self) -> Vec<ConnectionOption> {
        self.catalog.read().await.clone()
    }

    /// Fetch the catalog and swap it in. On failure the cache keeps its
    /// previous contents and the error is returned for the caller to report.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let fetched = self.api.fetch_connections().await?;
        *self.catalog.write().await = fetched;
        Ok(())
    }

    /// Identifier of the active selection, empty when none.
    pub async fn selected_id(&self) -> String {
        self.selected.read().await.clone()
    }

    /// Whether any connection is selected.
    pub async fn has_selection(&self) -> bool {
        !self.selected.read().await.is_empty()
    }

    /// Make `id` the active selection. Returns the path the caller must
    /// navigate to when the selection actually changed; reselecting the
    /// current id is a no-op. The id is not checked against the catalog,
    /// a stale selection simply resolves to "unknown" in the lookups.
    pub async fn select(&self, id: &str) -> Option<&'static str> {
        let mut selected = self.selected.write().await;
        if *selected == id {
            return None;
        }
        *selected = id.to_string();
        Some(routes::DASHBOARD)
    }

    /// Display name for `id`, empty when the id is not in the catalog.
    pub async fn name_of(&self, id: &str) -> String {
        self.catalog
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .map_or_else(String::new, |c| c.name.clone())
    }

    /// Authorized users for `id`, empty when the id is not in the catalog.
    pub async fn authorized_users_of(&self, id: &str) -> Vec<String> {
        self.catalog
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .map_or_else(Vec::new, |c| c.authorized_users.clone())
    }
}

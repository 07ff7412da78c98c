//! Navigation policy: who may go where.
//!
//! DESIGN
//! ======
//! The policy itself is a pure function over four facts (authenticated,
//! admin, connection selected, destination). `RouteGuard` is the thin
//! adapter around it: it performs the one I/O step (server-side session
//! verification), syncs the session store with the verdict, and only then
//! evaluates the rules. Keeping the rules pure makes the whole policy
//! table testable without any network.
//!
//! A failed verification clears the session before evaluation, which
//! reduces every failure to the same outcome: the login route is allowed,
//! everything else redirects to it. The guard never surfaces an error to
//! the navigation framework.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::sync::Arc;

use crate::routes;
use crate::state::connection::ConnectionStore;
use crate::state::session::SessionStore;
use crate::verify::SessionVerifier;

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Continue to the requested destination.
    Allow,
    /// Go here instead.
    Redirect(String),
}

fn redirect(path: &str) -> Decision {
    Decision::Redirect(path.to_string())
}

/// Evaluate the access rules for a navigation to `dest`.
///
/// Rules in order, first match wins:
/// 1. authenticated and heading to the login route: redirect to the dashboard.
/// 2. not authenticated and heading anywhere else: redirect to the login route.
/// 3. authenticated non-admin heading into the admin area: redirect to the
///    dashboard.
/// 4. no connection selected and heading anywhere but login or the
///    connection-selection page: redirect to connection selection.
/// 5. connection selected and heading to connection selection: redirect to
///    the dashboard.
/// 6. otherwise: allow.
#[must_use]
pub fn decide(
    authenticated: bool,
    is_admin: bool,
    connection_selected: bool,
    dest: &str,
) -> Decision {
    if authenticated && dest == routes::LOGIN {
        return redirect(routes::DASHBOARD);
    }
    if !authenticated && dest != routes::LOGIN {
        return redirect(routes::LOGIN);
    }
    if authenticated && !is_admin && routes::is_admin_area(dest) {
        return redirect(routes::DASHBOARD);
    }
    if !connection_selected && dest != routes::LOGIN && dest != routes::CONNECTION_SELECT {
        return redirect(routes::CONNECTION_SELECT);
    }
    if connection_selected && dest == routes::CONNECTION_SELECT {
        return redirect(routes::DASHBOARD);
    }
    Decision::Allow
}

/// Adapter invoked by the navigation framework once per attempted route
/// change.
pub struct RouteGuard {
    verifier: Arc<dyn SessionVerifier>,
    session: Arc<SessionStore>,
    connections: Arc<ConnectionStore>,
}

impl RouteGuard {
    #[must_use]
    pub fn new(
        verifier: Arc<dyn SessionVerifier>,
        session: Arc<SessionStore>,
        connections: Arc<ConnectionStore>,
    ) -> Self {
        Self {
            verifier,
            session,
            connections,
        }
    }

    /// Re-verify the session with the server, sync the session store with
    /// the verdict, then evaluate the rules for `dest`. Verification runs on
    /// every call; the in-memory session is a cache, never an authority.
    /// Infallible from the caller's point of view.
    pub async fn before_navigate(&self, dest: &str) -> Decision {
        match self.verifier.verify().await {
            Ok(user) => {
                // The check response carries no token; the stored one stays.
                self.session
                    .set_session(&user.username, user.is_admin, None)
                    .await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "treating navigation as signed out");
                self.session.clear_session().await;
            }
        }

        let session = self.session.snapshot().await;
        let selected = self.connections.has_selection().await;
        decide(session.is_authenticated(), session.is_admin, selected, dest)
    }
}

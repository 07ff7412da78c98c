use super::*;

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::app::test_helpers::{StaticConnections, StubVerifier};
use crate::verify::{VerifiedUser, VerifyError};

fn allow() -> Decision {
    Decision::Allow
}

fn to(path: &str) -> Decision {
    Decision::Redirect(path.to_string())
}

// ============================================================================
// Policy: unauthenticated
// ============================================================================

#[test]
fn anonymous_may_visit_login() {
    assert_eq!(decide(false, false, false, routes::LOGIN), allow());
}

#[test]
fn anonymous_redirected_to_login_from_everywhere_else() {
    for dest in [
        routes::DASHBOARD,
        routes::CONNECTION_SELECT,
        "/users/list",
        "/zones/records",
    ] {
        assert_eq!(decide(false, false, false, dest), to(routes::LOGIN), "dest {dest}");
    }
}

#[test]
fn admin_and_selection_flags_are_irrelevant_when_unauthenticated() {
    assert_eq!(decide(false, true, true, routes::DASHBOARD), to(routes::LOGIN));
}

// ============================================================================
// Policy: login bounce
// ============================================================================

#[test]
fn authenticated_bounced_from_login_to_dashboard() {
    for is_admin in [false, true] {
        for selected in [false, true] {
            assert_eq!(
                decide(true, is_admin, selected, routes::LOGIN),
                to(routes::DASHBOARD),
                "admin {is_admin} selected {selected}",
            );
        }
    }
}

// ============================================================================
// Policy: admin area
// ============================================================================

#[test]
fn non_admin_redirected_from_admin_area() {
    assert_eq!(decide(true, false, true, "/users/list"), to(routes::DASHBOARD));
    assert_eq!(decide(true, false, true, routes::ADMIN_PREFIX), to(routes::DASHBOARD));
}

#[test]
fn admin_check_precedes_connection_check() {
    // A non-admin with no selection heading into the admin area is bounced
    // to the dashboard, not to connection selection.
    assert_eq!(decide(true, false, false, "/users/list"), to(routes::DASHBOARD));
}

#[test]
fn admin_with_selection_enters_admin_area() {
    assert_eq!(decide(true, true, true, "/users/list"), allow());
}

#[test]
fn admin_without_selection_is_still_sent_to_pick_one() {
    assert_eq!(
        decide(true, true, false, "/users/list"),
        to(routes::CONNECTION_SELECT)
    );
}

// ============================================================================
// Policy: connection selection
// ============================================================================

#[test]
fn no_selection_redirects_to_connection_select() {
    for dest in [routes::DASHBOARD, "/zones/records"] {
        assert_eq!(
            decide(true, false, false, dest),
            to(routes::CONNECTION_SELECT),
            "dest {dest}",
        );
    }
}

#[test]
fn no_selection_may_visit_connection_select() {
    assert_eq!(decide(true, false, false, routes::CONNECTION_SELECT), allow());
}

#[test]
fn selection_bounces_connection_select_to_dashboard() {
    assert_eq!(
        decide(true, false, true, routes::CONNECTION_SELECT),
        to(routes::DASHBOARD)
    );
    assert_eq!(
        decide(true, true, true, routes::CONNECTION_SELECT),
        to(routes::DASHBOARD)
    );
}

#[test]
fn selection_allows_ordinary_destinations() {
    assert_eq!(decide(true, false, true, routes::DASHBOARD), allow());
    assert_eq!(decide(true, false, true, "/zones/records"), allow());
}

// ============================================================================
// RouteGuard adapter
// ============================================================================

async fn guard_with(
    verifier: StubVerifier,
    selected: Option<&str>,
) -> (RouteGuard, Arc<SessionStore>) {
    let session = Arc::new(SessionStore::new());
    let connections = Arc::new(ConnectionStore::new(Arc::new(StaticConnections(Vec::new()))));
    if let Some(id) = selected {
        connections.select(id).await;
    }
    let guard = RouteGuard::new(Arc::new(verifier), Arc::clone(&session), connections);
    (guard, session)
}

#[tokio::test]
async fn failed_verification_clears_session_and_redirects_to_login() {
    let (guard, session) = guard_with(StubVerifier::Fail, None).await;
    session.set_session("alice", true, Some("stale")).await;

    let decision = guard.before_navigate(routes::DASHBOARD).await;

    assert_eq!(decision, to(routes::LOGIN));
    let cleared = session.snapshot().await;
    assert!(!cleared.is_authenticated());
    assert_eq!(cleared.token, None);
}

#[tokio::test]
async fn failed_verification_still_allows_login_route() {
    let (guard, _) = guard_with(StubVerifier::Fail, None).await;
    assert_eq!(guard.before_navigate(routes::LOGIN).await, allow());
}

#[tokio::test]
async fn failure_allows_only_the_login_route() {
    for dest in [routes::LOGIN, routes::DASHBOARD, routes::CONNECTION_SELECT, "/users/list"] {
        let (guard, _) = guard_with(StubVerifier::Fail, Some("conn1")).await;
        let decision = guard.before_navigate(dest).await;
        if dest == routes::LOGIN {
            assert_eq!(decision, allow(), "dest {dest}");
        } else {
            assert_eq!(decision, to(routes::LOGIN), "dest {dest}");
        }
    }
}

#[tokio::test]
async fn successful_verification_writes_identity_and_keeps_token() {
    let (guard, session) = guard_with(StubVerifier::ok("bob", true), Some("conn1")).await;
    session.set_session("alice", false, Some("tok-1")).await;

    let decision = guard.before_navigate(routes::DASHBOARD).await;

    assert_eq!(decision, allow());
    let current = session.snapshot().await;
    assert_eq!(current.username, "bob");
    assert!(current.is_admin);
    assert_eq!(current.token.as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn verified_non_admin_is_kept_out_of_admin_area() {
    let (guard, _) = guard_with(StubVerifier::ok("alice", false), Some("conn1")).await;
    assert_eq!(
        guard.before_navigate("/users/list").await,
        to(routes::DASHBOARD)
    );
}

#[tokio::test]
async fn verified_user_without_selection_is_sent_to_pick_one() {
    let (guard, _) = guard_with(StubVerifier::ok("alice", false), None).await;
    assert_eq!(
        guard.before_navigate(routes::DASHBOARD).await,
        to(routes::CONNECTION_SELECT)
    );
}

/// Verifier that records how many times it is consulted.
struct CountingVerifier(AtomicUsize);

#[async_trait]
impl SessionVerifier for CountingVerifier {
    async fn verify(&self) -> Result<VerifiedUser, VerifyError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(VerifiedUser {
            username: "alice".to_string(),
            is_admin: false,
        })
    }
}

#[tokio::test]
async fn every_navigation_reverifies() {
    let session = Arc::new(SessionStore::new());
    let connections = Arc::new(ConnectionStore::new(Arc::new(StaticConnections(Vec::new()))));
    connections.select("conn1").await;
    let verifier = Arc::new(CountingVerifier(AtomicUsize::new(0)));
    let guard = RouteGuard::new(
        Arc::clone(&verifier) as Arc<dyn SessionVerifier>,
        session,
        connections,
    );

    guard.before_navigate(routes::DASHBOARD).await;
    guard.before_navigate(routes::DASHBOARD).await;

    assert_eq!(verifier.0.load(Ordering::SeqCst), 2);
}

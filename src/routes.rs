//! Well-known route paths referenced by the navigation policy.
//!
//! DESIGN
//! ======
//! These are fixed product routes, not computed values. The guard compares
//! destination paths against them literally; the UI shell owns everything
//! else about the route table.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

/// Public entry route; the only path reachable without a session.
pub const LOGIN: &str = "/";

/// Default landing page after login and the target of every forced bounce.
pub const DASHBOARD: &str = "/zones/dashboard";

/// Connection-selection page shown until an upstream server is chosen.
pub const CONNECTION_SELECT: &str = "/start";

/// Prefix of the admin-only area.
pub const ADMIN_PREFIX: &str = "/users";

/// Whether `dest` falls inside the admin-only area.
#[must_use]
pub fn is_admin_area(dest: &str) -> bool {
    dest.starts_with(ADMIN_PREFIX)
}

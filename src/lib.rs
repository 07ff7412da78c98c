//! Core of a DNS-management front-end: session state, upstream-connection
//! state, and the navigation guard that decides every route change.
//!
//! ARCHITECTURE
//! ============
//! - `state` owns the two shared stores: the verified session and the
//!   connection catalog plus selection.
//! - `net` is the HTTP boundary to the management API.
//! - `verify` re-establishes identity from the server before every
//!   navigation; stored identity is never trusted on its own.
//! - `guard` evaluates the pure access rules and wraps them in the
//!   adapter the navigation framework calls.
//! - `app` wires everything together; `main` drives it from the command
//!   line against a live backend.

pub mod app;
pub mod config;
pub mod guard;
pub mod net;
pub mod routes;
pub mod state;
pub mod verify;

pub use app::App;
pub use config::AppConfig;
pub use guard::{Decision, RouteGuard, decide};
pub use state::connection::{ConnectionOption, ConnectionStore, ConnectionsApi};
pub use state::session::{Session, SessionStore};
pub use verify::{SessionVerifier, VerifiedUser, VerifyError};

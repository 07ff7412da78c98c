//! Shared application state stores.

pub mod connection;
pub mod session;

//! HTTP boundary to the management API.

pub mod api;
pub mod types;

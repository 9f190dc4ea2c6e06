//! HTTP API server for the aviary account registry.
//!
//! This crate provides the HTTP control plane:
//! - Account registration and retrieval
//! - The adoption (lease) endpoint: claim and release
//! - Profile cache refresh and rate-limit probing against the provider
//! - Per-account stats storage

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;

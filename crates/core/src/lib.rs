//! Core domain types and shared logic for the aviary account registry.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Account records (provider credential, profile cache, adoption fields)
//! - The lease state machine and the read-time reconciliation pass
//! - Configuration types

pub mod account;
pub mod config;
pub mod lease;

pub use account::{AccountMap, AccountRecord};
pub use config::{AppConfig, DataConfig, ServerConfig, UpstreamConfig};
pub use lease::{HeldByOther, UNLOCK_TIMEOUT, reconcile, release, try_claim};

//! HTTP request handlers.

pub mod accounts;
pub mod adoption;
pub mod profiles;
pub mod stats;

pub use accounts::*;
pub use adoption::*;
pub use profiles::*;
pub use stats::*;

use axum::Json;
use serde_json::{Value, json};

/// GET /healthz - liveness probe.
pub async fn health_check() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

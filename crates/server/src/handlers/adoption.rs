//! The adoption (lease) endpoint.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

/// Request body for POST /accounts/{name}/adopt.
#[derive(Debug, Default, Deserialize)]
pub struct AdoptRequest {
    /// "claim" or "release".
    #[serde(default)]
    pub action: Option<String>,
    /// Identifier of the worker making the claim; required for claim.
    #[serde(default)]
    pub adopted_by: Option<String>,
}

/// Response for POST /accounts/{name}/adopt.
#[derive(Debug, Serialize)]
pub struct AdoptResponse {
    pub status: &'static str,
    pub account_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adopted_by: Option<String>,
}

/// POST /accounts/{name}/adopt - Claim or release an account lease.
///
/// A malformed or absent body is treated as an empty request, which then
/// fails the action check with a 400 naming the accepted actions.
pub async fn adopt_account(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<AdoptRequest>, JsonRejection>,
) -> ApiResult<Json<AdoptResponse>> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    match request.action.as_deref() {
        Some("claim") => {
            let holder = request.adopted_by.unwrap_or_default();
            // The store rejects an empty holder and reports the current
            // holder on conflict; both map to the right status downstream.
            state.accounts.claim(&name, &holder).await?;
            Ok(Json(AdoptResponse {
                status: "claimed",
                account_name: name,
                adopted_by: Some(holder),
            }))
        }
        Some("release") => {
            let previous = state.accounts.release(&name).await?;
            // Release is deliberately not holder-checked; surface handovers
            // where the requester was not the recorded holder.
            if let Some(previous_holder) = &previous {
                if request.adopted_by.as_deref() != Some(previous_holder.as_str()) {
                    tracing::warn!(
                        account = %name,
                        previous_holder = %previous_holder,
                        requested_by = ?request.adopted_by,
                        "released a lease held by a different holder"
                    );
                }
            }
            Ok(Json(AdoptResponse {
                status: "released",
                account_name: name,
                adopted_by: None,
            }))
        }
        _ => Err(ApiError::BadRequest(
            "action must be 'claim' or 'release'".to_string(),
        )),
    }
}

//! Provider proxy endpoints: profile cache refresh and quota probing.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

/// Response for POST /accounts/{name}/fetch-profiles.
#[derive(Debug, Serialize)]
pub struct FetchProfilesResponse {
    pub status: &'static str,
    pub account_name: String,
    pub profiles_fetched: usize,
    pub profile_ids: Vec<String>,
}

/// POST /accounts/{name}/fetch-profiles - Refresh the cached profile list
/// from the provider using the account's credential.
pub async fn fetch_profiles(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<FetchProfilesResponse>> {
    let record = state.accounts.get_account(&name).await?;

    tracing::info!(account = %name, "fetching profile list from provider");
    let profile_ids = state.upstream.list_profiles(&record.token).await?;

    state
        .accounts
        .set_profiles(&name, profile_ids.clone())
        .await?;

    Ok(Json(FetchProfilesResponse {
        status: "success",
        account_name: name,
        profiles_fetched: profile_ids.len(),
        profile_ids,
    }))
}

/// Response for GET /accounts/{name}/check-limit.
#[derive(Debug, Serialize)]
pub struct CheckLimitResponse {
    pub account_name: String,
    pub status: &'static str,
    pub limit_reached: bool,
}

/// GET /accounts/{name}/check-limit - Probe whether the account's free
/// request quota at the provider is exhausted.
pub async fn check_limit(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<CheckLimitResponse>> {
    let record = state.accounts.get_account(&name).await?;

    let limit = state.upstream.check_limit(&record.token).await?;
    if limit.limit_reached {
        tracing::warn!(account = %name, "provider request quota exhausted");
    }

    Ok(Json(CheckLimitResponse {
        account_name: name,
        status: if limit.limit_reached {
            "limit_exceeded"
        } else {
            "ok"
        },
        limit_reached: limit.limit_reached,
    }))
}

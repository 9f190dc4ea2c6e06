//! Per-account stats endpoints.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::Serialize;
use serde_json::Value;

/// GET /accounts/{name}/stats - The saved stats document for an account.
pub async fn get_stats(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Value>> {
    match state.stats.load(&name).await? {
        Some(stats) => Ok(Json(stats)),
        None => Err(ApiError::NotFound(format!(
            "no stats found for account '{name}'"
        ))),
    }
}

/// Response for POST /accounts/{name}/stats.
#[derive(Debug, Serialize)]
pub struct SaveStatsResponse {
    pub status: &'static str,
    pub message: String,
}

/// POST /accounts/{name}/stats - Store a stats document verbatim; the store
/// stamps `last_updated` on the way in.
pub async fn save_stats(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<SaveStatsResponse>> {
    let invalid_body =
        || ApiError::BadRequest("request must include stats data in JSON body".to_string());

    let Json(value) = body.map_err(|_| invalid_body())?;
    let stats = value
        .as_object()
        .filter(|object| !object.is_empty())
        .ok_or_else(invalid_body)?;

    state.stats.save(&name, stats.clone()).await?;

    Ok(Json(SaveStatsResponse {
        status: "success",
        message: format!("stats saved for account '{name}'"),
    }))
}

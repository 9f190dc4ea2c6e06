//! Account registry endpoints.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use aviary_core::account::AccountRecord;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Response for GET /accounts.
#[derive(Debug, Serialize)]
pub struct ListAccountsResponse {
    /// Names of all registered accounts.
    pub accounts: Vec<String>,
}

/// GET /accounts - List the names of all registered accounts.
pub async fn list_accounts(State(state): State<AppState>) -> ApiResult<Json<ListAccountsResponse>> {
    let accounts = state.accounts.account_names().await;
    Ok(Json(ListAccountsResponse { accounts }))
}

/// GET /accounts/{name} - Full record for one account, credential included.
pub async fn get_account(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<AccountRecord>> {
    let record = state.accounts.get_account(&name).await?;
    Ok(Json(record))
}

/// Request body for POST /accounts.
///
/// Both fields are optional at the serde level so a missing field produces a
/// 400 with a useful message rather than a generic deserialization error.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Response for POST /accounts.
#[derive(Debug, Serialize)]
pub struct CreateAccountResponse {
    pub status: &'static str,
    pub message: String,
}

/// POST /accounts - Register (or overwrite) an account with its credential.
pub async fn create_account(
    State(state): State<AppState>,
    body: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreateAccountResponse>)> {
    let missing_fields =
        || ApiError::BadRequest("request must include 'account_name' and 'token'".to_string());

    let Json(request) = body.map_err(|_| missing_fields())?;
    let name = request.account_name.filter(|n| !n.is_empty()).ok_or_else(missing_fields)?;
    let token = request.token.ok_or_else(missing_fields)?;

    state.accounts.upsert_account(&name, &token).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateAccountResponse {
            status: "success",
            message: format!("account '{name}' saved"),
        }),
    ))
}

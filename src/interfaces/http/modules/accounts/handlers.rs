//! Account handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use super::dto::{AccountResponse, TopUpRequest};
use crate::domain::DomainError;
use crate::interfaces::http::common::{domain_error_response, ApiResponse, ValidatedJson};
use crate::interfaces::http::router::AppState;

type HandlerError = (StatusCode, Json<ApiResponse<()>>);

/// `GET /api/v1/accounts/{id}`
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AccountResponse>>, HandlerError> {
    let account = state
        .repos
        .accounts()
        .find_by_id(&id)
        .await
        .map_err(domain_error_response)?
        .ok_or_else(|| {
            domain_error_response(DomainError::NotFound {
                entity: "Account",
                field: "id",
                value: id.clone(),
            })
        })?;
    Ok(Json(ApiResponse::success(account.into())))
}

/// `POST /api/v1/accounts/{id}/top-up`
pub async fn top_up_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<TopUpRequest>,
) -> Result<Json<ApiResponse<AccountResponse>>, HandlerError> {
    let account = state
        .repos
        .accounts()
        .credit(&id, body.amount)
        .await
        .map_err(domain_error_response)?;

    info!(
        account_id = %account.id,
        amount = %body.amount,
        balance = %account.balance,
        note = ?body.note,
        "Account topped up"
    );
    Ok(Json(ApiResponse::success(account.into())))
}

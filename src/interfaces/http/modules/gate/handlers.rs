//! Gate handlers: entry and exit events

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;

use super::dto::{EntryRequest, ExitRequest};
use crate::interfaces::http::common::{domain_error_response, ApiResponse, ValidatedJson};
use crate::interfaces::http::modules::sessions::SessionResponse;
use crate::interfaces::http::router::AppState;

type HandlerError = (StatusCode, Json<ApiResponse<()>>);

/// `POST /api/v1/gate/entries`: open a session
pub async fn record_entry(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<EntryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SessionResponse>>), HandlerError> {
    let session = state
        .gate
        .enter(&body.vehicle_number)
        .await
        .map_err(domain_error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(session.into()))))
}

/// `POST /api/v1/gate/exits`: close and bill the open session
pub async fn record_exit(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<ExitRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, HandlerError> {
    let session = state
        .gate
        .exit(&body.vehicle_number, body.discount.unwrap_or(Decimal::ZERO))
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(session.into())))
}

//! Tariff handlers (read-only)

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use super::dto::{ResolveQuery, TariffResponse};
use crate::interfaces::http::common::{domain_error_response, ApiResponse};
use crate::interfaces::http::router::AppState;

type HandlerError = (StatusCode, Json<ApiResponse<()>>);

/// `GET /api/v1/tariffs`: every tariff with its windows
pub async fn list_tariffs(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TariffResponse>>>, HandlerError> {
    let tariffs = state
        .repos
        .tariffs()
        .list_tariffs()
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(
        tariffs.into_iter().map(Into::into).collect(),
    )))
}

/// `GET /api/v1/tariffs/resolve?at=`: tariff an entry at `at` would be billed with
pub async fn resolve_tariff(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ApiResponse<TariffResponse>>, HandlerError> {
    let at = query.at.unwrap_or_else(Utc::now);
    let tariff = state
        .gate
        .engine()
        .resolver()
        .resolve(state.repos.tariffs(), at)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(tariff.into())))
}

//! Session query handlers (read-only)

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::dto::{SessionHistoryQuery, SessionResponse};
use crate::application::parking::gate::plate;
use crate::domain::DomainError;
use crate::interfaces::http::common::{
    domain_error_response, ApiResponse, PaginatedResponse, PaginationQuery,
};
use crate::interfaces::http::router::AppState;

type HandlerError = (StatusCode, Json<ApiResponse<()>>);

/// `GET /api/v1/sessions/open?page=&limit=`, oldest entry first
pub async fn list_open_sessions(
    State(state): State<AppState>,
    Query(page): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<SessionResponse>>>, HandlerError> {
    let result = state
        .repos
        .sessions()
        .list_open(page.into())
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(result.into())))
}

/// `GET /api/v1/sessions?vehicle_number=&from=&to=`, newest first
pub async fn list_vehicle_sessions(
    State(state): State<AppState>,
    Query(query): Query<SessionHistoryQuery>,
) -> Result<Json<ApiResponse<Vec<SessionResponse>>>, HandlerError> {
    let vehicle_number = plate(&query.vehicle_number).map_err(domain_error_response)?;
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err(domain_error_response(DomainError::Validation(format!(
                "from ({}) is after to ({})",
                from, to
            ))));
        }
    }

    let sessions = state
        .repos
        .sessions()
        .list_for_vehicle(&vehicle_number, query.from, query.to)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(
        sessions.into_iter().map(Into::into).collect(),
    )))
}

/// `GET /api/v1/sessions/{id}`
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<SessionResponse>>, HandlerError> {
    let session = state
        .repos
        .sessions()
        .find_by_id(id)
        .await
        .map_err(domain_error_response)?
        .ok_or_else(|| {
            domain_error_response(DomainError::NotFound {
                entity: "ParkingSession",
                field: "id",
                value: id.to_string(),
            })
        })?;
    Ok(Json(ApiResponse::success(session.into())))
}

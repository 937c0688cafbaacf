//! Domain error to HTTP status mapping

use axum::http::StatusCode;
use axum::Json;
use tracing::error;

use super::ApiResponse;
use crate::domain::DomainError;

pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::SessionAlreadyOpen(_) => StatusCode::CONFLICT,
        DomainError::SessionNotFound(_) | DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::NoTariffForTimestamp(_)
        | DomainError::InvalidTariffConfiguration(_)
        | DomainError::PlateNotRecognized(_)
        | DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::InsufficientBalance { .. } => StatusCode::PAYMENT_REQUIRED,
        DomainError::SessionBusy(_) => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn domain_error_response(err: DomainError) -> (StatusCode, Json<ApiResponse<()>>) {
    let status = status_for(&err);
    if status.is_server_error() && !err.is_transient() {
        error!(error = %err, "Request failed");
    }
    (status, Json(ApiResponse::error(err.to_string())))
}

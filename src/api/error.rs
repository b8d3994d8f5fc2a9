//! HTTP rendering of domain errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::DomainError;

/// An error on its way to the client as `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        let status = match &e {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Authentication(_) => StatusCode::UNAUTHORIZED,
            DomainError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::OrphanedReference { .. }
            | DomainError::Database(_)
            | DomainError::Internal(_) => {
                // Storage details stay in the log.
                tracing::error!("Request failed: {}", e);
                return Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            }
        };

        Self::new(status, e.to_string())
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::from(e).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::validation("bad"), StatusCode::BAD_REQUEST),
            (
                DomainError::Authentication("who".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (DomainError::forbidden("no"), StatusCode::FORBIDDEN),
            (DomainError::not_found("Story"), StatusCode::NOT_FOUND),
            (DomainError::Conflict("dup".into()), StatusCode::CONFLICT),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn storage_errors_are_not_leaked() {
        let err = ApiError::from(DomainError::Database("no such table: stories".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("stories"));

        let orphan = ApiError::from(DomainError::OrphanedReference {
            entity: "notification",
            id: 3,
        });
        assert_eq!(orphan.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}

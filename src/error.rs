use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::handlers::shared::ApiResponse;
use crate::services::registration::JoinRejection;
use crate::services::validation::FieldError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed")]
    ValidationError(Vec<FieldError>),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal server error{}", .0.as_ref().map_or("".to_string(), |s| format!(": {}", s)))]
    InternalServerError(Option<String>),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        log::error!(
            "Request failed with status {}: {}",
            status_code,
            error_message
        );

        match self {
            AppError::ValidationError(errors) => HttpResponse::build(status_code)
                .json(ApiResponse::error_with_data(errors, &error_message)),
            _ => HttpResponse::build(status_code).json(ApiResponse::<()>::error(&error_message)),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        log::error!("Database error: {}", error);

        if let sqlx::Error::Database(db_error) = &error {
            if db_error.is_unique_violation() {
                return AppError::Conflict("Record already exists".to_string());
            }
        }

        AppError::DatabaseError(error)
    }
}

impl AppError {
    pub fn internal_server_error_message(message: impl Into<String>) -> Self {
        AppError::InternalServerError(Some(message.into()))
    }

    pub fn internal_server_error() -> Self {
        AppError::InternalServerError(None)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        log::error!("Anyhow error: {}", error);

        // Check if this is a sqlx::Error and handle it appropriately
        if error.is::<sqlx::Error>() {
            match error.downcast::<sqlx::Error>() {
                Ok(sqlx_err) => return AppError::from(sqlx_err),
                Err(original_error) => {
                    return AppError::InternalServerError(Some(original_error.to_string()));
                }
            }
        }

        AppError::InternalServerError(Some(error.to_string()))
    }
}

impl From<Vec<FieldError>> for AppError {
    fn from(errors: Vec<FieldError>) -> Self {
        AppError::ValidationError(errors)
    }
}

impl From<JoinRejection> for AppError {
    fn from(rejection: JoinRejection) -> Self {
        let message = rejection.to_string();
        match rejection {
            JoinRejection::NotFound => AppError::NotFound(message),
            JoinRejection::AlreadyJoined | JoinRejection::Full { .. } => {
                AppError::Conflict(message)
            }
            JoinRejection::Cancelled | JoinRejection::AlreadyStarted => {
                AppError::BadRequest(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::ValidationError(vec![]).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_full_rejection_maps_to_conflict() {
        let error = AppError::from(JoinRejection::Full { capacity: 4 });
        assert_eq!(error.status_code(), StatusCode::CONFLICT);
        assert!(error.to_string().contains("full"));
    }

    #[test]
    fn test_started_rejection_maps_to_bad_request() {
        let error = AppError::from(JoinRejection::AlreadyStarted);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_server_error_message_format() {
        assert_eq!(
            AppError::internal_server_error().to_string(),
            "Internal server error"
        );
        assert_eq!(
            AppError::internal_server_error_message("boom").to_string(),
            "Internal server error: boom"
        );
    }
}

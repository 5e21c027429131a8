//! Error handling for the HTTP surface.
//!
//! Every handler returns `AppResult<T>`; failures serialize to a consistent
//! `{ "error": { "code", "message" } }` body with the matching status code.
//!
//! ## Mapping policy
//! - Validation failures → 400, before any write
//! - Bad credentials → 401
//! - Missing entities → 404, no partial writes behind them
//! - Conflicts (duplicate identity, linked sale, duplicate category,
//!   invoice-number contention) → 409
//! - Storage failures → 500 with a generic message; details go to the log,
//!   never to the client

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use dukaan_core::CoreError;
use dukaan_db::{DbError, ServiceError};

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid username or password".to_string(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{resource} not found"),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Internal(msg) => {
                // Log the detail, return a generic message
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => AppError::Validation(e.to_string()),
            CoreError::CustomerNotFound(id) => AppError::NotFound(format!("Customer {id}")),
            CoreError::SaleNotFound(id) => AppError::NotFound(format!("Sale {id}")),
            CoreError::ProductNotFound(id) => AppError::NotFound(format!("Product {id}")),
            CoreError::SalesmanNotFound(id) => AppError::NotFound(format!("Salesman {id}")),
            conflict @ CoreError::CustomerAlreadyRegistered { .. } => {
                AppError::Conflict(conflict.to_string())
            }
            conflict @ CoreError::SaleAlreadyLinked { .. } => {
                AppError::Conflict(conflict.to_string())
            }
        }
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AppError::NotFound(format!("{entity} {id}")),
            DbError::UniqueViolation { field, .. } => {
                AppError::Conflict(format!("{field} already exists"))
            }
            DbError::ForeignKeyViolation { message } => AppError::Validation(message),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(e) => e.into(),
            ServiceError::Db(e) => e.into(),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

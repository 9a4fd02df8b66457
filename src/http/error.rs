//! HTTP error handling and response types.
//!
//! Every failure is reported as `{"message": ...}`: clients key off the
//! status code and show the message verbatim.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::ErrorResponse;
use crate::db::repository::RepositoryError;
use crate::services::calculate::CalcError;

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (classification or parameter error)
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Repository(e) => match e {
                RepositoryError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            },
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<CalcError> for AppError {
    fn from(err: CalcError) -> Self {
        match err {
            // Classification and missing-data failures are client errors;
            // storage failures stay fatal server-side errors.
            CalcError::Classify(e) => AppError::BadRequest(e.to_string()),
            CalcError::MissingObservation(_) => AppError::BadRequest(err.to_string()),
            CalcError::Repository(e) => AppError::Repository(e),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

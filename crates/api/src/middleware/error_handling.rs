//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error bodies so every
//! endpoint fails the same way. Handlers return `Result<_, AppError>` and use
//! `?` on anything convertible into a `VollyError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use volly_core::errors::VollyError;

/// Application error wrapper that provides HTTP status code mapping.
///
/// `AppError` wraps domain-specific `VollyError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub VollyError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            VollyError::NotFound(_) => StatusCode::NOT_FOUND,
            VollyError::Validation(_) => StatusCode::BAD_REQUEST,
            VollyError::Conflict(_) => StatusCode::CONFLICT,
            VollyError::Directory(_) => StatusCode::BAD_GATEWAY,
            VollyError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            VollyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Allows using `?` with functions that return `Result<T, VollyError>`.
impl From<VollyError> for AppError {
    fn from(err: VollyError) -> Self {
        AppError(err)
    }
}

/// Allows using `?` with repository functions that return `eyre::Result<T>`,
/// wrapping the report as a database error.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(VollyError::Database(err))
    }
}

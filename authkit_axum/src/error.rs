use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::{Value, json};

use authkit::{CredentialError, UtilError};

/// Error half of every handler result: a status with a JSON body
pub type ApiError = (StatusCode, Json<Value>);

/// JSON error page, `{"error": "<reason>"}`
pub(crate) fn error_body(status: StatusCode) -> ApiError {
    let reason = match status {
        StatusCode::UNAUTHORIZED => "Unauthorized",
        StatusCode::FORBIDDEN => "Forbidden",
        StatusCode::NOT_FOUND => "Not found",
        other => other.canonical_reason().unwrap_or("Error"),
    };
    (status, Json(json!({ "error": reason })))
}

pub(crate) fn error_page(status: StatusCode) -> Response {
    error_body(status).into_response()
}

pub(crate) fn error_message(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

pub(crate) async fn not_found() -> Response {
    error_page(StatusCode::NOT_FOUND)
}

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, ApiError>;
}

/// Map credential failures to the status codes the service promises
impl<T> IntoResponseError<T> for Result<T, CredentialError> {
    fn into_response_error(self) -> Result<T, ApiError> {
        self.map_err(|e| match e {
            CredentialError::AlreadyExists(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "email already registered" })),
            ),
            CredentialError::InvalidCredentials => error_body(StatusCode::UNAUTHORIZED),
            CredentialError::NotFound | CredentialError::InvalidToken => {
                error_body(StatusCode::FORBIDDEN)
            }
            _ => error_body(StatusCode::INTERNAL_SERVER_ERROR),
        })
    }
}

impl<T> IntoResponseError<T> for Result<T, UtilError> {
    fn into_response_error(self) -> Result<T, ApiError> {
        self.map_err(|e| {
            tracing::error!("{}", e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR)
        })
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Placeholder used when an error response carries no body text.
pub const EMPTY_BODY_PLACEHOLDER: &str = "empty response";

/// Standard error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

/// Failure talking to the demand forecasting service.
///
/// Every variant renders with the same "API communication failure" prefix so
/// callers can show a uniform message, while still being able to branch on
/// the cause.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommunicationError {
    /// The request never produced a response (DNS, connect, body read).
    #[error("API communication failure: request failed: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("API communication failure: error fetching data from API: {status} - {body}")]
    Status { status: u16, body: String },

    /// The service answered 2xx but the body is not a demand snapshot.
    #[error("API communication failure: invalid response body: {0}")]
    Decode(String),
}

impl CommunicationError {
    /// Build a status failure, substituting the placeholder for a blank body.
    pub fn status(status: u16, body: &str) -> Self {
        let body = if body.trim().is_empty() {
            EMPTY_BODY_PLACEHOLDER.to_string()
        } else {
            body.to_string()
        };
        CommunicationError::Status { status, body }
    }

    /// HTTP status code, only present for the status cause.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CommunicationError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short cause tag, used in logs.
    pub fn cause(&self) -> &'static str {
        match self {
            CommunicationError::Transport(_) => "transport",
            CommunicationError::Status { .. } => "status",
            CommunicationError::Decode(_) => "decode",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::ExternalServiceError(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
        };

        (status, axum::Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<CommunicationError> for AppError {
    fn from(err: CommunicationError) -> Self {
        AppError::ExternalServiceError(err.to_string())
    }
}

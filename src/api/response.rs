use serde::Serialize;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use crate::error::AppError;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status_code: u16,
    pub timestamp: String,
}

pub fn error(status: StatusCode, message: String) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message,
            status_code: status.as_u16(),
            timestamp: Utc::now().to_rfc3339(),
        }),
    )
}

/// Failure on the upload route, which tells the client which upstream
/// condition occurred instead of collapsing everything to a 500.
#[derive(Debug)]
pub struct UploadError(pub AppError);

impl From<AppError> for UploadError {
    fn from(err: AppError) -> Self {
        UploadError(err)
    }
}

impl UploadError {
    pub fn categorize(&self) -> (StatusCode, String) {
        match &self.0 {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone()),
            AppError::MissingCredential(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error: Gemini API key is missing. Please contact support.".to_string(),
            ),
            AppError::UpstreamUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Document analysis service is temporarily unavailable due to high demand. Please try again later."
                    .to_string(),
            ),
            AppError::EmptyUpstreamReply(_) => (
                StatusCode::BAD_GATEWAY,
                "Document analysis service returned no result. Please try again or contact support.".to_string(),
            ),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("An unexpected error occurred: {}", other),
            ),
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let (status, message) = self.categorize();
        tracing::error!(error = %self.0, %status, "document upload analysis failed");
        error(status, message).into_response()
    }
}

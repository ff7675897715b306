use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};

use crate::api::response;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Invalid base64 content: {0}")]
    InvalidEncoding(String),

    #[error("Model reply is not valid JSON: {0}")]
    MalformedReply(String),

    #[error("{0}")]
    EmptyUpstreamReply(String),

    #[error("Missing {0} environment variable.")]
    MissingCredential(&'static str),

    #[error("Upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Upstream call failed: {0}")]
    UpstreamCallFailed(String),

    #[error("Failed to extract document text: {0}")]
    DocumentExtraction(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Status used by every route that does not categorize failures itself.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        response::error(status, self.to_string()).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::UpstreamCallFailed(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<base64::DecodeError> for AppError {
    fn from(err: base64::DecodeError) -> Self {
        AppError::InvalidEncoding(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

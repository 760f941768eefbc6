use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mosaic_core::MosaicError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing form field: {0}")]
    MissingField(&'static str),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("{what} too large ({actual} vs {max})")]
    ResourceExceeded {
        what: &'static str,
        actual: String,
        max: String,
    },

    #[error("Request body too large: {0}")]
    BodyTooLarge(String),

    #[error("Malformed multipart request: {0}")]
    Multipart(String),

    #[error(transparent)]
    Mosaic(#[from] MosaicError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Shorthand for a limit violation with displayable bounds.
    pub fn exceeded(what: &'static str, actual: impl ToString, max: impl ToString) -> Self {
        ApiError::ResourceExceeded {
            what,
            actual: actual.to_string(),
            max: max.to_string(),
        }
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ApiError::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_)
            | ApiError::InvalidField { .. }
            | ApiError::Multipart(_)
            | ApiError::Mosaic(_) => StatusCode::BAD_REQUEST,
            ApiError::ResourceExceeded { .. } | ApiError::BodyTooLarge(_) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            ApiError::Codec(CodecError::Decode(_)) => StatusCode::BAD_REQUEST,
            ApiError::Codec(CodecError::InvalidQuality(_)) => StatusCode::BAD_REQUEST,
            ApiError::Codec(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::BodyTooLarge(e.body_text())
        } else {
            ApiError::Multipart(e.body_text())
        }
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Unsupported or corrupt image: {0}")]
    Decode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("JPEG encode error: {0}")]
    JpegEncode(String),

    #[error("JPEG quality must be within 0 - 100, got {0}")]
    InvalidQuality(u8),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

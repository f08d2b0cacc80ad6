use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::ServiceError;
use tracing::warn;

/// Wire shape of every error response.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub status: String,
    pub error: String,
}

/// Error returned by user handlers.
///
/// Whatever the cause (store unreadable, corrupt file, bad body, missing
/// user, failed save) the client sees `400 Invalid request.` with the
/// underlying message.
#[derive(Debug)]
pub struct ApiError {
    kind: &'static str,
    message: String,
}

impl ApiError {
    pub const STATUS: StatusCode = StatusCode::BAD_REQUEST;
    pub const STATUS_TEXT: &'static str = "Invalid request.";

    pub fn invalid_request(err: ServiceError) -> Self {
        Self { kind: err.kind(), message: err.to_string() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::invalid_request(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(kind = self.kind, error = %self.message, "request failed");
        let body = ErrorBody { status: Self::STATUS_TEXT.to_string(), error: self.message };
        (Self::STATUS, Json(body)).into_response()
    }
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sensorhub_core::PayloadError;
use serde::Serialize;

/// Body for client errors, unavailability and the test-insert failure.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body for persistence failures on the ingestion and query paths.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Database connection is not established")]
    ServiceUnavailable,

    /// A storage call failed while ingesting or querying.
    #[error("{0}")]
    Storage(String),

    /// A storage call failed on the test-insert endpoint.
    #[error("{0}")]
    Internal(String),
}

impl From<PayloadError> for ApiError {
    fn from(err: PayloadError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        match self {
            ApiError::BadRequest(_) => error_body(StatusCode::BAD_REQUEST, message),
            ApiError::ServiceUnavailable => error_body(StatusCode::SERVICE_UNAVAILABLE, message),
            ApiError::Internal(_) => error_body(StatusCode::INTERNAL_SERVER_ERROR, message),
            ApiError::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusResponse {
                    status: "error",
                    message,
                }),
            )
                .into_response(),
        }
    }
}

fn error_body(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

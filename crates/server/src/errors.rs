use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

use crate::response::ApiResponse;

/// Backend failure surfaced to the client as 500 with `success:false`.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let msg = self.0.to_string();
        error!(error = %msg, "hero store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::failure(msg))).into_response()
    }
}

/// Unreadable request parameters: 400 in the usual `success:false` envelope.
#[derive(Debug)]
pub struct ParamsRejection(pub String);

impl IntoResponse for ParamsRejection {
    fn into_response(self) -> Response {
        warn!(reason = %self.0, "rejected request parameters");
        (StatusCode::BAD_REQUEST, Json(ApiResponse::failure(self.0))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage backend unavailable: {0}")]
    Storage(#[from] ServiceError),
}

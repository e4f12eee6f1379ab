//! Fixed JSON envelope returned by every `/api/users` route.
//!
//! `{success, action?, data?, message?}`; absent fields are omitted.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use models::Hero;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DATA_NOT_EXIST: &str = "Data doesn't exist";
pub const MISSING_USER_ID: &str = "Missing user_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Hero>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse {
    pub fn data(heroes: Vec<Hero>) -> Self {
        Self { success: true, action: None, data: Some(heroes), message: None }
    }

    pub fn action(action: Action) -> Self {
        Self { success: true, action: Some(action), data: None, message: None }
    }

    /// Application-level failure: still answered with 200.
    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, action: None, data: None, message: Some(message.into()) }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

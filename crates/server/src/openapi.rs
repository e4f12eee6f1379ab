use axum::Json;
use utoipa::OpenApi;
use utoipa::ToSchema;

use crate::response::{Action, ApiResponse};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::list_users,
        crate::routes::users::create_user,
        crate::routes::users::update_user,
        crate::routes::users::delete_user,
    ),
    components(schemas(HealthResponse, models::Hero, ApiResponse, Action)),
    tags(
        (name = "health"),
        (name = "users", description = "Hero CRUD"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

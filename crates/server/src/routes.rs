use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::HeroStore;

use crate::{metrics, openapi};

pub mod users;

/// Shared router state: the one hero store every handler talks to.
#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<dyn HeroStore>,
}

impl ServerState {
    pub fn new(store: Arc<dyn HeroStore>) -> Self {
        Self { store }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: `/api/users` plus health, metrics and docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let ops = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/api-docs/openapi.json", get(openapi::openapi_json));

    let users = Router::new().route(
        "/api/users",
        get(users::list_users)
            .post(users::create_user)
            .put(users::update_user)
            .delete(users::delete_user),
    );

    ops.merge(users)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{Request, StatusCode}};
    use service::storage::MemoryHeroStore;
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(ServerState::new(Arc::new(MemoryHeroStore::new())), CorsLayer::very_permissive())
    }

    async fn get_body(uri: &str) -> (StatusCode, String) {
        let resp = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_ok() {
        let (status, body) = get_body("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn metrics_exposes_store_counter() {
        // make sure the counter vec has at least one series
        let _ = get_body("/api/users").await;
        let (status, body) = get_body("/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("heroes_store_operations_total"));
    }

    #[tokio::test]
    async fn openapi_lists_users_path() {
        let (status, body) = get_body("/api-docs/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        let doc: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(doc["paths"]["/api/users"]["get"].is_object());
        assert!(doc["paths"]["/api/users"]["delete"].is_object());
    }

    #[tokio::test]
    async fn openapi_schemas_follow_wire_types() {
        let (_, body) = get_body("/api-docs/openapi.json").await;
        let doc: serde_json::Value = serde_json::from_str(&body).unwrap();
        let schemas = &doc["components"]["schemas"];
        let hero = &schemas["Hero"]["properties"];
        for field in ["userId", "userName", "nameAlias", "company"] {
            assert!(hero[field].is_object(), "Hero schema lacks {field}");
        }
        let envelope = &schemas["ApiResponse"]["properties"];
        for field in ["success", "action", "data", "message"] {
            assert!(envelope[field].is_object(), "ApiResponse schema lacks {field}");
        }
        assert_eq!(schemas["Action"]["enum"], serde_json::json!(["insert", "update", "delete"]));
    }

    #[tokio::test]
    async fn other_methods_are_not_routed() {
        let resp = app()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/api/users?user_id=tonys")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use service::{storage::MemoryHeroStore, HeroStore};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use server::routes::{self, ServerState};

struct TestApp {
    base_url: String,
}

impl TestApp {
    fn users(&self) -> String {
        format!("{}/api/users", self.base_url)
    }
}

async fn start_server(store: Arc<dyn HeroStore>) -> anyhow::Result<TestApp> {
    let app: Router = routes::build_router(ServerState::new(store), CorsLayer::very_permissive());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

async fn memory_app() -> anyhow::Result<TestApp> {
    start_server(Arc::new(MemoryHeroStore::new())).await
}

async fn body(res: reqwest::Response) -> anyhow::Result<(HttpStatusCode, Value)> {
    let status = res.status();
    let ct = res.headers().get("content-type").and_then(|v| v.to_str().ok()).map(str::to_string);
    assert_eq!(ct.as_deref(), Some("application/json"));
    Ok((status, res.json::<Value>().await?))
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = memory_app().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_hero_lifecycle() -> anyhow::Result<()> {
    let app = memory_app().await?;
    let c = reqwest::Client::new();

    // create
    let res = c
        .post(app.users())
        .query(&[
            ("user_id", "tonys"),
            ("user_name", "Tony Stark"),
            ("name_alias", "Iron Man"),
            ("company", "Stark Industries"),
        ])
        .send()
        .await?;
    let (status, created) = body(res).await?;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(created, json!({"success": true, "action": "insert"}));

    let (_, listed) = body(c.get(app.users()).send().await?).await?;
    assert_eq!(
        listed["data"],
        json!([{
            "userId": "tonys",
            "userName": "Tony Stark",
            "nameAlias": "Iron Man",
            "company": "Stark Industries"
        }])
    );

    // partial update via form body
    let res = c
        .put(app.users())
        .form(&[("user_id", "tonys"), ("company", "New Avengers")])
        .send()
        .await?;
    let (status, updated) = body(res).await?;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(updated, json!({"success": true, "action": "update"}));

    let (_, listed) = body(c.get(app.users()).send().await?).await?;
    assert_eq!(listed["data"][0]["userName"], "Tony Stark");
    assert_eq!(listed["data"][0]["nameAlias"], "Iron Man");
    assert_eq!(listed["data"][0]["company"], "New Avengers");

    // delete twice
    for _ in 0..2 {
        let res = c.delete(app.users()).query(&[("user_id", "tonys")]).send().await?;
        let (status, deleted) = body(res).await?;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(deleted, json!({"success": true, "action": "delete"}));
    }

    let (_, listed) = body(c.get(app.users()).send().await?).await?;
    assert_eq!(listed, json!({"success": true, "data": []}));
    Ok(())
}

#[tokio::test]
async fn e2e_update_unknown_hero() -> anyhow::Result<()> {
    let app = memory_app().await?;
    let c = reqwest::Client::new();
    let res = c
        .put(app.users())
        .query(&[("user_id", "ghost"), ("user_name", "Nobody")])
        .send()
        .await?;
    let (status, out) = body(res).await?;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(out, json!({"success": false, "message": "Data doesn't exist"}));

    let (_, listed) = body(c.get(app.users()).send().await?).await?;
    assert_eq!(listed["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn e2e_delete_unknown_hero() -> anyhow::Result<()> {
    let app = memory_app().await?;
    let res = reqwest::Client::new()
        .delete(app.users())
        .query(&[("user_id", "unknown")])
        .send()
        .await?;
    let (status, out) = body(res).await?;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(out, json!({"success": true, "action": "delete"}));
    Ok(())
}

#[tokio::test]
async fn e2e_sqlite_backed_store() -> anyhow::Result<()> {
    let mut cfg = configs::AppConfig::default();
    cfg.storage.backend = configs::StorageBackend::Database;
    cfg.database.url = "sqlite::memory:".into();
    cfg.database.max_connections = 1;
    cfg.database.min_connections = 1;
    cfg.normalize_and_validate()?;

    let store = service::storage::connect(&cfg).await?;
    let app = start_server(store).await?;
    let c = reqwest::Client::new();

    c.post(app.users())
        .query(&[("user_id", "peterp"), ("user_name", "Peter Parker"), ("name_alias", "Spider-Man"), ("company", "Daily Bugle")])
        .send()
        .await?;
    let (_, out) = body(c.put(app.users()).query(&[("user_id", "peterp"), ("company", "Stark Internship")]).send().await?).await?;
    assert_eq!(out["action"], "update");

    let (_, listed) = body(c.get(app.users()).send().await?).await?;
    assert_eq!(listed["data"][0]["nameAlias"], "Spider-Man");
    assert_eq!(listed["data"][0]["company"], "Stark Internship");
    Ok(())
}

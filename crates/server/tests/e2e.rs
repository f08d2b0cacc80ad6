use std::net::SocketAddr;

use configs::AppConfig;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestApp {
    base_url: String,
    store_path: std::path::PathBuf,
}

async fn start_server(serialize_writes: bool) -> anyhow::Result<TestApp> {
    let store_path = std::env::temp_dir().join(format!("e2e_users_{}.json", Uuid::new_v4()));
    let mut cfg = AppConfig::default();
    cfg.store.path = store_path.to_string_lossy().into_owned();
    cfg.store.serialize_writes = serialize_writes;

    let app = server::build_app(&cfg).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url, store_path })
}

#[tokio::test]
async fn crud_over_tcp() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let c = reqwest::Client::new();
    let users = format!("{}/api/v1/users/", app.base_url);

    let resp = c.post(&users).json(&json!({"display_name": "A", "email": "a@x.com"})).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::CREATED);
    let created: Value = resp.json().await?;
    let id = created["user_id"].as_str().unwrap_or_default().to_string();
    assert_eq!(id, "1");

    let one = format!("{users}{id}/");
    let resp = c.patch(&one).json(&json!({"display_name": "B"})).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::NO_CONTENT);

    let user: Value = c.get(&one).send().await?.json().await?;
    assert_eq!(user["display_name"], "B");
    assert_eq!(user["email"], "a@x.com");

    let resp = c.delete(&one).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::NO_CONTENT);

    let resp = c.get(&one).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::BAD_REQUEST);
    let body: Value = resp.json().await?;
    assert_eq!(body, json!({"status": "Invalid request.", "error": "user_not_found"}));

    let _ = tokio::fs::remove_file(&app.store_path).await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn serialized_writes_keep_concurrent_creates() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let c = reqwest::Client::new();
    let users = format!("{}/api/v1/users/", app.base_url);

    let mut tasks = Vec::new();
    for i in 0..20 {
        let c = c.clone();
        let users = users.clone();
        tasks.push(tokio::spawn(async move {
            c.post(&users)
                .json(&json!({"display_name": format!("u{i}"), "email": "u@x.com"}))
                .send()
                .await
                .map(|r| r.status())
        }));
    }
    for t in tasks {
        assert_eq!(t.await??, HttpStatusCode::CREATED);
    }

    let all: Value = c.get(&users).send().await?.json().await?;
    assert_eq!(all.as_object().map(|m| m.len()), Some(20));

    let _ = tokio::fs::remove_file(&app.store_path).await;
    Ok(())
}

#[tokio::test]
async fn run_until_drains_on_shutdown() -> anyhow::Result<()> {
    let store_path = std::env::temp_dir().join(format!("e2e_users_{}.json", Uuid::new_v4()));
    let port = std::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))?.local_addr()?.port();
    let mut cfg = AppConfig::default();
    cfg.server.host = "127.0.0.1".into();
    cfg.server.port = port;
    cfg.store.path = store_path.to_string_lossy().into_owned();

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(server::run_until(cfg, async move {
        let _ = stop_rx.await;
    }));

    let c = reqwest::Client::new();
    let health = format!("http://127.0.0.1:{port}/health");
    let mut up = false;
    for _ in 0..50 {
        if let Ok(resp) = c.get(&health).send().await {
            assert_eq!(resp.status(), HttpStatusCode::OK);
            up = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert!(up, "server never came up");

    drop(c);
    let _ = stop_tx.send(());
    tokio::time::timeout(std::time::Duration::from_secs(5), server).await???;

    let _ = tokio::fs::remove_file(&store_path).await;
    Ok(())
}

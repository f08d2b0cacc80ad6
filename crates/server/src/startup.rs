use std::{future::Future, net::SocketAddr, time::Duration};

use axum::Router;
use configs::AppConfig;
use tracing::info;

use crate::routes::{self, AppState, RouterOptions};
use service::runtime;

/// Open the store described by `cfg` and build the router around it.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let users = runtime::open_user_service(
        &cfg.store.path,
        cfg.store.create_if_missing,
        cfg.store.serialize_writes,
    )
    .await?;

    let opts = RouterOptions {
        request_timeout: Duration::from_secs(cfg.server.request_timeout_secs),
    };
    Ok(routes::build_router(AppState { users }, opts))
}

/// Public entry: build the app and serve until the process is stopped.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    run_until(cfg, std::future::pending()).await
}

/// Serve until `shutdown` resolves, then stop accepting connections and let
/// in-flight requests finish so no store write is cut short.
pub async fn run_until<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(&cfg).await?;

    let addr: SocketAddr = cfg.bind_addr().parse()?;
    info!(%addr, store = %cfg.store.path, "starting user store server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!(%addr, "user store server drained");
    Ok(())
}

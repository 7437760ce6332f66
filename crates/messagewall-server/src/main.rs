mod config;

use std::sync::Arc;

use tracing::info;

use messagewall_api::{AppStateInner, router};
use messagewall_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "messagewall_server=debug,messagewall_api=debug,messagewall_db=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let db = Database::open(&config.db_path)?;
    let state = Arc::new(AppStateInner::new(db));

    let app = router(state, config.cors_origin.clone());

    let addr = config.addr()?;
    info!("API on http://{}", addr);
    info!("Accepting cross-origin requests from {:?}", config.cors_origin);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    tracing::warn!("SIGTERM handler unavailable: {}", e);
                    ctrl_c.await.ok();
                    info!("Received Ctrl+C, shutting down...");
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}

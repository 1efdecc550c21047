//! Binary entrypoint for the HBnB HTTP server.
//!
//! Configuration comes from environment variables; see
//! [`hbnb_server::config`] and [`hbnb_storage::StorageConfig`].

use anyhow::Context;

use hbnb_server::config::ServerConfig;
use hbnb_server::router::build_router;
use hbnb_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env()?;
    let state = AppState::new(&config.storage)
        .with_context(|| format!("failed to open storage {}", config.storage))?;

    let app = build_router(state);

    let addr = config.addr();
    tracing::info!("hbnb api starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}

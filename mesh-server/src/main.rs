use anyhow::{Context, Result};
use clap::Parser;
use mesh_server::{ServerConfig, build_router, spawn_room};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::parse();
    info!("Starting mesh-server v{}", env!("CARGO_PKG_VERSION"));

    let (service, _room) = spawn_room(config.ice_servers());
    let app = build_router(service);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!("Signaling server listening on http://{}", config.bind);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

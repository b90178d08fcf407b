use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use meetstream::control::{LogNotifier, RestControlApi};
use meetstream::identity::StaticIdentity;
use meetstream::{create_router, AppState, Config};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "meetstream", about = "Live meeting-assistant sync service")]
struct Args {
    /// Path to the config file (without extension)
    #[arg(long, default_value = "config/meetstream")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} starting", cfg.service.name);
    info!(
        "stream edge: {} (secure={})",
        cfg.stream.host, cfg.stream.secure
    );

    let state = AppState::new(
        cfg.stream.clone(),
        Arc::new(StaticIdentity::new(&cfg.identity)),
        Arc::new(RestControlApi::new(cfg.control.base_url.clone())),
        Arc::new(LogNotifier),
    );

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);
    axum::serve(listener, create_router(state)).await?;

    Ok(())
}

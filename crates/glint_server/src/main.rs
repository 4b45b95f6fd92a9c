use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use glint_server::{routes, AppState, Broadcaster, Config};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = Config::parse();

    let hub = Arc::new(Broadcaster::new(config.render_options()));
    let state = AppState {
        hub,
        client: reqwest::Client::new(),
        palette_url: config.palette_url.clone(),
    };
    let app = routes::router(state, &config.assets);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

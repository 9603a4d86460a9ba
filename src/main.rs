use std::sync::Arc;

use ragline::api::{self, state::AppState};
use ragline::config::ServerConfig;
use ragline::engine::EchoEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing logger
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ragline=debug".into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .init();

    let config = ServerConfig::from_env();
    tracing::info!("Starting ragline server");

    let engine = Arc::new(EchoEngine::new());
    let state = AppState::new(engine).with_stream_options(config.stream_options());

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("ragline running on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

mod config;
mod corpus;
mod engine;
mod errors;
mod models;
mod recommendation;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::engine::fitted::{fit_from_path, ModelHandle};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing CORPUS_PATH or invalid values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Badge API v{}", env!("CARGO_PKG_VERSION"));

    // Fit the model before accepting any request; a bad corpus is fatal
    let corpus_path = config.corpus_path.clone();
    let options = config.fit_options();
    let model = tokio::task::spawn_blocking(move || fit_from_path(&corpus_path, &options))
        .await
        .context("model fit task panicked")?
        .with_context(|| format!("failed to fit model from {}", config.corpus_path.display()))?;
    info!("Model generation {} ready", model.generation());

    let state = AppState {
        config: config.clone(),
        model: ModelHandle::new(model),
    };

    // The browser frontend calls this service cross-origin
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

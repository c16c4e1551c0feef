mod analysis;
mod announcements;
mod catalog;
mod config;
mod errors;
mod models;
mod render;
mod routes;
mod seo;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::{ContentSource, InMemoryCatalog};
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Syndication API v{}", env!("CARGO_PKG_VERSION"));

    // Load the content catalog; a misconfigured template aborts startup here
    let catalog = match &config.catalog_path {
        Some(path) => InMemoryCatalog::load(path).await?,
        None => {
            info!("CATALOG_PATH not set; serving the built-in sample catalog");
            InMemoryCatalog::sample()?
        }
    };
    let source: Arc<dyn ContentSource> = Arc::new(catalog);

    info!(
        "Canonical fallback domain: {}://{}",
        config.url_scheme, config.network_default_domain
    );

    let state = AppState {
        config: config.clone(),
        source,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        // TODO: restrict CORS origins to the authoring tool's domain
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

mod config;
mod db;
mod errors;
mod extract;
mod ingest;
mod matching;
mod models;
mod resume;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::postgres::PgStore;
use crate::store::{MemoryStore, TrackingStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobSift API v{}", env!("CARGO_PKG_VERSION"));

    // Tracking store: Postgres when configured, otherwise in-process
    let store: Arc<dyn TrackingStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            info!("Tracking store: PostgreSQL");
            Arc::new(PgStore::new(pool))
        }
        None => {
            info!("Tracking store: in-memory (DATABASE_URL not set)");
            Arc::new(MemoryStore::new())
        }
    };

    info!(
        "Default threshold {}, upload limit {} bytes, JSON body limit {} bytes",
        config.default_threshold, config.max_upload_bytes, config.max_body_bytes
    );

    let state = AppState::new(config.clone(), store);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

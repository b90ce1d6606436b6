use std::sync::Arc;

use server::{build_router, config::load_settings, AppState};
use server_api::ApiContext;
use storage::{load_seed_file, MemoryPartyStore, PartyRepository};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&settings.log_filter)?)
        .init();

    let store = MemoryPartyStore::new();
    if let Some(path) = &settings.seed_file {
        let parties = load_seed_file(path)?;
        let inserted = store.seed(parties).await?;
        info!(path = %path.display(), inserted, "seeded party store");
    }

    let parties = store.len().await;
    let state = AppState {
        api: ApiContext::new(store),
    };
    let app = build_router(Arc::new(state));

    let addr = settings.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, parties, "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

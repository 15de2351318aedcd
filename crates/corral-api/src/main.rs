//! Corral API Server

use anyhow::Context;
use corral_api::{AppState, routes, seed_jobs};
use corral_config::{SystemConfig, load_jobs};
use corral_core::discovery::{
    Endpoint, JsonCodec, ServiceInstance, Status, serialize_service_instance,
};
use corral_store::MemJobStore;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var("CORRAL_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("corral.kdl"));
    let config = SystemConfig::load(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    corral_logging::init_tracing(&config.logging)?;
    info!(path = %config_path.display(), bind = %config.bind, "Configuration loaded");

    let store = Arc::new(MemJobStore::new());
    if let Some(jobs_file) = &config.jobs_file {
        let jobs = load_jobs(jobs_file)
            .with_context(|| format!("failed to load jobs from {}", jobs_file.display()))?;
        seed_jobs(store.as_ref(), jobs);
    }

    let instance = ServiceInstance {
        service_endpoint: Endpoint::new(config.hostname.clone(), config.bind.port()),
        additional_endpoints: BTreeMap::new(),
        status: Status::Alive,
    };
    let payload = serialize_service_instance(
        instance.service_endpoint.clone(),
        instance.additional_endpoints.clone(),
        instance.status,
        &JsonCodec,
    )?;
    info!(
        payload = %String::from_utf8_lossy(&payload),
        "Service instance registration"
    );

    let state = AppState::new(store, instance);

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    info!("Starting server on {}", config.bind);
    let listener = TcpListener::bind(config.bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

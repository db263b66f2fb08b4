//! HTTP server initialization and runtime setup.
//!
//! Loads the reference taxonomy, builds the repositories and services, and
//! runs the Axum server until shutdown.

use crate::config::Config;
use crate::infrastructure::persistence::{InMemoryProgramRepository, InMemoryTaxonomyRepository};
use crate::infrastructure::seed::TaxonomySeed;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Builds application state from configuration.
///
/// # Errors
///
/// Returns an error if the taxonomy seed file cannot be read.
pub fn build_state(config: &Config) -> Result<AppState> {
    let seed = match &config.taxonomy_seed {
        Some(path) => TaxonomySeed::from_file(path)?,
        None => TaxonomySeed::builtin(),
    };
    let taxonomy = seed.into_taxonomy();
    tracing::info!(
        cancers = taxonomy.cancers.len(),
        primary_sites = taxonomy.primary_sites.len(),
        countries = taxonomy.countries.len(),
        institutions = taxonomy.institutions.len(),
        regions = taxonomy.regions.len(),
        "Taxonomy loaded"
    );

    Ok(AppState::new(
        Arc::new(InMemoryProgramRepository::new()),
        Arc::new(InMemoryTaxonomyRepository::new(taxonomy)),
        config.invitation_ttl_days,
    ))
}

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - The taxonomy seed cannot be loaded
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config)?;

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}

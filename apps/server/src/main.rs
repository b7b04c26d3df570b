// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geoproc Server binary.

use anyhow::Context;
use geoproc_processes::{ProcessKind, ProcessRegistry};
use geoproc_server::{build_router, config::Config, services::DiskCache, AppState};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,tower_http=debug,geoproc_server=debug".into()),
        )
        .pretty()
        .init();

    let config = Config::from_env();

    tracing::info!(
        port = config.port,
        data_dir = %config.data_dir.display(),
        cache_dir = %config.cache_dir,
        cache_enabled = config.cache_enabled,
        worker_threads = config.worker_threads,
        "Starting Geoproc Server"
    );

    // Initialize rayon thread pool
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build_global()
        .context("Failed to initialize rayon thread pool")?;

    let registry = ProcessRegistry::new();
    let missing = registry.missing();
    if !missing.is_empty() {
        anyhow::bail!("process registry is incomplete, missing: {:?}", missing);
    }
    tracing::info!(processes = ProcessKind::ALL.len(), "Process registry ready");

    let cache = Arc::new(DiskCache::new(&config.cache_dir).await);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState {
        cache,
        config: Arc::new(config),
        registry: Arc::new(registry),
    };
    let app = build_router(state);

    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

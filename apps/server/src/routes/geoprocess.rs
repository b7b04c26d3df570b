// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geoprocessing endpoint.

use crate::error::ApiError;
use crate::services::{build_process, execute, DiskCache};
use crate::types::{CachedResult, GeoprocessRequest};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};

const X_CACHE: &str = "x-cache";

fn into_response(result: CachedResult, cache_status: &'static str) -> Result<Response, ApiError> {
    let content_type = HeaderValue::from_str(&result.content_type)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::HeaderName::from_static(X_CACHE),
                HeaderValue::from_static(cache_status),
            ),
        ],
        result.body,
    )
        .into_response())
}

/// POST /api/v1/geoprocess/:name - Run one process.
///
/// Requests whose inputs are all inline are cached by process name and body.
/// File-backed inputs can change on disk, so those runs are never cached.
pub async fn run(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<GeoprocessRequest>,
) -> Result<Response, ApiError> {
    // Fail fast on unknown names before touching the cache
    let process = build_process(&state.registry, &name, request.clone(), &state.config.data_dir)?;

    let cache_key = if state.config.cache_enabled && request.is_self_contained() {
        let body = serde_json::to_vec(&request)?;
        Some(DiskCache::generate_key(process.type_name(), &body))
    } else {
        None
    };

    if let Some(key) = &cache_key {
        if let Some(cached) = state.cache.get::<CachedResult>(key).await? {
            tracing::info!(cache_key = %key, process = %name, "Cache HIT");
            return into_response(cached, "HIT");
        }
        tracing::info!(cache_key = %key, process = %name, "Cache MISS - processing");
    }

    // Process on blocking thread pool (CPU-intensive)
    let result = tokio::task::spawn_blocking(move || execute(process)).await??;

    if let Some(key) = cache_key {
        let cache = state.cache.clone();
        let to_cache = result.clone();
        tokio::spawn(async move {
            if let Err(e) = cache.set(&key, &to_cache).await {
                tracing::error!(error = %e, "Failed to cache result");
            }
        });
    }

    into_response(result, "MISS")
}

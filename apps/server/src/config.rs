// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Root directory that file inputs are resolved against.
    pub data_dir: PathBuf,
    /// Directory for cache storage.
    pub cache_dir: String,
    /// Cache results of requests whose inputs are all inline.
    pub cache_enabled: bool,
    /// Maximum request body size in MB.
    pub max_body_size_mb: usize,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Number of worker threads for parallel processing.
    pub worker_threads: usize,
    /// Allowed CORS origins (comma-separated, or "*" for all).
    pub cors_origins: Vec<String>,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            port: env_or("PORT", 8080),
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            cache_dir: std::env::var("CACHE_DIR").unwrap_or_else(|_| {
                // Docker images ship /app/cache; local runs use ./.cache
                if std::path::Path::new("/.dockerenv").exists() {
                    "/app/cache".into()
                } else {
                    std::env::current_dir()
                        .ok()
                        .and_then(|dir| dir.join(".cache").to_str().map(|s| s.to_string()))
                        .unwrap_or_else(|| "./.cache".into())
                }
            }),
            cache_enabled: env_or("CACHE_ENABLED", true),
            max_body_size_mb: env_or("MAX_BODY_SIZE_MB", 50),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 120),
            worker_threads: env_or("WORKER_THREADS", num_cpus::get()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

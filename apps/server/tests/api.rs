// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Router-level tests driven through `tower::ServiceExt::oneshot`.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use geoproc_processes::ProcessRegistry;
use geoproc_server::{build_router, config::Config, services::DiskCache, AppState};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

async fn app(tag: &str, cache_enabled: bool) -> Router {
    let cache_dir = std::env::temp_dir().join(format!(
        "geoproc-server-test-{}-{}",
        tag,
        std::process::id()
    ));
    let config = Config {
        port: 0,
        data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests"),
        cache_dir: cache_dir.to_string_lossy().into_owned(),
        cache_enabled,
        max_body_size_mb: 1,
        request_timeout_secs: 30,
        worker_threads: 2,
        cors_origins: vec!["*".into()],
    };
    let cache = Arc::new(DiskCache::new(&config.cache_dir).await);
    build_router(AppState {
        cache,
        config: Arc::new(config),
        registry: Arc::new(ProcessRegistry::new()),
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let cache = response
        .headers()
        .get("x-cache")
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, cache, serde_json::from_slice(&bytes).unwrap())
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn buffer_request() -> Value {
    json!({
        "inputs": [{
            "name": "input",
            "source": {
                "type": "geojson",
                "data": {"type": "Point", "coordinates": [0.0, 0.0]}
            }
        }],
        "args": {"buffer_size": 2.0}
    })
}

#[tokio::test]
async fn test_health() {
    let request = Request::get("/api/v1/health").body(Body::empty()).unwrap();
    let (status, _, body) = send(app("health", false).await, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_list_processes() {
    let request = Request::get("/api/v1/processes").body(Body::empty()).unwrap();
    let (status, _, body) = send(app("list", false).await, request).await;
    assert_eq!(status, StatusCode::OK);

    let processes = body["processes"].as_array().unwrap();
    assert_eq!(processes.len(), 9);
    let buffer = processes.iter().find(|p| p["name"] == "buffer").unwrap();
    assert_eq!(buffer["type_name"], "BufferProcess");
    assert_eq!(buffer["required_args"], json!(["buffer_size"]));
    assert_eq!(buffer["required_inputs"][0]["role"], "input");
}

#[tokio::test]
async fn test_buffer_point() {
    let (status, cache, body) = send(
        app("buffer", false).await,
        post("/api/v1/geoprocess/Buffer", buffer_request()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache.as_deref(), Some("MISS"));
    assert_eq!(body["type"], "FeatureCollection");
    let features = body["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["geometry"]["type"], "Polygon");
}

#[tokio::test]
async fn test_repeat_request_hits_cache() {
    let router = app("cache", true).await;
    let (_, first, _) = send(
        router.clone(),
        post("/api/v1/geoprocess/buffer", buffer_request()),
    )
    .await;
    assert_eq!(first.as_deref(), Some("MISS"));

    // The cache write happens in the background
    let mut hit = None;
    for _ in 0..50 {
        let (status, cache, _) = send(
            router.clone(),
            post("/api/v1/geoprocess/buffer", buffer_request()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        if cache.as_deref() == Some("HIT") {
            hit = cache;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert_eq!(hit.as_deref(), Some("HIT"));
}

#[tokio::test]
async fn test_unknown_process_is_404() {
    let (status, _, body) = send(
        app("unknown", false).await,
        post("/api/v1/geoprocess/reproject", json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "UNKNOWN_PROCESS");
}

#[tokio::test]
async fn test_missing_argument_is_400() {
    let mut request = buffer_request();
    request["args"] = json!({});
    let (status, _, body) = send(
        app("missing-arg", false).await,
        post("/api/v1/geoprocess/buffer", request),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("buffer_size"));
}

#[tokio::test]
async fn test_file_path_escape_is_rejected() {
    let request = json!({
        "inputs": [{
            "name": "input",
            "source": {"type": "file", "path": "../Cargo.toml"}
        }],
        "args": {"buffer_size": 1.0}
    });
    let (status, _, _) = send(
        app("escape", false).await,
        post("/api/v1/geoprocess/buffer", request),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_file_input_within() {
    let request = json!({
        "inputs": [
            {"name": "first", "source": {"type": "file", "path": "fixtures/points.geojson"}},
            {
                "name": "second",
                "source": {
                    "type": "geojson",
                    "data": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]]]
                    }
                }
            }
        ]
    });
    let (status, cache, body) = send(
        app("file", true).await,
        post("/api/v1/geoprocess/within", request),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // File-backed requests bypass the cache entirely
    assert_eq!(cache.as_deref(), Some("MISS"));
    let ids: Vec<&str> = body["features"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["inside"]);
}

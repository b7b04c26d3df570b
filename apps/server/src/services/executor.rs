// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Turns a request into a populated process and runs it.

use crate::error::ApiError;
use crate::types::{CachedResult, GeoprocessRequest, SourceRequest};
use geoproc_core::{Format, GeoJsonFileSource, InlineGeoJsonSource, Input};
use geoproc_processes::{Process, ProcessArgs, ProcessRegistry};
use std::path::{Component, Path, PathBuf};

/// Resolve a request-supplied path under `data_dir`.
///
/// Only plain relative paths are accepted; absolute paths and `..` are rejected.
/// The result is canonicalized and must still lie under `data_dir`, so symlinks
/// cannot lead out of it.
pub fn resolve_data_path(data_dir: &Path, requested: &str) -> Result<PathBuf, ApiError> {
    let relative = Path::new(requested);
    let plain = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if requested.is_empty() || !plain {
        return Err(ApiError::BadRequest(format!(
            "file path '{}' must be relative to the data directory",
            requested
        )));
    }

    let root = data_dir.canonicalize().map_err(|e| {
        ApiError::Internal(format!(
            "data directory '{}' is unavailable: {}",
            data_dir.display(),
            e
        ))
    })?;
    let resolved = root
        .join(relative)
        .canonicalize()
        .map_err(|_| ApiError::BadRequest(format!("file '{}' not found", requested)))?;
    if !resolved.starts_with(&root) {
        tracing::warn!(path = %requested, "Rejected file input outside the data directory");
        return Err(ApiError::BadRequest(format!(
            "file path '{}' resolves outside the data directory",
            requested
        )));
    }
    Ok(resolved)
}

/// Create the named process and attach the request's inputs and arguments.
///
/// No data is read here; inputs are materialized by `compute()`.
pub fn build_process(
    registry: &ProcessRegistry,
    name: &str,
    request: GeoprocessRequest,
    data_dir: &Path,
) -> Result<Process, ApiError> {
    let mut process = registry.create(name)?;

    for input in request.inputs {
        let io = match input.source {
            SourceRequest::Geojson { data } => {
                Input::new(input.name, input.format, InlineGeoJsonSource::new(data))
            }
            SourceRequest::File { path } => {
                let full = resolve_data_path(data_dir, &path)?;
                Input::new(input.name, input.format, GeoJsonFileSource::new(full))
            }
        };
        process.add_input(io);
    }
    process.args = ProcessArgs::from(request.args);

    Ok(process)
}

/// Compute the process and serialize its output.
///
/// JSON objects are returned as `application/json`; anything else is treated
/// as raster data.
pub fn execute(mut process: Process) -> Result<CachedResult, ApiError> {
    let start = std::time::Instant::now();
    process.compute()?;

    let output = process
        .output()
        .ok_or_else(|| ApiError::Internal("process produced no output".into()))?;
    let body = output.read(Format::Json)?;

    let is_object = serde_json::from_str::<serde_json::Value>(&body)
        .map(|v| v.is_object())
        .unwrap_or(false);
    let content_type = if is_object {
        "application/json"
    } else {
        "image/tiff"
    };

    tracing::info!(
        process = process.type_name(),
        bytes = body.len(),
        content_type,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Process finished"
    );

    Ok(CachedResult {
        content_type: content_type.to_string(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InputRequest;
    use serde_json::json;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("geoproc-exec-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(dir.join("cities")).unwrap();
        dir
    }

    #[test]
    fn test_resolve_rejects_escapes() {
        let root = scratch_dir("escapes");
        assert!(resolve_data_path(&root, "../etc/passwd").is_err());
        assert!(resolve_data_path(&root, "/etc/passwd").is_err());
        assert!(resolve_data_path(&root, "a/../../b").is_err());
        assert!(resolve_data_path(&root, "").is_err());
        assert!(matches!(
            resolve_data_path(&root, "cities/missing.geojson"),
            Err(ApiError::BadRequest(_))
        ));

        std::fs::write(root.join("cities/points.geojson"), "{}").unwrap();
        assert_eq!(
            resolve_data_path(&root, "cities/points.geojson").unwrap(),
            root.canonicalize().unwrap().join("cities/points.geojson")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_rejects_symlink_out_of_root() {
        let root = scratch_dir("symlink");
        let outside = std::env::temp_dir().join(format!("geoproc-exec-outside-{}.geojson", std::process::id()));
        std::fs::write(&outside, "{}").unwrap();
        let link = root.join("cities/leak.geojson");
        let _ = std::fs::remove_file(&link);
        std::os::unix::fs::symlink(&outside, &link).unwrap();

        assert!(matches!(
            resolve_data_path(&root, "cities/leak.geojson"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_build_and_execute_union() {
        let request = GeoprocessRequest {
            inputs: vec![
                InputRequest {
                    name: "first".into(),
                    format: Format::Vector,
                    source: SourceRequest::Geojson {
                        data: json!({"type": "Point", "coordinates": [0.0, 0.0]}),
                    },
                },
                InputRequest {
                    name: "second".into(),
                    format: Format::Vector,
                    source: SourceRequest::Geojson {
                        data: json!({"type": "Point", "coordinates": [1.0, 1.0]}),
                    },
                },
            ],
            args: Default::default(),
        };

        let process =
            build_process(&ProcessRegistry::new(), "union", request, Path::new(".")).unwrap();
        assert_eq!(process.inputs.len(), 2);

        let result = execute(process).unwrap();
        assert_eq!(result.content_type, "application/json");
        let doc: serde_json::Value = serde_json::from_str(&result.body).unwrap();
        assert_eq!(doc["features"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_process() {
        let err = build_process(
            &ProcessRegistry::new(),
            "reproject",
            GeoprocessRequest::default(),
            Path::new("."),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::UnknownProcess(_)));
    }
}

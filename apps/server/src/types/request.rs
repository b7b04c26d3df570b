// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request types for the API.

use geoproc_core::Format;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/geoprocess/:name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoprocessRequest {
    /// Inputs, each playing a named role (`input`, `first`, `second`).
    #[serde(default)]
    pub inputs: Vec<InputRequest>,

    /// Scalar process arguments.
    #[serde(default)]
    pub args: serde_json::Map<String, serde_json::Value>,
}

impl GeoprocessRequest {
    /// Whether every input is carried in the body (no file reads).
    pub fn is_self_contained(&self) -> bool {
        self.inputs
            .iter()
            .all(|i| matches!(i.source, SourceRequest::Geojson { .. }))
    }
}

/// One input in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputRequest {
    /// Role name.
    pub name: String,

    /// Declared data format (defaults to vector).
    #[serde(default = "default_format")]
    pub format: Format,

    pub source: SourceRequest,
}

fn default_format() -> Format {
    Format::Vector
}

/// Where an input's data comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceRequest {
    /// GeoJSON document embedded in the request.
    Geojson { data: serde_json::Value },
    /// GeoJSON file relative to the server's data directory.
    File { path: String },
}

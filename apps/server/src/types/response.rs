// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use geoproc_core::Format;
use serde::{Deserialize, Serialize};

/// Declared input role.
#[derive(Debug, Clone, Serialize)]
pub struct InputSpecInfo {
    pub role: &'static str,
    pub format: Format,
}

/// Description of one registered process.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessInfo {
    /// Operation name used in the URL.
    pub name: &'static str,
    /// Type identifier (e.g. `BufferProcess`).
    pub type_name: &'static str,
    pub required_inputs: Vec<InputSpecInfo>,
    pub required_args: Vec<&'static str>,
    pub default_output: Format,
}

/// `GET /api/v1/processes` response.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessListResponse {
    pub processes: Vec<ProcessInfo>,
}

/// Serialized process output as stored in the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResult {
    pub content_type: String,
    pub body: String,
}

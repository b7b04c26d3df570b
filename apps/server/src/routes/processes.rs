// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Process catalogue endpoint.

use crate::types::{InputSpecInfo, ProcessInfo, ProcessListResponse};
use crate::AppState;
use axum::{extract::State, Json};

/// GET /api/v1/processes - Every registered process with its input and argument contract.
pub async fn list(State(state): State<AppState>) -> Json<ProcessListResponse> {
    let processes = state
        .registry
        .processors()
        .map(|p| ProcessInfo {
            name: p.kind().name(),
            type_name: p.kind().type_name(),
            required_inputs: p
                .required_inputs()
                .iter()
                .map(|spec| InputSpecInfo {
                    role: spec.role,
                    format: spec.format,
                })
                .collect(),
            required_args: p.required_args().to_vec(),
            default_output: p.default_output(),
        })
        .collect();

    Json(ProcessListResponse { processes })
}

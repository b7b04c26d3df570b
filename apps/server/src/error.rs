// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types and handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unknown process: {0}")]
    UnknownProcess(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Join error")]
    Join(#[from] tokio::task::JoinError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::UnknownProcess(_) => (StatusCode::NOT_FOUND, "UNKNOWN_PROCESS"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Processing(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PROCESSING_ERROR"),
            ApiError::Cache(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CACHE_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Join(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TASK_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, code, "Request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<geoproc_processes::Error> for ApiError {
    fn from(err: geoproc_processes::Error) -> Self {
        use geoproc_processes::Error;
        match err {
            Error::UnknownProcess { name } => ApiError::UnknownProcess(name),
            Error::MissingInput { .. }
            | Error::MissingArgument { .. }
            | Error::InvalidArgument { .. }
            | Error::InputFormat { .. } => ApiError::BadRequest(err.to_string()),
            Error::Core(core) => core.into(),
            Error::Geometry(_) => ApiError::Processing(err.to_string()),
        }
    }
}

impl From<geoproc_core::Error> for ApiError {
    fn from(err: geoproc_core::Error) -> Self {
        use geoproc_core::Error;
        match err {
            Error::GeoJson(_) | Error::UnknownFormat(_) => ApiError::BadRequest(err.to_string()),
            _ => ApiError::Processing(err.to_string()),
        }
    }
}

impl From<cacache::Error> for ApiError {
    fn from(err: cacache::Error) -> Self {
        ApiError::Cache(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(format!("JSON error: {}", err))
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::Format;
use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by tables, inputs and outputs
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input '{name}' has not been read")]
    InputNotRead { name: String },

    #[error("Invalid GeoJSON: {0}")]
    GeoJson(String),

    #[error("Output cannot be serialized as {0}")]
    UnsupportedOutputFormat(Format),

    #[error("Unknown format tag: {0}")]
    UnknownFormat(String),

    #[error("Column '{column}' has {got} values but the table has {expected} rows")]
    ColumnLength {
        column: String,
        expected: usize,
        got: usize,
    },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

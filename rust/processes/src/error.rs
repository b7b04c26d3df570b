// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use geoproc_core::Format;
use thiserror::Error;

/// Result type for process operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or computing a process
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown process '{name}'")]
    UnknownProcess { name: String },

    #[error("{process} requires input '{role}'")]
    MissingInput { process: &'static str, role: String },

    #[error("{process} requires argument '{arg}'")]
    MissingArgument { process: &'static str, arg: String },

    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument { arg: String, reason: String },

    #[error("Input '{role}' must be {expected} data, got {found}")]
    InputFormat {
        role: String,
        expected: Format,
        found: Format,
    },

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error(transparent)]
    Core(#[from] geoproc_core::Error),
}

impl Error {
    pub fn geometry(msg: impl Into<String>) -> Self {
        Error::Geometry(msg.into())
    }

    pub fn invalid_arg(arg: &str, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            arg: arg.to_string(),
            reason: reason.into(),
        }
    }
}

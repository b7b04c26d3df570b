// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Format tags describing the shape of input and output data.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of data shapes an input accepts or an output produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Vector,
    Raster,
    /// Accepts either vector or raster data
    All,
    Json,
}

impl Format {
    /// Whether data tagged `other` may be supplied where `self` is declared.
    pub fn accepts(self, other: Format) -> bool {
        match self {
            Format::All => true,
            Format::Vector => matches!(other, Format::Vector | Format::Json),
            _ => self == other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Format::Vector => "vector",
            Format::Raster => "raster",
            Format::All => "all",
            Format::Json => "json",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vector" => Ok(Format::Vector),
            "raster" => Ok(Format::Raster),
            "all" => Ok(Format::All),
            "json" | "geojson" => Ok(Format::Json),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

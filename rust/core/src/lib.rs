// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Geoproc Core
//!
//! Data model shared by every geoproc process:
//!
//! - **Geometry tables**: ordered rows of one geometry plus attribute columns
//! - **GeoJSON codec**: read FeatureCollections / Features / bare geometries, write FeatureCollections
//! - **Inputs**: named, format-tagged sources that fetch their data lazily and exactly once
//! - **Outputs**: named results that serialize to a requested format on demand
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use geoproc_core::{Format, Input, InlineGeoJsonSource};
//!
//! let mut input = Input::new("first", Format::Vector, InlineGeoJsonSource::new(value));
//! input.read()?;
//! let table = input.data()?;
//! println!("{} features", table.len());
//! ```

pub mod error;
pub mod formats;
pub mod geojson;
pub mod inputs;
pub mod output;
pub mod table;

pub use error::{Error, Result};
pub use formats::Format;
pub use geojson::{read_geojson, to_geojson, value_to_geometry, value_to_table};
pub use inputs::{GeoJsonFileSource, InlineGeoJsonSource, Input, InputSource, MemorySource};
pub use output::{Output, OutputPayload};
pub use table::{AttributeValue, Feature, GeometryTable};

// Re-export geo-types for convenience
pub use geo_types::{Geometry, LineString, MultiPolygon, Point, Polygon};

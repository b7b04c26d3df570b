// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named process results, serialized on demand.

use crate::geojson::to_geojson;
use crate::{Error, Format, GeometryTable, Result};
use std::fmt;
use std::sync::Arc;

/// What a process produced.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputPayload {
    /// Vector result, written as a GeoJSON FeatureCollection.
    /// Shared with the process's raw output rather than copied.
    Table(Arc<GeometryTable>),
    /// Free-form JSON document
    Document(serde_json::Value),
}

/// A named computed result.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub name: String,
    pub payload: OutputPayload,
}

impl Output {
    pub fn new(name: impl Into<String>, payload: OutputPayload) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    pub fn table(name: impl Into<String>, table: impl Into<Arc<GeometryTable>>) -> Self {
        Self::new(name, OutputPayload::Table(table.into()))
    }

    pub fn document(name: impl Into<String>, doc: serde_json::Value) -> Self {
        Self::new(name, OutputPayload::Document(doc))
    }

    /// Serialize to `format`. Only JSON-shaped formats are producible.
    pub fn read(&self, format: Format) -> Result<String> {
        match format {
            Format::Json | Format::Vector => {
                let value = match &self.payload {
                    OutputPayload::Table(table) => to_geojson(table),
                    OutputPayload::Document(doc) => doc.clone(),
                };
                Ok(serde_json::to_string(&value)?)
            }
            other => Err(Error::UnsupportedOutputFormat(other)),
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            OutputPayload::Table(table) => {
                write!(f, "Output({}: {} features)", self.name, table.len())
            }
            OutputPayload::Document(doc) => write!(f, "Output({}: {})", self.name, doc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{Geometry, Point};

    #[test]
    fn test_table_output_reads_as_geojson() {
        let out = Output::table(
            "result",
            GeometryTable::from_geometries([Geometry::Point(Point::new(3.0, 4.0))]),
        );
        let value: serde_json::Value = serde_json::from_str(&out.read(Format::Json).unwrap()).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"].as_array().unwrap().len(), 1);
        assert_eq!(out.to_string(), "Output(result: 1 features)");
    }

    #[test]
    fn test_raster_format_is_unsupported() {
        let out = Output::document("result", serde_json::json!({"Process": "stub"}));
        assert!(matches!(
            out.read(Format::Raster),
            Err(Error::UnsupportedOutputFormat(Format::Raster))
        ));
    }
}

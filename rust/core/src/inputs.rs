// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Process inputs and the sources that back them.
//!
//! A source fetches its data at most once. Until `read()` succeeds, `data()`
//! fails with [`Error::InputNotRead`] instead of doing I/O behind the caller's back.

use crate::geojson::{read_geojson, value_to_table};
use crate::{Error, Format, GeometryTable, Result};
use std::fmt;
use std::path::PathBuf;

/// A lazily-read source of geometry data.
pub trait InputSource: Send {
    /// Fetch the data if it has not been fetched yet.
    fn read(&mut self) -> Result<()>;

    /// Whether the data is already in memory.
    fn is_loaded(&self) -> bool;

    /// Materialized data. Fails if `read()` has not completed.
    fn data(&self) -> Result<&GeometryTable>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

/// A named, format-tagged process input.
pub struct Input {
    /// Role name (`first`, `second`, `input`, ...)
    pub name: String,
    pub format: Format,
    pub io: Box<dyn InputSource>,
}

impl Input {
    pub fn new(name: impl Into<String>, format: Format, io: impl InputSource + 'static) -> Self {
        Self {
            name: name.into(),
            format,
            io: Box::new(io),
        }
    }

    /// Read the underlying source unless it is already loaded.
    pub fn read(&mut self) -> Result<()> {
        if !self.io.is_loaded() {
            tracing::debug!(input = %self.name, source = %self.io.describe(), "Reading input");
            self.io.read()?;
        }
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.io.is_loaded()
    }

    pub fn data(&self) -> Result<&GeometryTable> {
        self.io.data().map_err(|e| match e {
            Error::InputNotRead { .. } => Error::InputNotRead {
                name: self.name.clone(),
            },
            other => other,
        })
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input")
            .field("name", &self.name)
            .field("format", &self.format)
            .field("source", &self.io.describe())
            .field("loaded", &self.io.is_loaded())
            .finish()
    }
}

/// GeoJSON file on local disk.
#[derive(Debug)]
pub struct GeoJsonFileSource {
    path: PathBuf,
    data: Option<GeometryTable>,
}

impl GeoJsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: None,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl InputSource for GeoJsonFileSource {
    fn read(&mut self) -> Result<()> {
        if self.data.is_some() {
            return Ok(());
        }
        let text = std::fs::read_to_string(&self.path).map_err(|source| Error::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        let table = read_geojson(&text)?;
        tracing::debug!(path = %self.path.display(), features = table.len(), "Loaded GeoJSON file");
        self.data = Some(table);
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    fn data(&self) -> Result<&GeometryTable> {
        self.data.as_ref().ok_or_else(|| Error::InputNotRead {
            name: self.describe(),
        })
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// GeoJSON document supplied inline (e.g. in a request body), decoded on first read.
#[derive(Debug)]
pub struct InlineGeoJsonSource {
    raw: serde_json::Value,
    data: Option<GeometryTable>,
}

impl InlineGeoJsonSource {
    pub fn new(raw: serde_json::Value) -> Self {
        Self { raw, data: None }
    }
}

impl InputSource for InlineGeoJsonSource {
    fn read(&mut self) -> Result<()> {
        if self.data.is_none() {
            self.data = Some(value_to_table(&self.raw)?);
        }
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    fn data(&self) -> Result<&GeometryTable> {
        self.data.as_ref().ok_or_else(|| Error::InputNotRead {
            name: self.describe(),
        })
    }

    fn describe(&self) -> String {
        "inline-geojson".to_string()
    }
}

/// Table that is already in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    data: GeometryTable,
}

impl MemorySource {
    pub fn new(data: GeometryTable) -> Self {
        Self { data }
    }
}

impl InputSource for MemorySource {
    fn read(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        true
    }

    fn data(&self) -> Result<&GeometryTable> {
        Ok(&self.data)
    }

    fn describe(&self) -> String {
        format!("memory({} features)", self.data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inline_source_requires_read() {
        let mut input = Input::new(
            "first",
            Format::Vector,
            InlineGeoJsonSource::new(json!({"type": "Point", "coordinates": [1.0, 2.0]})),
        );

        assert!(!input.is_loaded());
        match input.data() {
            Err(Error::InputNotRead { name }) => assert_eq!(name, "first"),
            other => panic!("expected InputNotRead, got {:?}", other.map(|t| t.len())),
        }

        input.read().unwrap();
        assert!(input.is_loaded());
        assert_eq!(input.data().unwrap().len(), 1);
    }

    #[test]
    fn test_file_source_reads_geojson() {
        let path = std::env::temp_dir().join(format!("geoproc-core-{}.geojson", std::process::id()));
        std::fs::write(
            &path,
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[0,0]}}
            ]}"#,
        )
        .unwrap();

        let mut source = GeoJsonFileSource::new(&path);
        source.read().unwrap();
        assert_eq!(source.data().unwrap().len(), 1);

        std::fs::remove_file(&path).ok();
        // Already loaded, so a second read does not touch the (now missing) file
        source.read().unwrap();
        assert!(source.is_loaded());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut source = GeoJsonFileSource::new("/nonexistent/geoproc/input.geojson");
        assert!(matches!(source.read(), Err(Error::Io { .. })));
        assert!(!source.is_loaded());
    }
}

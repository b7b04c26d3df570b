// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end process runs: create by name, attach inputs, compute, read output.

use geoproc_core::{
    Format, GeoJsonFileSource, GeometryTable, InlineGeoJsonSource, Input, InputSource,
    MemorySource,
};
use geoproc_processes::{create_process, Error};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Source that counts how often it is actually fetched.
struct CountingSource {
    reads: Arc<AtomicUsize>,
    data: Option<GeometryTable>,
    payload: Value,
}

impl InputSource for CountingSource {
    fn read(&mut self) -> geoproc_core::Result<()> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.data = Some(geoproc_core::value_to_table(&self.payload)?);
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    fn data(&self) -> geoproc_core::Result<&GeometryTable> {
        self.data
            .as_ref()
            .ok_or_else(|| geoproc_core::Error::InputNotRead { name: "counting".into() })
    }

    fn describe(&self) -> String {
        "counting".into()
    }
}

fn one_point() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"name": "origin"},
            "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}
        }]
    })
}

#[test]
fn buffer_point_produces_one_polygon_feature() {
    let mut process = create_process("buffer").unwrap();
    process.inputs = vec![Input::new(
        "input",
        Format::Vector,
        InlineGeoJsonSource::new(one_point()),
    )];
    process.set_arg("buffer_size", 10);
    process.compute().unwrap();

    let text = process.output().unwrap().read(Format::Json).unwrap();
    let doc: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(doc["type"], "FeatureCollection");
    let features = doc["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["geometry"]["type"], "Polygon");
}

#[test]
fn materialization_reads_each_input_once() {
    let reads = Arc::new(AtomicUsize::new(0));
    let source = CountingSource {
        reads: Arc::clone(&reads),
        data: None,
        payload: one_point(),
    };

    let mut process = create_process("buffer")
        .unwrap()
        .with_input(Input::new("input", Format::Vector, source))
        .with_arg("buffer_size", 1.0);

    process.materialize_inputs().unwrap();
    process.materialize_inputs().unwrap();
    process.compute().unwrap();

    assert_eq!(reads.load(Ordering::SeqCst), 1);
}

#[test]
fn missing_argument_is_reported_before_reading() {
    let reads = Arc::new(AtomicUsize::new(0));
    let mut process = create_process("buffer").unwrap().with_input(Input::new(
        "input",
        Format::Vector,
        CountingSource {
            reads: Arc::clone(&reads),
            data: None,
            payload: one_point(),
        },
    ));

    match process.compute() {
        Err(Error::MissingArgument { process, arg }) => {
            assert_eq!(process, "BufferProcess");
            assert_eq!(arg, "buffer_size");
        }
        other => panic!("expected MissingArgument, got {:?}", other),
    }
    assert_eq!(reads.load(Ordering::SeqCst), 0);
}

#[test]
fn read_failure_propagates() {
    let mut process = create_process("within")
        .unwrap()
        .with_input(Input::new(
            "first",
            Format::Vector,
            GeoJsonFileSource::new("/nonexistent/first.geojson"),
        ))
        .with_input(Input::new("second", Format::Vector, MemorySource::default()));

    assert!(matches!(
        process.compute(),
        Err(Error::Core(geoproc_core::Error::Io { .. }))
    ));
    assert!(process.output().is_none());
}

#[test]
fn file_inputs_feed_within() {
    let dir = std::env::temp_dir().join(format!("geoproc-e2e-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let first = dir.join("first.geojson");
    let second = dir.join("second.geojson");
    std::fs::write(
        &first,
        json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": "in", "properties": {},
                 "geometry": {"type": "Point", "coordinates": [1.0, 1.0]}},
                {"type": "Feature", "id": "out", "properties": {},
                 "geometry": {"type": "Point", "coordinates": [9.0, 9.0]}}
            ]
        })
        .to_string(),
    )
    .unwrap();
    std::fs::write(
        &second,
        json!({"type": "Polygon", "coordinates": [[[0, 0], [4, 0], [4, 4], [0, 4], [0, 0]]]})
            .to_string(),
    )
    .unwrap();

    let mut process = create_process("Within")
        .unwrap()
        .with_input(Input::new("first", Format::Vector, GeoJsonFileSource::new(&first)))
        .with_input(Input::new("second", Format::Json, GeoJsonFileSource::new(&second)));
    process.compute().unwrap();

    let doc: Value =
        serde_json::from_str(&process.output().unwrap().read(Format::Json).unwrap()).unwrap();
    assert_eq!(doc["features"].as_array().unwrap().len(), 1);
    assert_eq!(doc["features"][0]["id"], "in");

    std::fs::remove_dir_all(&dir).ok();
}

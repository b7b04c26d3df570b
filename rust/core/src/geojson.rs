// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GeoJSON (RFC 7946) reading and writing for geometry tables.
//!
//! Reading accepts a `FeatureCollection`, a single `Feature`, or a bare
//! geometry object. Writing always produces a `FeatureCollection`.

use crate::table::{AttributeValue, Feature, GeometryTable};
use crate::{Error, Result};
use geo_types::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
use serde_json::{json, Map, Value};

/// Parse GeoJSON text into a table.
pub fn read_geojson(text: &str) -> Result<GeometryTable> {
    let value: Value = serde_json::from_str(text)?;
    value_to_table(&value)
}

/// Convert an already-decoded GeoJSON document into a table.
pub fn value_to_table(value: &Value) -> Result<GeometryTable> {
    match type_of(value)? {
        "FeatureCollection" => {
            let features = value
                .get("features")
                .and_then(Value::as_array)
                .ok_or_else(|| invalid("FeatureCollection without a 'features' array"))?;
            features.iter().map(parse_feature).collect()
        }
        "Feature" => Ok(GeometryTable {
            features: vec![parse_feature(value)?],
        }),
        _ => Ok(GeometryTable::from_geometries([value_to_geometry(value)?])),
    }
}

/// Convert a GeoJSON geometry object.
pub fn value_to_geometry(value: &Value) -> Result<Geometry<f64>> {
    let kind = type_of(value)?;
    if kind == "GeometryCollection" {
        let members = value
            .get("geometries")
            .and_then(Value::as_array)
            .ok_or_else(|| invalid("GeometryCollection without a 'geometries' array"))?;
        let geometries = members
            .iter()
            .map(value_to_geometry)
            .collect::<Result<Vec<_>>>()?;
        return Ok(Geometry::GeometryCollection(GeometryCollection(geometries)));
    }

    let coords = value
        .get("coordinates")
        .ok_or_else(|| invalid(format!("{} without 'coordinates'", kind)))?;

    let geometry = match kind {
        "Point" => Geometry::Point(Point(parse_position(coords)?)),
        "MultiPoint" => Geometry::MultiPoint(MultiPoint(
            as_array(coords)?
                .iter()
                .map(|c| parse_position(c).map(Point))
                .collect::<Result<_>>()?,
        )),
        "LineString" => Geometry::LineString(parse_line_string(coords)?),
        "MultiLineString" => Geometry::MultiLineString(MultiLineString(
            as_array(coords)?
                .iter()
                .map(parse_line_string)
                .collect::<Result<_>>()?,
        )),
        "Polygon" => Geometry::Polygon(parse_polygon(coords)?),
        "MultiPolygon" => Geometry::MultiPolygon(MultiPolygon(
            as_array(coords)?
                .iter()
                .map(parse_polygon)
                .collect::<Result<_>>()?,
        )),
        other => return Err(invalid(format!("unsupported geometry type '{}'", other))),
    };
    Ok(geometry)
}

/// Serialize a table as a GeoJSON FeatureCollection.
///
/// Features without an id get their row index, the way a data-frame index
/// would be written.
pub fn to_geojson(table: &GeometryTable) -> Value {
    let features: Vec<Value> = table
        .features
        .iter()
        .enumerate()
        .map(|(row, feature)| {
            let properties: Map<String, Value> = feature
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), Value::from(v)))
                .collect();
            json!({
                "id": feature.id.clone().unwrap_or_else(|| row.to_string()),
                "type": "Feature",
                "properties": properties,
                "geometry": feature.geometry.as_ref().map(geometry_to_value).unwrap_or(Value::Null),
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Serialize one geometry as a GeoJSON geometry object.
pub fn geometry_to_value(geometry: &Geometry<f64>) -> Value {
    match geometry {
        Geometry::Point(p) => json!({ "type": "Point", "coordinates": position(p.0) }),
        Geometry::MultiPoint(mp) => json!({
            "type": "MultiPoint",
            "coordinates": mp.0.iter().map(|p| position(p.0)).collect::<Vec<_>>(),
        }),
        Geometry::Line(l) => json!({
            "type": "LineString",
            "coordinates": [position(l.start), position(l.end)],
        }),
        Geometry::LineString(ls) => json!({ "type": "LineString", "coordinates": ring(ls) }),
        Geometry::MultiLineString(mls) => json!({
            "type": "MultiLineString",
            "coordinates": mls.0.iter().map(ring).collect::<Vec<_>>(),
        }),
        Geometry::Polygon(p) => json!({ "type": "Polygon", "coordinates": polygon_rings(p) }),
        Geometry::MultiPolygon(mp) => json!({
            "type": "MultiPolygon",
            "coordinates": mp.0.iter().map(polygon_rings).collect::<Vec<_>>(),
        }),
        Geometry::Rect(r) => geometry_to_value(&Geometry::Polygon(r.to_polygon())),
        Geometry::Triangle(t) => geometry_to_value(&Geometry::Polygon(t.to_polygon())),
        Geometry::GeometryCollection(gc) => json!({
            "type": "GeometryCollection",
            "geometries": gc.0.iter().map(geometry_to_value).collect::<Vec<_>>(),
        }),
    }
}

fn parse_feature(value: &Value) -> Result<Feature> {
    if type_of(value)? != "Feature" {
        return Err(invalid("expected a Feature"));
    }

    let geometry = match value.get("geometry") {
        None | Some(Value::Null) => None,
        Some(g) => Some(value_to_geometry(g)?),
    };

    let properties = match value.get("properties") {
        None | Some(Value::Null) => Default::default(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| (k.clone(), AttributeValue::from(v.clone())))
            .collect(),
        Some(_) => return Err(invalid("feature 'properties' must be an object or null")),
    };

    let id = match value.get("id") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(_) => return Err(invalid("feature 'id' must be a string or number")),
    };

    Ok(Feature {
        id,
        geometry,
        properties,
    })
}

fn type_of(value: &Value) -> Result<&str> {
    value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("object without a 'type' member"))
}

fn as_array(value: &Value) -> Result<&Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| invalid("coordinates must be arrays"))
}

fn parse_position(value: &Value) -> Result<Coord<f64>> {
    let items = as_array(value)?;
    if items.len() < 2 {
        return Err(invalid("a position needs at least two numbers"));
    }
    let x = items[0].as_f64().ok_or_else(|| invalid("non-numeric coordinate"))?;
    let y = items[1].as_f64().ok_or_else(|| invalid("non-numeric coordinate"))?;
    Ok(Coord { x, y })
}

fn parse_line_string(value: &Value) -> Result<LineString<f64>> {
    let coords = as_array(value)?
        .iter()
        .map(parse_position)
        .collect::<Result<Vec<_>>>()?;
    Ok(LineString(coords))
}

fn parse_polygon(value: &Value) -> Result<Polygon<f64>> {
    let mut rings = as_array(value)?
        .iter()
        .map(parse_line_string)
        .collect::<Result<Vec<_>>>()?
        .into_iter();
    let exterior = rings
        .next()
        .ok_or_else(|| invalid("polygon without an exterior ring"))?;
    // Polygon::new closes open rings
    Ok(Polygon::new(exterior, rings.collect()))
}

fn position(c: Coord<f64>) -> Value {
    json!([c.x, c.y])
}

fn ring(ls: &LineString<f64>) -> Vec<Value> {
    ls.0.iter().map(|c| position(*c)).collect()
}

fn polygon_rings(p: &Polygon<f64>) -> Vec<Vec<Value>> {
    std::iter::once(p.exterior())
        .chain(p.interiors())
        .map(ring)
        .collect()
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::GeoJson(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_feature_collection() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": 7, "properties": {"name": "a", "pop": 12},
                 "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}},
                {"type": "Feature", "properties": null, "geometry": null}
            ]
        }"#;

        let table = read_geojson(text).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.features[0].id.as_deref(), Some("7"));
        assert_eq!(
            table.features[0].geometry,
            Some(Geometry::Point(Point::new(1.0, 2.0)))
        );
        assert_eq!(
            table.features[0].get_property("name"),
            Some(&AttributeValue::String("a".into()))
        );
        assert!(table.features[1].geometry.is_none());
    }

    #[test]
    fn test_bare_geometry_becomes_one_row() {
        let value = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]]]
        });
        let table = value_to_table(&value).unwrap();
        assert_eq!(table.len(), 1);
        assert!(matches!(table.features[0].geometry, Some(Geometry::Polygon(_))));
    }

    #[test]
    fn test_write_assigns_row_index_ids() {
        let table = GeometryTable::from_geometries([
            Geometry::Point(Point::new(0.0, 0.0)),
            Geometry::Point(Point::new(1.0, 1.0)),
        ]);
        let value = to_geojson(&table);
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][1]["id"], "1");
        assert_eq!(value["features"][1]["geometry"]["coordinates"], json!([1.0, 1.0]));
    }

    #[test]
    fn test_polygon_with_hole_survives_write_and_read() {
        let value = json!({
            "type": "Polygon",
            "coordinates": [
                [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
                [[2.0, 2.0], [4.0, 2.0], [4.0, 4.0], [2.0, 4.0], [2.0, 2.0]]
            ]
        });
        let geometry = value_to_geometry(&value).unwrap();
        assert_eq!(geometry_to_value(&geometry), value);
    }

    #[test]
    fn test_rejects_malformed_documents() {
        assert!(matches!(
            value_to_table(&json!({"features": []})),
            Err(Error::GeoJson(_))
        ));
        assert!(matches!(
            value_to_geometry(&json!({"type": "Point", "coordinates": [1.0]})),
            Err(Error::GeoJson(_))
        ));
        assert!(matches!(
            value_to_geometry(&json!({"type": "Circle", "coordinates": [1.0, 2.0]})),
            Err(Error::GeoJson(_))
        ));
    }
}

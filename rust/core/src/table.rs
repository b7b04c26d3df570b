// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry tables: ordered rows of one geometry plus attribute columns.

use crate::{Error, Result};
use geo_types::Geometry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Nested arrays/objects are carried through untouched
    Json(serde_json::Value),
}

impl AttributeValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Int(v) => Some(*v as f64),
            AttributeValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::String(v.to_string())
    }
}

impl From<serde_json::Value> for AttributeValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => AttributeValue::Null,
            Value::Bool(b) => AttributeValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => AttributeValue::Int(i),
                None => AttributeValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => AttributeValue::String(s),
            other => AttributeValue::Json(other),
        }
    }
}

impl From<&AttributeValue> for serde_json::Value {
    fn from(value: &AttributeValue) -> Self {
        use serde_json::Value;
        match value {
            AttributeValue::Null => Value::Null,
            AttributeValue::Bool(b) => Value::Bool(*b),
            AttributeValue::Int(i) => Value::from(*i),
            // NaN/inf have no JSON representation
            AttributeValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            AttributeValue::String(s) => Value::String(s.clone()),
            AttributeValue::Json(v) => v.clone(),
        }
    }
}

/// A geographic feature: one (possibly null) geometry and its attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Feature {
    /// Optional feature ID
    pub id: Option<String>,
    /// Feature geometry, `None` for GeoJSON `"geometry": null`
    pub geometry: Option<Geometry<f64>>,
    /// Feature attributes
    pub properties: BTreeMap<String, AttributeValue>,
}

impl Feature {
    /// Create a new feature with geometry
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            id: None,
            geometry: Some(geometry),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn get_property(&self, key: &str) -> Option<&AttributeValue> {
        self.properties.get(key)
    }
}

/// Ordered collection of features.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeometryTable {
    pub features: Vec<Feature>,
}

impl GeometryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a geometry-only table, one row per geometry.
    pub fn from_geometries(geometries: impl IntoIterator<Item = Geometry<f64>>) -> Self {
        Self {
            features: geometries.into_iter().map(Feature::new).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// Geometry column, row by row.
    pub fn geometries(&self) -> impl Iterator<Item = Option<&Geometry<f64>>> {
        self.features.iter().map(|f| f.geometry.as_ref())
    }

    /// Keep the rows whose mask entry is true. Row order and ids are preserved.
    pub fn filter_by_mask(&self, mask: &[bool]) -> GeometryTable {
        debug_assert_eq!(mask.len(), self.features.len());
        GeometryTable {
            features: self
                .features
                .iter()
                .zip(mask)
                .filter(|(_, keep)| **keep)
                .map(|(f, _)| f.clone())
                .collect(),
        }
    }

    /// Rows of `self` followed by the rows of `other`, unmodified.
    pub fn concat(&self, other: &GeometryTable) -> GeometryTable {
        let mut features = Vec::with_capacity(self.len() + other.len());
        features.extend(self.features.iter().cloned());
        features.extend(other.features.iter().cloned());
        GeometryTable { features }
    }

    /// Set (or replace) an attribute column. `values` must have one entry per row.
    pub fn set_column(&mut self, name: &str, values: Vec<AttributeValue>) -> Result<()> {
        if values.len() != self.features.len() {
            return Err(Error::ColumnLength {
                column: name.to_string(),
                expected: self.features.len(),
                got: values.len(),
            });
        }
        for (feature, value) in self.features.iter_mut().zip(values) {
            feature.properties.insert(name.to_string(), value);
        }
        Ok(())
    }

    /// Values of one attribute column; rows without it yield `None`.
    pub fn column(&self, name: &str) -> Vec<Option<&AttributeValue>> {
        self.features.iter().map(|f| f.properties.get(name)).collect()
    }
}

impl FromIterator<Feature> for GeometryTable {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a GeometryTable {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::Point;

    fn sample() -> GeometryTable {
        (0..3)
            .map(|i| {
                Feature::new(Point::new(i as f64, 0.0).into())
                    .with_id(i.to_string())
                    .with_property("n", i as i64)
            })
            .collect()
    }

    #[test]
    fn test_filter_by_mask_preserves_order() {
        let table = sample();
        let filtered = table.filter_by_mask(&[true, false, true]);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.features[0].id.as_deref(), Some("0"));
        assert_eq!(filtered.features[1].id.as_deref(), Some("2"));
    }

    #[test]
    fn test_concat_keeps_all_rows() {
        let a = sample();
        let b = sample();
        let joined = a.concat(&b);
        assert_eq!(joined.len(), 6);
        assert_eq!(joined.features[3], b.features[0]);
    }

    #[test]
    fn test_set_column_length_mismatch() {
        let mut table = sample();
        let err = table.set_column("d", vec![AttributeValue::Float(1.0)]).unwrap_err();
        assert!(matches!(err, Error::ColumnLength { expected: 3, got: 1, .. }));

        table
            .set_column("d", vec![1.0.into(), 2.0.into(), 3.0.into()])
            .unwrap();
        assert_eq!(table.column("d")[2], Some(&AttributeValue::Float(3.0)));
    }

    #[test]
    fn test_attribute_from_json() {
        assert_eq!(AttributeValue::from(serde_json::json!(3)), AttributeValue::Int(3));
        assert_eq!(AttributeValue::from(serde_json::json!(1.5)), AttributeValue::Float(1.5));
        assert!(matches!(
            AttributeValue::from(serde_json::json!([1, 2])),
            AttributeValue::Json(_)
        ));
    }
}

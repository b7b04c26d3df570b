// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subset processors - restrict data to an area of interest.

use crate::process::{InputSpec, ProcessArgs, ProcessInputs, ProcessOutcome, POSITIONAL_ROLE};
use crate::registry::{GeoProcessor, ProcessKind};
use crate::{Error, Result};
use geo::{
    BooleanOps, Geometry, GeometryCollection, MultiLineString, MultiPoint, MultiPolygon, Rect,
};
use geoproc_core::{value_to_table, Feature, Format, GeometryTable};
use rayon::prelude::*;
use serde_json::{json, Value};

use super::helpers::{areal_geometry, collect_parts, intersects, union_polygons, Parts};

const SUBSET_AREA: &str = "subset_area";

const ANY_INPUT: &[InputSpec] = &[InputSpec::new(POSITIONAL_ROLE, Format::All)];

/// Parse `subset_area`: a `[min_x, min_y, max_x, max_y]` box or any GeoJSON
/// object whose polygons define the area.
fn parse_subset_area(value: &Value) -> Result<MultiPolygon<f64>> {
    if let Some(items) = value.as_array() {
        let nums: Vec<f64> = items.iter().filter_map(Value::as_f64).collect();
        if nums.len() != 4 || items.len() != 4 {
            return Err(Error::invalid_arg(
                SUBSET_AREA,
                "bounding box must be [min_x, min_y, max_x, max_y]",
            ));
        }
        if nums[0] >= nums[2] || nums[1] >= nums[3] {
            return Err(Error::invalid_arg(SUBSET_AREA, "bounding box has no area"));
        }
        let rect = Rect::new((nums[0], nums[1]), (nums[2], nums[3]));
        return Ok(MultiPolygon::new(vec![rect.to_polygon()]));
    }

    let table = value_to_table(value)
        .map_err(|e| Error::invalid_arg(SUBSET_AREA, e.to_string()))?;
    let mut parts = Parts::default();
    for geometry in table.geometries().flatten() {
        collect_parts(geometry, &mut parts);
    }
    if parts.polygons.is_empty() {
        return Err(Error::invalid_arg(SUBSET_AREA, "area must contain a polygon"));
    }
    Ok(union_polygons(parts.polygons))
}

/// Part of `geometry` inside `area`, or `None` if nothing remains.
fn clip_to_area(geometry: &Geometry<f64>, area: &MultiPolygon<f64>) -> Option<Geometry<f64>> {
    let area_geometry = Geometry::MultiPolygon(area.clone());
    if !intersects(geometry, &area_geometry) {
        return None;
    }

    match geometry {
        Geometry::Point(_) => Some(geometry.clone()),
        Geometry::MultiPoint(mp) => {
            let kept: Vec<_> = mp
                .0
                .iter()
                .filter(|p| intersects(&Geometry::Point(**p), &area_geometry))
                .copied()
                .collect();
            (!kept.is_empty()).then(|| Geometry::MultiPoint(MultiPoint::new(kept)))
        }
        Geometry::Line(_) | Geometry::LineString(_) | Geometry::MultiLineString(_) => {
            let mut parts = Parts::default();
            collect_parts(geometry, &mut parts);
            let clipped = area.clip(&MultiLineString::new(parts.lines), false);
            match clipped.0.len() {
                0 => None,
                1 => clipped.0.into_iter().next().map(Geometry::LineString),
                _ => Some(Geometry::MultiLineString(clipped)),
            }
        }
        Geometry::Polygon(_)
        | Geometry::MultiPolygon(_)
        | Geometry::Rect(_)
        | Geometry::Triangle(_) => {
            let mut parts = Parts::default();
            collect_parts(geometry, &mut parts);
            let clipped = MultiPolygon::new(parts.polygons).intersection(area);
            (!clipped.0.is_empty()).then(|| areal_geometry(clipped))
        }
        Geometry::GeometryCollection(gc) => {
            let members: Vec<_> = gc.0.iter().filter_map(|g| clip_to_area(g, area)).collect();
            (!members.is_empty()).then(|| Geometry::GeometryCollection(GeometryCollection(members)))
        }
    }
}

/// Handles `subsetvector`: keeps features intersecting `subset_area`, clipped to it.
pub struct SubsetVectorProcessor;

impl SubsetVectorProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SubsetVectorProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoProcessor for SubsetVectorProcessor {
    fn kind(&self) -> ProcessKind {
        ProcessKind::SubsetVector
    }

    fn required_inputs(&self) -> &'static [InputSpec] {
        ANY_INPUT
    }

    fn required_args(&self) -> &'static [&'static str] {
        &[SUBSET_AREA]
    }

    fn process(&self, inputs: &ProcessInputs<'_>, args: &ProcessArgs) -> Result<ProcessOutcome> {
        let table = inputs.table(POSITIONAL_ROLE)?;
        let area = args
            .get(SUBSET_AREA)
            .ok_or_else(|| Error::invalid_arg(SUBSET_AREA, "missing"))
            .and_then(parse_subset_area)?;

        let features: Vec<Feature> = table
            .features
            .par_iter()
            .filter_map(|f| {
                let clipped = clip_to_area(f.geometry.as_ref()?, &area)?;
                Some(Feature {
                    geometry: Some(clipped),
                    ..f.clone()
                })
            })
            .collect();

        tracing::debug!(
            kept = features.len(),
            total = table.len(),
            "Subset vector features"
        );
        Ok(ProcessOutcome::table(GeometryTable { features }))
    }
}

/// Handles `subsetraster`. There is no raster data model, so the result is a
/// document saying so rather than an image.
pub struct SubsetRasterProcessor;

impl SubsetRasterProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SubsetRasterProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoProcessor for SubsetRasterProcessor {
    fn kind(&self) -> ProcessKind {
        ProcessKind::SubsetRaster
    }

    fn required_inputs(&self) -> &'static [InputSpec] {
        ANY_INPUT
    }

    fn required_args(&self) -> &'static [&'static str] {
        &[SUBSET_AREA]
    }

    fn default_output(&self) -> Format {
        Format::Raster
    }

    fn process(&self, inputs: &ProcessInputs<'_>, args: &ProcessArgs) -> Result<ProcessOutcome> {
        // Still resolve the input so a missing role fails the same way as elsewhere
        let table = inputs.table(POSITIONAL_ROLE)?;
        let area = args.get(SUBSET_AREA).cloned().unwrap_or(Value::Null);

        tracing::warn!(features = table.len(), "Raster subsetting is not supported");
        Ok(ProcessOutcome::document(json!({
            "Process": "SubsetRaster",
            "status": "unsupported",
            "detail": "raster subsetting is not available; use subsetvector for vector data",
            "subset_area": area,
        })))
    }
}

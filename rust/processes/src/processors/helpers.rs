// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared geometry helpers used by multiple processors.

use geo::{
    BooleanOps, BoundingRect, Distance, Euclidean, Geometry, GeometryCollection, LineString,
    MultiLineString, MultiPoint, MultiPolygon, Point, Polygon, Relate,
};
use geoproc_core::GeometryTable;
use rayon::prelude::*;

/// A geometry split into its areal, linear and puntal components.
#[derive(Debug, Default)]
pub(crate) struct Parts {
    pub polygons: Vec<Polygon<f64>>,
    pub lines: Vec<LineString<f64>>,
    pub points: Vec<Point<f64>>,
}

impl Parts {
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty() && self.lines.is_empty() && self.points.is_empty()
    }
}

/// Flatten `geometry` (recursing into collections) into `parts`.
pub(crate) fn collect_parts(geometry: &Geometry<f64>, parts: &mut Parts) {
    match geometry {
        Geometry::Point(p) => parts.points.push(*p),
        Geometry::MultiPoint(mp) => parts.points.extend(mp.0.iter().copied()),
        Geometry::Line(l) => parts.lines.push(LineString::from(*l)),
        Geometry::LineString(ls) => parts.lines.push(ls.clone()),
        Geometry::MultiLineString(mls) => parts.lines.extend(mls.0.iter().cloned()),
        Geometry::Polygon(p) => parts.polygons.push(p.clone()),
        Geometry::MultiPolygon(mp) => parts.polygons.extend(mp.0.iter().cloned()),
        Geometry::Rect(r) => parts.polygons.push(r.to_polygon()),
        Geometry::Triangle(t) => parts.polygons.push(t.to_polygon()),
        Geometry::GeometryCollection(gc) => {
            for g in &gc.0 {
                collect_parts(g, parts);
            }
        }
    }
}

/// Union of polygons, reduced pairwise in parallel.
pub(crate) fn union_polygons(polygons: Vec<Polygon<f64>>) -> MultiPolygon<f64> {
    polygons
        .into_par_iter()
        .map(|p| MultiPolygon::new(vec![p]))
        .reduce_with(|a, b| a.union(&b))
        .unwrap_or_else(|| MultiPolygon::new(vec![]))
}

/// Collapse a multipolygon with one member into a plain polygon.
pub(crate) fn areal_geometry(mp: MultiPolygon<f64>) -> Geometry<f64> {
    if mp.0.len() == 1 {
        let mut polygons = mp.0;
        Geometry::Polygon(polygons.remove(0))
    } else {
        Geometry::MultiPolygon(mp)
    }
}

/// Dissolve every geometry of a table into one shape.
///
/// Polygons are unioned so internal boundaries disappear. Lines and points
/// covered by that union are absorbed into it; only the parts outside are
/// carried alongside in a collection. Returns `None` when the table holds no
/// geometry at all.
pub(crate) fn dissolve(table: &GeometryTable) -> Option<Geometry<f64>> {
    let mut parts = Parts::default();
    for geometry in table.geometries().flatten() {
        collect_parts(geometry, &mut parts);
    }
    if parts.is_empty() {
        return None;
    }

    let areas = union_polygons(parts.polygons);

    let lines = if areas.0.is_empty() || parts.lines.is_empty() {
        parts.lines
    } else {
        // Inverted clip keeps only the line parts outside the areas
        areas.clip(&MultiLineString::new(parts.lines), true).0
    };

    let covered = {
        let mut members = Vec::with_capacity(2);
        if !areas.0.is_empty() {
            members.push(Geometry::MultiPolygon(areas.clone()));
        }
        if !lines.is_empty() {
            members.push(Geometry::MultiLineString(MultiLineString::new(lines.clone())));
        }
        members
    };
    let points: Vec<Point<f64>> = parts
        .points
        .into_iter()
        .filter(|p| {
            let point = Geometry::Point(*p);
            !covered.iter().any(|g| intersects(&point, g))
        })
        .collect();

    let mut members = covered;
    if !points.is_empty() {
        members.push(Geometry::MultiPoint(MultiPoint::new(points)));
    }

    match members.len() {
        0 => None,
        1 => members.pop().map(|g| match g {
            Geometry::MultiPolygon(mp) => areal_geometry(mp),
            other => other,
        }),
        _ => Some(Geometry::GeometryCollection(GeometryCollection(members))),
    }
}

/// `a` lies in the interior of `b` with no point in `b`'s exterior.
pub(crate) fn is_within(a: &Geometry<f64>, b: &Geometry<f64>) -> bool {
    a.relate(b).is_within()
}

/// `a` and `b` share at least one point.
pub(crate) fn intersects(a: &Geometry<f64>, b: &Geometry<f64>) -> bool {
    if !bounds_overlap(a, b) {
        return false;
    }
    a.relate(b).is_intersects()
}

/// Evaluate `predicate(row, other)` for every row in parallel. Null geometries yield `false`.
pub(crate) fn predicate_mask<F>(table: &GeometryTable, other: &Geometry<f64>, predicate: F) -> Vec<bool>
where
    F: Fn(&Geometry<f64>, &Geometry<f64>) -> bool + Sync,
{
    table
        .features
        .par_iter()
        .map(|f| f.geometry.as_ref().is_some_and(|g| predicate(g, other)))
        .collect()
}

fn bounds_overlap(a: &Geometry<f64>, b: &Geometry<f64>) -> bool {
    match (a.bounding_rect(), b.bounding_rect()) {
        (Some(ra), Some(rb)) => {
            ra.min().x <= rb.max().x
                && ra.max().x >= rb.min().x
                && ra.min().y <= rb.max().y
                && ra.max().y >= rb.min().y
        }
        // Empty geometry touches nothing
        _ => false,
    }
}

/// Planar Euclidean distance between two geometries; 0 when they intersect.
///
/// Returns `None` if either geometry is empty.
pub(crate) fn geometry_distance(a: &Geometry<f64>, b: &Geometry<f64>) -> Option<f64> {
    if a.bounding_rect().is_none() || b.bounding_rect().is_none() {
        return None;
    }
    if intersects(a, b) {
        return Some(0.0);
    }
    Some(Euclidean::distance(a, b))
}

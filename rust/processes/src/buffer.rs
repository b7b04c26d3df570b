// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Buffer operations
//!
//! A positive buffer is the Minkowski sum of a geometry with a disc, built as
//! the union of a circle at every vertex, a rectangle along every segment and
//! (for areal geometry) the geometry itself. A negative buffer erodes areal
//! geometry by subtracting the positive buffer of its boundary.

use crate::processors::helpers::{collect_parts, union_polygons, Parts};
use geo::{BooleanOps, Coord, Geometry, LineString, MultiPolygon, Polygon};
use std::f64::consts::PI;

/// Fewest vertices allowed on a buffer circle
pub const MIN_SEGMENTS: usize = 4;
/// Most vertices allowed on a buffer circle
pub const MAX_SEGMENTS: usize = 4096;

/// Parameters for buffer operations
#[derive(Debug, Clone)]
pub struct BufferParams {
    /// Buffer distance (positive = expand, negative = shrink)
    pub distance: f64,
    /// Number of segments used to approximate a full circle,
    /// clamped to `MIN_SEGMENTS..=MAX_SEGMENTS`
    pub segments: usize,
}

impl Default for BufferParams {
    fn default() -> Self {
        Self {
            distance: 1.0,
            segments: 64,
        }
    }
}

/// Buffer one geometry. Always returns areal geometry (possibly empty).
pub fn buffer_geometry(geometry: &Geometry<f64>, params: &BufferParams) -> MultiPolygon<f64> {
    let mut parts = Parts::default();
    collect_parts(geometry, &mut parts);

    let n = params.segments.clamp(MIN_SEGMENTS, MAX_SEGMENTS);
    let d = params.distance;

    if d == 0.0 {
        return union_polygons(parts.polygons);
    }

    if d < 0.0 {
        if parts.polygons.is_empty() {
            return MultiPolygon::new(vec![]);
        }
        let mut boundary = Vec::new();
        for polygon in &parts.polygons {
            for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
                stroke(ring, -d, n, &mut boundary);
            }
        }
        let areas = union_polygons(parts.polygons);
        return areas.difference(&union_polygons(boundary));
    }

    let mut pieces: Vec<Polygon<f64>> = Vec::new();
    for point in &parts.points {
        pieces.push(circle(point.0, d, n));
    }
    for line in &parts.lines {
        stroke(line, d, n, &mut pieces);
    }
    for polygon in &parts.polygons {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            stroke(ring, d, n, &mut pieces);
        }
    }
    pieces.extend(parts.polygons);

    // A lone circle needs no overlay
    if pieces.len() == 1 {
        return MultiPolygon::new(pieces);
    }
    union_polygons(pieces)
}

/// Circle polygon with `n` vertices, counter-clockwise, closed.
pub fn circle(center: Coord<f64>, radius: f64, n: usize) -> Polygon<f64> {
    let mut coords = Vec::with_capacity(n + 1);
    for i in 0..n {
        let angle = 2.0 * PI * i as f64 / n as f64;
        coords.push(Coord {
            x: center.x + radius * angle.cos(),
            y: center.y + radius * angle.sin(),
        });
    }
    // Close the ring
    coords.push(coords[0]);

    Polygon::new(LineString::new(coords), vec![])
}

/// Circles at every vertex plus a rectangle along every segment of `line`.
fn stroke(line: &LineString<f64>, radius: f64, n: usize, out: &mut Vec<Polygon<f64>>) {
    let coords = &line.0;
    if coords.is_empty() {
        return;
    }

    // The closing vertex of a ring duplicates the first one
    let vertex_count = if line.is_closed() && coords.len() > 1 {
        coords.len() - 1
    } else {
        coords.len()
    };
    for c in &coords[..vertex_count] {
        out.push(circle(*c, radius, n));
    }

    for w in coords.windows(2) {
        if let Some(rect) = segment_rectangle(w[0], w[1], radius) {
            out.push(rect);
        }
    }
}

fn segment_rectangle(a: Coord<f64>, b: Coord<f64>, radius: f64) -> Option<Polygon<f64>> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = dx.hypot(dy);
    if len == 0.0 {
        return None;
    }
    let nx = -dy / len * radius;
    let ny = dx / len * radius;

    Some(Polygon::new(
        LineString::from(vec![
            (a.x - nx, a.y - ny),
            (b.x - nx, b.y - ny),
            (b.x + nx, b.y + ny),
            (a.x + nx, a.y + ny),
            (a.x - nx, a.y - ny),
        ]),
        vec![],
    ))
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Buffer processor - expand (or erode) every geometry by a distance.

use crate::buffer::{buffer_geometry, BufferParams, MAX_SEGMENTS, MIN_SEGMENTS};
use crate::process::{InputSpec, ProcessArgs, ProcessInputs, ProcessOutcome, POSITIONAL_ROLE};
use crate::registry::{GeoProcessor, ProcessKind};
use crate::{Error, Result};
use geoproc_core::{Feature, Format, GeometryTable};
use rayon::prelude::*;

use super::helpers::areal_geometry;

/// Handles `buffer`: one vector input, `buffer_size` argument.
/// Optional `segments` (4 to 4096) sets the circle resolution.
pub struct BufferProcessor;

impl BufferProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BufferProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoProcessor for BufferProcessor {
    fn kind(&self) -> ProcessKind {
        ProcessKind::Buffer
    }

    fn required_inputs(&self) -> &'static [InputSpec] {
        const INPUTS: &[InputSpec] = &[InputSpec::new(POSITIONAL_ROLE, Format::Vector)];
        INPUTS
    }

    fn required_args(&self) -> &'static [&'static str] {
        &["buffer_size"]
    }

    fn process(&self, inputs: &ProcessInputs<'_>, args: &ProcessArgs) -> Result<ProcessOutcome> {
        let table = inputs.table(POSITIONAL_ROLE)?;
        let params = BufferParams {
            distance: args.f64("buffer_size")?,
            segments: args.usize_or("segments", BufferParams::default().segments)?,
        };
        if !params.distance.is_finite() {
            return Err(Error::invalid_arg("buffer_size", "must be finite"));
        }
        if !(MIN_SEGMENTS..=MAX_SEGMENTS).contains(&params.segments) {
            return Err(Error::invalid_arg(
                "segments",
                format!("must be between {} and {}", MIN_SEGMENTS, MAX_SEGMENTS),
            ));
        }

        let features: Vec<Feature> = table
            .features
            .par_iter()
            .map(|f| Feature {
                id: None,
                geometry: f
                    .geometry
                    .as_ref()
                    .map(|g| areal_geometry(buffer_geometry(g, &params))),
                properties: Default::default(),
            })
            .collect();

        tracing::debug!(
            features = features.len(),
            distance = params.distance,
            "Buffered geometries"
        );
        Ok(ProcessOutcome::table(GeometryTable { features }))
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Centroid processor - centroid of every `first` geometry.

use crate::process::{InputSpec, ProcessArgs, ProcessInputs, ProcessOutcome};
use crate::registry::{GeoProcessor, ProcessKind};
use crate::Result;
use geo::{Centroid, Geometry};
use geoproc_core::{Feature, GeometryTable};
use rayon::prelude::*;

use super::helpers::is_within;
use super::FIRST_SECOND;

/// Handles `centroid`.
///
/// The centroid of a concave or multi-part shape can fall outside it; such rows
/// are dropped. `second` is declared (and must be supplied) but is not used.
pub struct CentroidProcessor;

impl CentroidProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CentroidProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoProcessor for CentroidProcessor {
    fn kind(&self) -> ProcessKind {
        ProcessKind::Centroid
    }

    fn required_inputs(&self) -> &'static [InputSpec] {
        FIRST_SECOND
    }

    fn process(&self, inputs: &ProcessInputs<'_>, _args: &ProcessArgs) -> Result<ProcessOutcome> {
        let first = inputs.table("first")?;

        let features: Vec<Feature> = first
            .features
            .par_iter()
            .filter_map(|f| {
                let source = f.geometry.as_ref()?;
                let centroid = Geometry::Point(source.centroid()?);
                is_within(&centroid, source).then(|| Feature {
                    id: f.id.clone(),
                    geometry: Some(centroid),
                    properties: Default::default(),
                })
            })
            .collect();

        tracing::debug!(
            kept = features.len(),
            total = first.len(),
            "Computed centroids"
        );
        Ok(ProcessOutcome::table(GeometryTable { features }))
    }
}

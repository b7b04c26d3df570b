// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Distance processor - minimum distance from each `first` feature to `second`.

use crate::process::{InputSpec, ProcessArgs, ProcessInputs, ProcessOutcome};
use crate::registry::{GeoProcessor, ProcessKind};
use crate::{Error, Result};
use geoproc_core::AttributeValue;
use rayon::prelude::*;

use super::helpers::geometry_distance;
use super::FIRST_SECOND;

/// Column appended to `first`.
pub const MIN_DIST_COLUMN: &str = "min_dist";

/// Handles `distance`.
///
/// Every `first` feature is compared with every `second` feature (no spatial
/// index). Rows with a null geometry get a null distance.
pub struct DistanceProcessor;

impl DistanceProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DistanceProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoProcessor for DistanceProcessor {
    fn kind(&self) -> ProcessKind {
        ProcessKind::Distance
    }

    fn required_inputs(&self) -> &'static [InputSpec] {
        FIRST_SECOND
    }

    fn process(&self, inputs: &ProcessInputs<'_>, _args: &ProcessArgs) -> Result<ProcessOutcome> {
        let first = inputs.table("first")?;
        let second = inputs.table("second")?;

        let targets: Vec<_> = second.geometries().flatten().collect();
        if targets.is_empty() {
            return Err(Error::geometry("distance: 'second' input has no geometries"));
        }

        let values: Vec<AttributeValue> = first
            .features
            .par_iter()
            .map(|f| {
                let Some(geometry) = f.geometry.as_ref() else {
                    return AttributeValue::Null;
                };
                targets
                    .iter()
                    .filter_map(|target| geometry_distance(geometry, target))
                    .min_by(f64::total_cmp)
                    .map(AttributeValue::Float)
                    .unwrap_or(AttributeValue::Null)
            })
            .collect();

        let mut result = first.clone();
        result.set_column(MIN_DIST_COLUMN, values)?;
        tracing::debug!(rows = result.len(), targets = targets.len(), "Computed minimum distances");
        Ok(ProcessOutcome::table(result))
    }
}

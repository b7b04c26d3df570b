// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Overlay processors - filter `first` by a spatial predicate against the
//! dissolved geometry of `second`.

use crate::process::{InputSpec, ProcessArgs, ProcessInputs, ProcessOutcome};
use crate::registry::{GeoProcessor, ProcessKind};
use crate::Result;

use super::helpers::{dissolve, intersects, is_within, predicate_mask};
use super::FIRST_SECOND;

#[derive(Debug, Clone, Copy)]
enum Predicate {
    Within,
    Intersects,
    Disjoint,
}

fn filter_first(inputs: &ProcessInputs<'_>, predicate: Predicate) -> Result<ProcessOutcome> {
    let first = inputs.table("first")?;
    let second = inputs.table("second")?;

    let mask: Vec<bool> = match dissolve(second) {
        Some(merged) => match predicate {
            Predicate::Within => predicate_mask(first, &merged, is_within),
            Predicate::Intersects => predicate_mask(first, &merged, intersects),
            Predicate::Disjoint => predicate_mask(first, &merged, |a, b| !intersects(a, b))
                .into_iter()
                .zip(first.geometries())
                // Null geometries intersect nothing, so they survive a difference
                .map(|(keep, g)| keep || g.is_none())
                .collect(),
        },
        // Nothing to test against: only the difference keeps rows
        None => vec![matches!(predicate, Predicate::Disjoint); first.len()],
    };

    let result = first.filter_by_mask(&mask);
    tracing::debug!(
        predicate = ?predicate,
        kept = result.len(),
        total = first.len(),
        "Filtered first input"
    );
    Ok(ProcessOutcome::table(result))
}

/// Handles `within`: rows of `first` lying entirely within `second`.
pub struct WithinProcessor;

impl WithinProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WithinProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoProcessor for WithinProcessor {
    fn kind(&self) -> ProcessKind {
        ProcessKind::Within
    }

    fn required_inputs(&self) -> &'static [InputSpec] {
        FIRST_SECOND
    }

    fn process(&self, inputs: &ProcessInputs<'_>, _args: &ProcessArgs) -> Result<ProcessOutcome> {
        filter_first(inputs, Predicate::Within)
    }
}

/// Handles `intersects`: rows of `first` sharing any point with `second`.
pub struct IntersectsProcessor;

impl IntersectsProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IntersectsProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoProcessor for IntersectsProcessor {
    fn kind(&self) -> ProcessKind {
        ProcessKind::Intersects
    }

    fn required_inputs(&self) -> &'static [InputSpec] {
        FIRST_SECOND
    }

    fn process(&self, inputs: &ProcessInputs<'_>, _args: &ProcessArgs) -> Result<ProcessOutcome> {
        filter_first(inputs, Predicate::Intersects)
    }
}

/// Handles `difference`: rows of `first` not intersecting `second`.
/// Exact complement of `intersects`.
pub struct DifferenceProcessor;

impl DifferenceProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DifferenceProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoProcessor for DifferenceProcessor {
    fn kind(&self) -> ProcessKind {
        ProcessKind::Difference
    }

    fn required_inputs(&self) -> &'static [InputSpec] {
        FIRST_SECOND
    }

    fn process(&self, inputs: &ProcessInputs<'_>, _args: &ProcessArgs) -> Result<ProcessOutcome> {
        filter_first(inputs, Predicate::Disjoint)
    }
}

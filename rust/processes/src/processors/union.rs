// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Union processor - rows of `first` followed by rows of `second`.

use crate::process::{InputSpec, ProcessArgs, ProcessInputs, ProcessOutcome};
use crate::registry::{GeoProcessor, ProcessKind};
use crate::Result;

use super::FIRST_SECOND;

/// Handles `union`. Rows are concatenated, not geometrically merged.
pub struct UnionProcessor;

impl UnionProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnionProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoProcessor for UnionProcessor {
    fn kind(&self) -> ProcessKind {
        ProcessKind::Union
    }

    fn required_inputs(&self) -> &'static [InputSpec] {
        FIRST_SECOND
    }

    fn process(&self, inputs: &ProcessInputs<'_>, _args: &ProcessArgs) -> Result<ProcessOutcome> {
        let first = inputs.table("first")?;
        let second = inputs.table("second")?;
        Ok(ProcessOutcome::table(first.concat(second)))
    }
}

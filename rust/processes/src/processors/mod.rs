// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry Processors
//!
//! One processor per operation. Each sub-module handles a family:
//!
//! - `buffer`: Buffer (expand/erode every geometry)
//! - `subset`: SubsetVector (clip to an area), SubsetRaster (unsupported stub)
//! - `overlay`: Within, Intersects, Difference (predicates against the dissolved `second` input)
//! - `union`: Union (row concatenation)
//! - `centroid`: Centroid (centroids that fall inside their source)
//! - `distance`: Distance (`min_dist` column)
//! - `helpers`: Shared geometry functions used by multiple processors

pub(crate) mod helpers;
mod buffer;
mod subset;
mod overlay;
mod union;
mod centroid;
mod distance;


// Re-export all processor types
pub use buffer::BufferProcessor;
pub use subset::{SubsetRasterProcessor, SubsetVectorProcessor};
pub use overlay::{DifferenceProcessor, IntersectsProcessor, WithinProcessor};
pub use union::UnionProcessor;
pub use centroid::CentroidProcessor;
pub use distance::{DistanceProcessor, MIN_DIST_COLUMN};

use crate::process::InputSpec;
use geoproc_core::Format;

/// Roles of the two-input vector operations.
pub(crate) const FIRST_SECOND: &[InputSpec] = &[
    InputSpec::new("first", Format::Vector),
    InputSpec::new("second", Format::Vector),
];

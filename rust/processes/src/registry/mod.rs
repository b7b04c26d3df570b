// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Process Registry - explicit mapping from operation names to processors
//!
//! Every supported operation is a [`ProcessKind`] variant. The registry holds one
//! stateless [`GeoProcessor`] per kind and hands out a fresh [`Process`] per request.

#[cfg(test)]
mod tests;

use crate::process::{InputSpec, Process, ProcessArgs, ProcessInputs, ProcessOutcome};
use crate::processors::{
    BufferProcessor, CentroidProcessor, DifferenceProcessor, DistanceProcessor,
    IntersectsProcessor, SubsetRasterProcessor, SubsetVectorProcessor, UnionProcessor,
    WithinProcessor,
};
use crate::{Error, Result};
use geoproc_core::Format;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

/// Geospatial operation trait
/// Each processor implements exactly one operation
pub trait GeoProcessor: Send + Sync {
    /// Operation implemented by this processor
    fn kind(&self) -> ProcessKind;

    /// Declared input roles, in order
    fn required_inputs(&self) -> &'static [InputSpec];

    /// Names of required scalar arguments
    fn required_args(&self) -> &'static [&'static str] {
        &[]
    }

    /// Format tag of the produced output
    fn default_output(&self) -> Format {
        Format::Json
    }

    /// Run the operation on materialized inputs
    fn process(&self, inputs: &ProcessInputs<'_>, args: &ProcessArgs) -> Result<ProcessOutcome>;
}

/// Every supported operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProcessKind {
    Buffer,
    SubsetVector,
    SubsetRaster,
    Within,
    Intersects,
    Difference,
    Union,
    Centroid,
    Distance,
}

impl ProcessKind {
    pub const ALL: [ProcessKind; 9] = [
        ProcessKind::Buffer,
        ProcessKind::SubsetVector,
        ProcessKind::SubsetRaster,
        ProcessKind::Within,
        ProcessKind::Intersects,
        ProcessKind::Difference,
        ProcessKind::Union,
        ProcessKind::Centroid,
        ProcessKind::Distance,
    ];

    /// Lowercase operation name used in URLs and requests.
    pub fn name(self) -> &'static str {
        match self {
            ProcessKind::Buffer => "buffer",
            ProcessKind::SubsetVector => "subsetvector",
            ProcessKind::SubsetRaster => "subsetraster",
            ProcessKind::Within => "within",
            ProcessKind::Intersects => "intersects",
            ProcessKind::Difference => "difference",
            ProcessKind::Union => "union",
            ProcessKind::Centroid => "centroid",
            ProcessKind::Distance => "distance",
        }
    }

    /// Capitalized operation name plus `Process`.
    ///
    /// The two subset operations camel-case their word boundary
    /// (`SubsetVectorProcess`, not `SubsetvectorProcess`) so the identifier
    /// matches the `SubsetVector` spelling accepted by name lookup.
    pub fn type_name(self) -> &'static str {
        match self {
            ProcessKind::Buffer => "BufferProcess",
            ProcessKind::SubsetVector => "SubsetVectorProcess",
            ProcessKind::SubsetRaster => "SubsetRasterProcess",
            ProcessKind::Within => "WithinProcess",
            ProcessKind::Intersects => "IntersectsProcess",
            ProcessKind::Difference => "DifferenceProcess",
            ProcessKind::Union => "UnionProcess",
            ProcessKind::Centroid => "CentroidProcess",
            ProcessKind::Distance => "DistanceProcess",
        }
    }
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProcessKind {
    type Err = Error;

    /// Case-insensitive; `_`, `-` and spaces are ignored (`subset_vector` == `SubsetVector`).
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        ProcessKind::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| Error::UnknownProcess {
                name: s.to_string(),
            })
    }
}

/// Process registry - resolves names to processors
pub struct ProcessRegistry {
    processors: HashMap<ProcessKind, Arc<dyn GeoProcessor>>,
}

impl ProcessRegistry {
    /// Create new registry with every default processor
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry.register(Box::new(BufferProcessor::new()));
        registry.register(Box::new(SubsetVectorProcessor::new()));
        registry.register(Box::new(SubsetRasterProcessor::new()));
        registry.register(Box::new(WithinProcessor::new()));
        registry.register(Box::new(IntersectsProcessor::new()));
        registry.register(Box::new(DifferenceProcessor::new()));
        registry.register(Box::new(UnionProcessor::new()));
        registry.register(Box::new(CentroidProcessor::new()));
        registry.register(Box::new(DistanceProcessor::new()));

        debug_assert!(registry.is_complete(), "missing processors: {:?}", registry.missing());
        registry
    }

    /// Registry with no processors (for custom wiring)
    pub fn empty() -> Self {
        Self {
            processors: HashMap::new(),
        }
    }

    /// Shared default registry
    pub fn global() -> &'static ProcessRegistry {
        static REGISTRY: OnceLock<ProcessRegistry> = OnceLock::new();
        REGISTRY.get_or_init(ProcessRegistry::new)
    }

    /// Register a processor, replacing any previous one for the same kind
    pub fn register(&mut self, processor: Box<dyn GeoProcessor>) {
        let processor: Arc<dyn GeoProcessor> = Arc::from(processor);
        self.processors.insert(processor.kind(), processor);
    }

    /// Kinds without a registered processor
    pub fn missing(&self) -> Vec<ProcessKind> {
        ProcessKind::ALL
            .into_iter()
            .filter(|kind| !self.processors.contains_key(kind))
            .collect()
    }

    /// Whether every [`ProcessKind`] has a processor
    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    pub fn get(&self, kind: ProcessKind) -> Option<&Arc<dyn GeoProcessor>> {
        self.processors.get(&kind)
    }

    /// Registered processors in [`ProcessKind::ALL`] order
    pub fn processors(&self) -> impl Iterator<Item = &Arc<dyn GeoProcessor>> {
        ProcessKind::ALL
            .into_iter()
            .filter_map(move |kind| self.processors.get(&kind))
    }

    /// Fresh, empty process for an operation name
    pub fn create(&self, name: &str) -> Result<Process> {
        let kind: ProcessKind = name.parse()?;
        let processor = self.get(kind).ok_or_else(|| Error::UnknownProcess {
            name: name.to_string(),
        })?;
        tracing::debug!(name = %name, process = kind.type_name(), "Created process");
        Ok(Process::new(Arc::clone(processor)))
    }
}

impl Default for ProcessRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a process by operation name using the default registry.
pub fn create_process(name: &str) -> Result<Process> {
    ProcessRegistry::global().create(name)
}

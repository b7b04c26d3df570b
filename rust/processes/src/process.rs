// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Process instances: inputs, arguments, validation and input materialization.

use crate::registry::{GeoProcessor, ProcessKind};
use crate::{Error, Result};
use geoproc_core::{Format, GeometryTable, Input, Output};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Role name of the single positional input used by one-input processes.
pub const POSITIONAL_ROLE: &str = "input";

/// A declared input role and the format it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSpec {
    pub role: &'static str,
    pub format: Format,
}

impl InputSpec {
    pub const fn new(role: &'static str, format: Format) -> Self {
        Self { role, format }
    }
}

/// Find the input playing `role`. The positional role falls back to the first input.
fn resolve<'a>(inputs: &'a [Input], role: &str) -> Option<&'a Input> {
    inputs
        .iter()
        .find(|i| i.name == role)
        .or_else(|| (role == POSITIONAL_ROLE).then(|| inputs.first()).flatten())
}

/// Scalar process arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessArgs {
    values: Map<String, Value>,
}

impl ProcessArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Numeric argument; fails if absent or not a number.
    pub fn f64(&self, key: &str) -> Result<f64> {
        let value = self.values.get(key).ok_or_else(|| Error::InvalidArgument {
            arg: key.to_string(),
            reason: "missing".to_string(),
        })?;
        number(key, value)
    }

    /// Optional positive integer argument.
    pub fn usize_or(&self, key: &str, default: usize) -> Result<usize> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(v) => v
                .as_u64()
                .filter(|n| *n > 0)
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| Error::invalid_arg(key, "expected a positive integer")),
        }
    }
}

fn number(key: &str, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| Error::invalid_arg(key, "number out of range")),
        // Query-string style callers send numbers as strings
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::invalid_arg(key, format!("'{}' is not a number", s))),
        other => Err(Error::invalid_arg(key, format!("expected a number, got {}", other))),
    }
}

impl From<Map<String, Value>> for ProcessArgs {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

/// Read-only view of a process's materialized inputs, by role.
pub struct ProcessInputs<'a> {
    process: &'static str,
    inputs: &'a [Input],
}

impl<'a> ProcessInputs<'a> {
    pub fn new(process: &'static str, inputs: &'a [Input]) -> Self {
        Self { process, inputs }
    }

    /// Table of the input playing `role`.
    pub fn table(&self, role: &str) -> Result<&'a GeometryTable> {
        let input = resolve(self.inputs, role).ok_or_else(|| Error::MissingInput {
            process: self.process,
            role: role.to_string(),
        })?;
        Ok(input.data()?)
    }
}

/// What a processor hands back to its process.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub raw_output: Option<Arc<GeometryTable>>,
    pub output: Output,
}

impl ProcessOutcome {
    /// Vector result; the output serializes the table as GeoJSON.
    pub fn table(table: GeometryTable) -> Self {
        let table = Arc::new(table);
        Self {
            output: Output::table("result", Arc::clone(&table)),
            raw_output: Some(table),
        }
    }

    /// Document-only result with no raw table.
    pub fn document(doc: Value) -> Self {
        Self {
            raw_output: None,
            output: Output::document("result", doc),
        }
    }
}

/// One run of a geospatial operation.
///
/// Constructed empty by the registry, populated by the caller, computed once.
pub struct Process {
    processor: Arc<dyn GeoProcessor>,
    pub inputs: Vec<Input>,
    pub args: ProcessArgs,
    raw_output: Option<Arc<GeometryTable>>,
    output: Option<Output>,
}

impl Process {
    pub fn new(processor: Arc<dyn GeoProcessor>) -> Self {
        Self {
            processor,
            inputs: Vec::new(),
            args: ProcessArgs::new(),
            raw_output: None,
            output: None,
        }
    }

    pub fn kind(&self) -> ProcessKind {
        self.processor.kind()
    }

    /// Type identifier, e.g. `BufferProcess`.
    pub fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    pub fn required_inputs(&self) -> &'static [InputSpec] {
        self.processor.required_inputs()
    }

    pub fn required_args(&self) -> &'static [&'static str] {
        self.processor.required_args()
    }

    pub fn default_output(&self) -> Format {
        self.processor.default_output()
    }

    pub fn add_input(&mut self, input: Input) {
        self.inputs.push(input);
    }

    pub fn set_arg(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.args.insert(key, value);
    }

    pub fn with_input(mut self, input: Input) -> Self {
        self.add_input(input);
        self
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_arg(key, value);
        self
    }

    /// Check that every declared role and argument is present and every
    /// input's format is accepted by its role.
    pub fn validate(&self) -> Result<()> {
        let process = self.type_name();

        for spec in self.required_inputs() {
            let input = resolve(&self.inputs, spec.role).ok_or_else(|| Error::MissingInput {
                process,
                role: spec.role.to_string(),
            })?;
            if !spec.format.accepts(input.format) {
                return Err(Error::InputFormat {
                    role: spec.role.to_string(),
                    expected: spec.format,
                    found: input.format,
                });
            }
        }

        if let Some(arg) = self
            .required_args()
            .iter()
            .find(|arg| !self.args.contains(arg))
        {
            return Err(Error::MissingArgument {
                process,
                arg: arg.to_string(),
            });
        }

        Ok(())
    }

    /// Read every input that is not loaded yet. Safe to call repeatedly.
    pub fn materialize_inputs(&mut self) -> Result<()> {
        for input in &mut self.inputs {
            input.read()?;
        }
        Ok(())
    }

    /// Validate, materialize inputs, then run the operation.
    ///
    /// On failure nothing is stored and the error is returned as-is.
    pub fn compute(&mut self) -> Result<()> {
        let start = std::time::Instant::now();
        self.validate()?;
        self.materialize_inputs()?;

        let outcome = {
            let inputs = ProcessInputs::new(self.type_name(), &self.inputs);
            self.processor.process(&inputs, &self.args)?
        };

        tracing::debug!(
            process = self.type_name(),
            output = %outcome.output,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Process computed"
        );

        self.raw_output = outcome.raw_output;
        self.output = Some(outcome.output);
        Ok(())
    }

    /// Computed table, if the operation produces one.
    pub fn raw_output(&self) -> Option<&GeometryTable> {
        self.raw_output.as_deref()
    }

    pub fn output(&self) -> Option<&Output> {
        self.output.as_ref()
    }

    pub fn into_output(self) -> Option<Output> {
        self.output
    }
}

impl std::fmt::Debug for Process {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Process")
            .field("type", &self.type_name())
            .field("inputs", &self.inputs)
            .field("args", &self.args)
            .field("computed", &self.output.is_some())
            .finish()
    }
}

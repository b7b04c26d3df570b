// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geoproc Processes
//!
//! Named geospatial vector operations behind one process abstraction.
//! A [`ProcessRegistry`] resolves an operation name to a fresh [`Process`];
//! the caller attaches inputs and arguments, then calls [`Process::compute`].
//!
//! ```rust,ignore
//! use geoproc_processes::create_process;
//!
//! let mut process = create_process("buffer")?;
//! process.add_input(input);
//! process.set_arg("buffer_size", 10.0);
//! process.compute()?;
//! let geojson = process.output().unwrap().read(Format::Json)?;
//! ```

pub mod buffer;
pub mod error;
pub mod process;
pub mod processors;
pub mod registry;

pub use buffer::{buffer_geometry, BufferParams};
pub use error::{Error, Result};
pub use process::{InputSpec, Process, ProcessArgs, ProcessInputs, ProcessOutcome};
pub use registry::{create_process, GeoProcessor, ProcessKind, ProcessRegistry};

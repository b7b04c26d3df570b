// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Service modules for process execution and caching.

pub mod cache;
pub mod executor;

pub use cache::DiskCache;
pub use executor::{build_process, execute, resolve_data_path};

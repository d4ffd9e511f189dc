// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # dotversion
//!
//! Read the version and descriptive metadata embedded in .NET assemblies at build time: file
//! version, informational (product) version, assembly version, location, codebase, and the
//! free-form descriptive attributes (company, configuration, copyright, description, product,
//! title, trademark).
//!
//! ## Features
//!
//! - **Thin reader** - Every query goes straight to the bound module, nothing is cached
//! - **Attribute fallback** - Kinds without a dedicated accessor are resolved by scanning the
//!   assembly level custom attributes by normalized name
//! - **Pure Rust metadata access** - ECMA-335 PE images are parsed without the .NET runtime,
//!   memory-mapped from disk or straight from a buffer
//! - **Pluggable providers** - Anything implementing [`ModuleMetadata`] can be read, including
//!   the crate's own build metadata through [`ModuleInfo`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dotversion::prelude::*;
//! use std::{path::Path, sync::Arc};
//!
//! let module = CilModule::from_file(Path::new("Service.dll"))?;
//! let info = VersionInfo::from(Arc::new(module) as ModuleRc);
//!
//! println!("File version:    {}", info.get_version(VersionKind::FileVersion));
//! println!("Product version: {}", info.get_version(VersionKind::ProductVersion));
//! println!("Company:         {}", info.get_version(VersionKind::Company));
//! # Ok::<(), dotversion::Error>(())
//! ```
//!
//! Without a module the reader describes the calling binary's own crate:
//!
//! ```rust,no_run
//! use dotversion::{VersionInfo, VersionKind};
//!
//! let info = VersionInfo::default();
//! println!("{}", info.get_version(VersionKind::Title));
//! ```
//!
//! ## Error Handling
//!
//! [`VersionInfo::get_version`] never fails: absent metadata and errors both yield an empty
//! string, errors are additionally logged through `tracing`. The typed accessors such as
//! [`VersionInfo::lookup`] return [`Result`]`<Option<String>>` instead.
//!
//! ## Architecture
//!
//! - [`version`] - The reader, the metadata kinds, and the provider abstraction
//! - [`metadata`] - ECMA-335 metadata: CLI header, streams, tables, signatures, custom attributes
//! - [`file`] - PE file access and low-level parsing primitives

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// PE file access, backends and low-level parsing
///
/// [`File`] owns the image bytes (memory-mapped or in memory) together with the parsed PE
/// headers, and translates RVAs to file offsets. [`Parser`] walks blobs and signatures.
pub mod file;

/// Definitions and parsing of CIL metadata based on ECMA-355
///
/// Only what is needed to read assembly level custom attributes is decoded:
///
/// - [`metadata::cor20header`] - CLI header
/// - [`metadata::root`] - Metadata root and stream directory
/// - [`metadata::streams`] - `#~`, `#Strings` and `#Blob`
/// - [`metadata::tables`] - Table schema, coded indexes and raw rows
/// - [`metadata::signatures`] - Method signatures of attribute constructors
/// - [`metadata::customattributes`] - Custom attribute value blobs
/// - [`metadata::cilmodule`] - [`CilModule`], the metadata provider over a PE image
pub mod metadata;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust,no_run
/// use dotversion::prelude::*;
///
/// let info = VersionInfo::default();
/// for (kind, value) in info.entries() {
///     println!("{kind}: {value}");
/// }
/// ```
pub mod prelude;

/// Version and descriptive metadata of modules
pub mod version;

/// `dotversion` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `dotversion` Error type
///
/// # Examples
///
/// ```rust,no_run
/// use dotversion::{CilModule, Error};
///
/// match CilModule::from_file(std::path::Path::new("Service.dll")) {
///     Ok(_) => println!("Loaded successfully"),
///     Err(Error::Malformed { message, .. }) => println!("Malformed: {}", message),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;

/// A .NET assembly as metadata provider, see [`metadata::cilmodule::CilModule`]
pub use metadata::cilmodule::CilModule;

pub use file::{parser::Parser, File};

pub use metadata::customattributes::{
    CustomAttribute, CustomAttributeArgument, CustomAttributeNamedArgument, CustomAttributeValue,
};

pub use version::{
    ModuleInfo, ModuleLocation, ModuleMetadata, ModuleRc, Version, VersionInfo, VersionKind,
};

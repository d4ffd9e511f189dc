//! Metadata parsing for .NET assemblies.
//!
//! The metadata is reached in layers, each module handling one of them:
//!
//! - [`cor20header`] - the CLI header referenced by the CLR runtime header data directory
//! - [`root`] - the metadata root and its stream directory
//! - [`streams`] - the `#~`, `#Strings` and `#Blob` streams
//! - [`tables`] - table schema, coded indexes and the raw rows read by this crate
//! - [`signatures`] - method signatures, needed to type constructor arguments
//! - [`customattributes`] - custom attribute value blobs
//! - [`cilmodule`] - all of the above combined into a [`crate::ModuleMetadata`] provider
//!
//! # Examples
//!
//! ```rust,no_run
//! use dotversion::{metadata::cilmodule::CilModule, ModuleMetadata};
//!
//! let module = CilModule::from_file("tests/samples/Service.dll".as_ref())?;
//! if let Some(version) = module.version()? {
//!     println!("{} {}", module.name(), version);
//! }
//! # Ok::<(), dotversion::Error>(())
//! ```

/// Implementation of a loaded .NET module as metadata provider
pub mod cilmodule;
/// Implementation of the Header of CIL
pub mod cor20header;
/// Implementation of custom attribute parsing and representation
pub mod customattributes;
/// Implementation of the root metadata structure
pub mod root;
/// Implementation of method signatures
pub mod signatures;
/// Implementation of the metadata streams (tables, strings, blobs)
pub mod streams;
/// Implementation of the .NET metadata tables
pub mod tables;

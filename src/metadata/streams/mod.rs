//! Metadata streams of a .NET assembly.
//!
//! The metadata root references a small, fixed set of streams (ECMA-335 II.24.2). Only the ones
//! required to reach assembly level custom attributes are exposed here:
//!
//! - **`#~`** (or the uncompressed **`#-`**) - the metadata tables, see [`TablesHeader`]
//! - **`#Strings`** - NUL terminated UTF-8 identifiers, see [`Strings`]
//! - **`#Blob`** - length prefixed signatures and attribute values, see [`Blob`]
//!
//! `#US` and `#GUID` are recognized in the stream directory, but never read.
//!
//! # References
//!
//! - ECMA-335 6th Edition, Partition II, Section 24.2.2 - Stream Headers

mod blob;
mod streamheader;
mod strings;
mod tablesheader;

pub use blob::Blob;
pub use streamheader::{StreamHeader, STREAM_NAMES};
pub use strings::Strings;
pub use tablesheader::TablesHeader;

//! Custom attribute decoding (ECMA-335 II.23.3).
//!
//! Custom attribute values are stored as opaque blobs whose layout is only known in combination
//! with the signature of the attribute constructor:
//!
//! - **Prolog** - the marker `0x0001`
//! - **Fixed arguments** - one value per constructor parameter, in declaration order
//! - **Named arguments** - field and property assignments, each self-describing
//!
//! # Examples
//!
//! ```rust
//! use dotversion::metadata::{
//!     customattributes::{parse_custom_attribute_blob, CustomAttributeArgument},
//!     signatures::TypeSignature,
//!     tables::TableId,
//! };
//!
//! fn no_types(_: TableId, _: u32) -> Option<String> {
//!     None
//! }
//!
//! let blob = [0x01, 0x00, 0x05, b'1', b'.', b'2', b'.', b'3', 0x00, 0x00];
//! let value = parse_custom_attribute_blob(&blob, &[TypeSignature::String], &no_types)?;
//!
//! assert_eq!(value.fixed_args[0], CustomAttributeArgument::String("1.2.3".into()));
//! # Ok::<(), dotversion::Error>(())
//! ```

mod parser;
mod types;

pub use parser::{parse_custom_attribute_blob, CustomAttributeParser, TypeResolver};
pub use types::*;

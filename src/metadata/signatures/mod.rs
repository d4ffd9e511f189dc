//! Method signature parsing (ECMA-335 II.23.2).
//!
//! A custom attribute blob does not describe the types of its fixed arguments; they are taken
//! from the signature of the attribute constructor. This module decodes `MethodDefSig` and
//! `MethodRefSig` blobs into a [`SignatureMethod`] for that purpose. Field signatures are
//! decoded as well, to find the underlying type of enums.
//!
//! # Examples
//!
//! ```rust
//! use dotversion::metadata::signatures::{parse_method_signature, TypeSignature};
//!
//! // instance void .ctor(string)
//! let signature = parse_method_signature(&[0x20, 0x01, 0x01, 0x0E])?;
//! assert!(signature.has_this);
//! assert_eq!(signature.params, vec![TypeSignature::String]);
//! # Ok::<(), dotversion::Error>(())
//! ```

mod parser;
mod types;

pub use parser::SignatureParser;
pub use types::*;

use crate::Result;

/// Parse a `MethodDefSig` or `MethodRefSig` blob
///
/// # Errors
/// Returns an error if the blob is truncated or malformed
pub fn parse_method_signature(data: &[u8]) -> Result<SignatureMethod> {
    SignatureParser::new(data).parse_method_signature()
}

/// Parse a `FieldSig` blob and return the type of the field
///
/// # Errors
/// Returns an error if the blob is truncated or not a field signature
pub fn parse_field_signature(data: &[u8]) -> Result<TypeSignature> {
    SignatureParser::new(data).parse_field_signature()
}

//! Signature types and the `ELEMENT_TYPE` / calling convention constants.

use crate::metadata::tables::TableId;

/// A type as encoded in a signature blob (ECMA-335 II.23.2.12).
///
/// Only the shapes which can appear in the constructor signature of a custom attribute are
/// modelled in full; pointers, function pointers and generic instantiations are rejected by the
/// parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    /// void
    Void,
    /// bool
    Boolean,
    /// char
    Char,
    /// signed 8bit integer
    I1,
    /// unsigned 8bit integer
    U1,
    /// signed 16bit integer
    I2,
    /// unsigned 16bit integer
    U2,
    /// signed 32bit integer
    I4,
    /// unsigned 32bit integer
    U4,
    /// signed 64bit integer
    I8,
    /// unsigned 64bit integer
    U8,
    /// 32bit floating-point
    R4,
    /// 64bit floating-point
    R8,
    /// signed integer, sized to executing platform
    I,
    /// unsigned integer, sized to executing platform
    U,
    /// System.String
    String,
    /// System.Object
    Object,
    /// A value type, referenced through a `TypeDefOrRefOrSpecEncoded` token
    ValueType(TableId, u32),
    /// A class, referenced through a `TypeDefOrRefOrSpecEncoded` token
    Class(TableId, u32),
    /// Single-dimensional, zero based array
    SzArray(Box<TypeSignature>),
    /// Type by reference
    ByRef(Box<TypeSignature>),
    /// Generic type parameter of the owning type
    GenericParamType(u32),
    /// Generic parameter of the method
    GenericParamMethod(u32),
    /// Type is referenced during runtime
    TypedByRef,
}

/// A parsed `MethodDefSig` or `MethodRefSig` (ECMA-335 II.23.2.1, II.23.2.2)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureMethod {
    /// The method has an implicit `this` parameter
    pub has_this: bool,
    /// `this` is passed explicitly as first parameter
    pub explicit_this: bool,
    /// Number of generic parameters, 0 for non-generic methods
    pub param_count_generic: u32,
    /// The return type
    pub return_type: TypeSignature,
    /// The parameter types, in order
    pub params: Vec<TypeSignature>,
}

/// The element types of ECMA-335 II.23.1.16
#[allow(non_snake_case, missing_docs)]
pub mod ELEMENT_TYPE {
    pub const END: u8 = 0x00;
    pub const VOID: u8 = 0x01;
    pub const BOOLEAN: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const I1: u8 = 0x04;
    pub const U1: u8 = 0x05;
    pub const I2: u8 = 0x06;
    pub const U2: u8 = 0x07;
    pub const I4: u8 = 0x08;
    pub const U4: u8 = 0x09;
    pub const I8: u8 = 0x0A;
    pub const U8: u8 = 0x0B;
    pub const R4: u8 = 0x0C;
    pub const R8: u8 = 0x0D;
    pub const STRING: u8 = 0x0E;
    pub const PTR: u8 = 0x0F;
    pub const BYREF: u8 = 0x10;
    pub const VALUETYPE: u8 = 0x11;
    pub const CLASS: u8 = 0x12;
    pub const VAR: u8 = 0x13;
    pub const ARRAY: u8 = 0x14;
    pub const GENERICINST: u8 = 0x15;
    pub const TYPEDBYREF: u8 = 0x16;
    pub const I: u8 = 0x18;
    pub const U: u8 = 0x19;
    pub const FNPTR: u8 = 0x1B;
    pub const OBJECT: u8 = 0x1C;
    pub const SZARRAY: u8 = 0x1D;
    pub const MVAR: u8 = 0x1E;
    pub const CMOD_REQD: u8 = 0x1F;
    pub const CMOD_OPT: u8 = 0x20;
    pub const SENTINEL: u8 = 0x41;
}

/// Calling convention flags of a method signature
#[allow(non_snake_case, missing_docs)]
pub mod CALLING_CONVENTION {
    pub const GENERIC: u8 = 0x10;
    pub const HASTHIS: u8 = 0x20;
    pub const EXPLICITTHIS: u8 = 0x40;
    pub const VARARG: u8 = 0x05;
    pub const FIELD: u8 = 0x06;
}

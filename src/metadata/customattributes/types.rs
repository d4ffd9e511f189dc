//! Decoded custom attribute values.
//!
//! These types are self-contained: they carry resolved names and owned values, and do not
//! reference the image they were read from.

use std::fmt;

/// A custom attribute attached to a module: the full name of the attribute type and its
/// decoded arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomAttribute {
    /// Full name of the attribute type, `Namespace.Name`
    pub type_name: String,
    /// The decoded blob
    pub value: CustomAttributeValue,
}

impl CustomAttribute {
    /// Create a new attribute
    #[must_use]
    pub fn new(type_name: impl Into<String>, value: CustomAttributeValue) -> Self {
        CustomAttribute {
            type_name: type_name.into(),
            value,
        }
    }

    /// The first fixed (constructor) argument, if any
    #[must_use]
    pub fn first_argument(&self) -> Option<&CustomAttributeArgument> {
        self.value.fixed_args.first()
    }
}

/// Represents a parsed custom attribute value with arguments and named arguments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomAttributeValue {
    /// Fixed arguments from the constructor signature
    pub fixed_args: Vec<CustomAttributeArgument>,
    /// Named arguments (fields and properties)
    pub named_args: Vec<CustomAttributeNamedArgument>,
}

/// Represents a single custom attribute argument value
#[derive(Debug, Clone, PartialEq)]
pub enum CustomAttributeArgument {
    /// A null string, type or array
    Null,
    /// Boolean value
    Bool(bool),
    /// Character value (16-bit Unicode)
    Char(char),
    /// Signed 8-bit integer
    I1(i8),
    /// Unsigned 8-bit integer
    U1(u8),
    /// Signed 16-bit integer
    I2(i16),
    /// Unsigned 16-bit integer
    U2(u16),
    /// Signed 32-bit integer
    I4(i32),
    /// Unsigned 32-bit integer
    U4(u32),
    /// Signed 64-bit integer
    I8(i64),
    /// Unsigned 64-bit integer
    U8(u64),
    /// 32-bit floating point
    R4(f32),
    /// 64-bit floating point
    R8(f64),
    /// UTF-8 string
    String(String),
    /// Type reference, as its serialized (assembly qualified) name
    Type(String),
    /// Array of arguments
    Array(Vec<CustomAttributeArgument>),
    /// Enum value (enum type name + underlying value)
    Enum(String, Box<CustomAttributeArgument>),
}

impl CustomAttributeArgument {
    /// Returns true for [`CustomAttributeArgument::Null`]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, CustomAttributeArgument::Null)
    }

    /// The string payload of a `String` or `Type` argument
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CustomAttributeArgument::String(value) | CustomAttributeArgument::Type(value) => {
                Some(value)
            }
            _ => None,
        }
    }
}

impl fmt::Display for CustomAttributeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomAttributeArgument::Null => Ok(()),
            CustomAttributeArgument::Bool(value) => {
                f.write_str(if *value { "True" } else { "False" })
            }
            CustomAttributeArgument::Char(value) => write!(f, "{value}"),
            CustomAttributeArgument::I1(value) => write!(f, "{value}"),
            CustomAttributeArgument::U1(value) => write!(f, "{value}"),
            CustomAttributeArgument::I2(value) => write!(f, "{value}"),
            CustomAttributeArgument::U2(value) => write!(f, "{value}"),
            CustomAttributeArgument::I4(value) => write!(f, "{value}"),
            CustomAttributeArgument::U4(value) => write!(f, "{value}"),
            CustomAttributeArgument::I8(value) => write!(f, "{value}"),
            CustomAttributeArgument::U8(value) => write!(f, "{value}"),
            CustomAttributeArgument::R4(value) => write!(f, "{value}"),
            CustomAttributeArgument::R8(value) => write!(f, "{value}"),
            CustomAttributeArgument::String(value) | CustomAttributeArgument::Type(value) => {
                f.write_str(value)
            }
            CustomAttributeArgument::Array(values) => {
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
            CustomAttributeArgument::Enum(_, value) => write!(f, "{value}"),
        }
    }
}

/// Represents a named argument (field or property) in a custom attribute
#[derive(Debug, Clone, PartialEq)]
pub struct CustomAttributeNamedArgument {
    /// Whether this is a field (true) or property (false)
    pub is_field: bool,
    /// Name of the field or property
    pub name: String,
    /// Value of the argument
    pub value: CustomAttributeArgument,
}

/// .NET `CorSerializationType` constants as defined in corhdr.h
#[allow(non_snake_case, missing_docs)]
pub mod SERIALIZATION_TYPE {
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
    pub const SZARRAY: u8 = 0x1D;
    pub const TYPE: u8 = 0x50;
    pub const TAGGED_OBJECT: u8 = 0x51;
    pub const FIELD: u8 = 0x53;
    pub const PROPERTY: u8 = 0x54;
    pub const ENUM: u8 = 0x55;
}

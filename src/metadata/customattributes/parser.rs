//! Decoder for custom attribute blobs (ECMA-335 II.23.3).
//!
//! The blob starts with the prolog `0x0001`, followed by one value per constructor parameter
//! (typed by the constructor signature), and a `u16` count of named arguments, each carrying
//! its own serialization type tag.
//!
//! Enum values are stored with the width of their underlying type, which the blob does not
//! carry. It is taken from the [`TypeResolver`], with a fallback table for common framework
//! enums.

use crate::{
    file::parser::Parser,
    metadata::{
        customattributes::{
            CustomAttributeArgument, CustomAttributeNamedArgument, CustomAttributeValue,
            SERIALIZATION_TYPE,
        },
        signatures::TypeSignature,
        tables::TableId,
    },
    Error::{NotSupported, RecursionLimit},
    Result,
};

/// Maximum nesting depth of arrays and boxed values inside a single blob
const MAX_NESTING_DEPTH: usize = 64;

/// The full name of `System.Type`, the only class besides `System.Object` and `System.String`
/// an attribute argument may be typed as
const SYSTEM_TYPE: &str = "System.Type";

/// Framework enums which show up in assembly level attributes, with their underlying type
const WELL_KNOWN_ENUMS: &[(&str, u8)] = &[
    ("System.AttributeTargets", SERIALIZATION_TYPE::I4),
    ("System.ComponentModel.EditorBrowsableState", SERIALIZATION_TYPE::I4),
    ("System.Diagnostics.DebuggableAttribute+DebuggingModes", SERIALIZATION_TYPE::I4),
    ("System.Diagnostics.DebuggerBrowsableState", SERIALIZATION_TYPE::I4),
    ("System.Resources.UltimateResourceFallbackLocation", SERIALIZATION_TYPE::I4),
    ("System.Runtime.CompilerServices.CompilationRelaxations", SERIALIZATION_TYPE::I4),
    ("System.Runtime.CompilerServices.MethodImplOptions", SERIALIZATION_TYPE::I4),
    ("System.Runtime.InteropServices.CallingConvention", SERIALIZATION_TYPE::I4),
    ("System.Runtime.InteropServices.CharSet", SERIALIZATION_TYPE::I4),
    ("System.Runtime.InteropServices.ClassInterfaceType", SERIALIZATION_TYPE::I4),
    ("System.Runtime.InteropServices.ComInterfaceType", SERIALIZATION_TYPE::I4),
    ("System.Runtime.InteropServices.DllImportSearchPath", SERIALIZATION_TYPE::I4),
    ("System.Runtime.InteropServices.LayoutKind", SERIALIZATION_TYPE::I4),
    ("System.Security.Permissions.SecurityAction", SERIALIZATION_TYPE::I4),
    ("System.Security.SecurityRuleSet", SERIALIZATION_TYPE::U1),
];

/// Type lookups needed while decoding a blob.
///
/// Plain closures `Fn(TableId, u32) -> Option<String>` implement this trait; they name types
/// but know no enum definitions.
pub trait TypeResolver {
    /// The full name of a `TypeDefOrRef` reference taken from a signature
    fn type_name(&self, table: TableId, row: u32) -> Option<String>;

    /// The underlying integer type of the enum referenced by `table` / `row`
    fn enum_underlying_type(&self, _table: TableId, _row: u32) -> Option<TypeSignature> {
        None
    }

    /// The underlying integer type of the enum with the full name `name`
    fn enum_underlying_type_by_name(&self, _name: &str) -> Option<TypeSignature> {
        None
    }
}

impl<F> TypeResolver for F
where
    F: Fn(TableId, u32) -> Option<String>,
{
    fn type_name(&self, table: TableId, row: u32) -> Option<String> {
        self(table, row)
    }
}

/// The type of a value as described by serialization type tags
#[derive(Debug, Clone, PartialEq)]
enum SerType {
    Primitive(u8),
    String,
    Type,
    Boxed,
    /// Enum name and the tag of its underlying type
    Enum(String, u8),
    SzArray(Box<SerType>),
}

/// The serialization tag of a primitive signature type
fn primitive_tag(signature: &TypeSignature) -> Option<u8> {
    Some(match signature {
        TypeSignature::Boolean => SERIALIZATION_TYPE::BOOLEAN,
        TypeSignature::Char => SERIALIZATION_TYPE::CHAR,
        TypeSignature::I1 => SERIALIZATION_TYPE::I1,
        TypeSignature::U1 => SERIALIZATION_TYPE::U1,
        TypeSignature::I2 => SERIALIZATION_TYPE::I2,
        TypeSignature::U2 => SERIALIZATION_TYPE::U2,
        TypeSignature::I4 => SERIALIZATION_TYPE::I4,
        TypeSignature::U4 => SERIALIZATION_TYPE::U4,
        TypeSignature::I8 => SERIALIZATION_TYPE::I8,
        TypeSignature::U8 => SERIALIZATION_TYPE::U8,
        TypeSignature::R4 => SERIALIZATION_TYPE::R4,
        TypeSignature::R8 => SERIALIZATION_TYPE::R8,
        _ => return None,
    })
}

/// The underlying type tag of a framework enum, by full name
fn well_known_enum(name: &str) -> Option<u8> {
    WELL_KNOWN_ENUMS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, tag)| *tag)
}

/// Integer and boolean/char tags are the only valid enum underlying types
fn enum_tag(signature: &TypeSignature) -> Option<u8> {
    primitive_tag(signature)
        .filter(|tag| !matches!(*tag, SERIALIZATION_TYPE::R4 | SERIALIZATION_TYPE::R8))
}

/// Decode a custom attribute blob
///
/// ## Arguments
/// * `data`    - The blob, as stored in the `#Blob` heap
/// * `params`  - The parameter types of the attribute constructor
/// * `resolver` - Name and enum lookup for types referenced by `params` and the blob
///
/// # Errors
/// Returns an error if the prolog is invalid, or a fixed argument can not be decoded
pub fn parse_custom_attribute_blob(
    data: &[u8],
    params: &[TypeSignature],
    resolver: &dyn TypeResolver,
) -> Result<CustomAttributeValue> {
    CustomAttributeParser::new(data, resolver).parse_custom_attribute(params)
}

/// Stateful decoder over a single custom attribute blob
pub struct CustomAttributeParser<'a, 'r> {
    parser: Parser<'a>,
    resolver: &'r dyn TypeResolver,
    depth: usize,
}

impl<'a, 'r> CustomAttributeParser<'a, 'r> {
    /// Create a new parser over `data`, resolving types through `resolver`
    #[must_use]
    pub fn new(data: &'a [u8], resolver: &'r dyn TypeResolver) -> Self {
        CustomAttributeParser {
            parser: Parser::new(data),
            resolver,
            depth: 0,
        }
    }

    /// Decode the blob into fixed and named arguments
    ///
    /// An empty blob is accepted for constructors without parameters. Decoding of named
    /// arguments stops at the first one which can not be read; the ones read up to that point
    /// are kept.
    ///
    /// # Errors
    /// Returns an error if the prolog is invalid, or a fixed argument can not be decoded
    pub fn parse_custom_attribute(
        &mut self,
        params: &[TypeSignature],
    ) -> Result<CustomAttributeValue> {
        if self.parser.is_empty() {
            if params.is_empty() {
                return Ok(CustomAttributeValue::default());
            }

            return Err(malformed_error!(
                "Empty custom attribute blob for {} constructor parameters",
                params.len()
            ));
        }

        let prolog = self.parser.read_le::<u16>()?;
        if prolog != 0x0001 {
            return Err(malformed_error!(
                "Invalid custom attribute prolog - expected 0x0001, got {:#06x}",
                prolog
            ));
        }

        let mut fixed_args = Vec::with_capacity(params.len());
        for param in params {
            fixed_args.push(self.parse_fixed_argument(param)?);
        }

        let mut named_args = Vec::new();
        if self.parser.remaining() >= 2 {
            let named_count = self.parser.read_le::<u16>()?;
            for _ in 0..named_count {
                match self.parse_named_argument() {
                    Ok(named) => named_args.push(named),
                    Err(_) => break,
                }
            }
        }

        Ok(CustomAttributeValue {
            fixed_args,
            named_args,
        })
    }

    fn parse_fixed_argument(&mut self, param: &TypeSignature) -> Result<CustomAttributeArgument> {
        if let Some(tag) = primitive_tag(param) {
            return self.parse_primitive(tag);
        }

        let ser_type = match param {
            TypeSignature::String => SerType::String,
            TypeSignature::Object => SerType::Boxed,
            TypeSignature::Class(table, row) => match self.resolver.type_name(*table, *row) {
                Some(name) if name == SYSTEM_TYPE => SerType::Type,
                Some(name) if name == "System.Object" => SerType::Boxed,
                Some(name) if name == "System.String" => SerType::String,
                _ => return Err(NotSupported),
            },
            TypeSignature::ValueType(table, row) => {
                let name = self.resolver.type_name(*table, *row).unwrap_or_default();
                let underlying = self
                    .resolver
                    .enum_underlying_type(*table, *row)
                    .as_ref()
                    .and_then(enum_tag)
                    .or_else(|| well_known_enum(&name));

                match underlying {
                    Some(tag) => SerType::Enum(name, tag),
                    None => {
                        return Err(malformed_error!(
                            "Cannot resolve the underlying type of enum '{}'",
                            name
                        ))
                    }
                }
            }
            TypeSignature::SzArray(element) => {
                self.enter()?;
                let result = self.parse_fixed_argument_array(element)?;
                self.depth -= 1;
                return Ok(result);
            }
            _ => return Err(NotSupported),
        };

        self.parse_value(&ser_type)
    }

    fn parse_fixed_argument_array(
        &mut self,
        element: &TypeSignature,
    ) -> Result<CustomAttributeArgument> {
        let count = self.parser.read_le::<u32>()?;
        if count == u32::MAX {
            return Ok(CustomAttributeArgument::Null);
        }

        // Every element occupies at least one byte
        if count as usize > self.parser.remaining() {
            return Err(malformed_error!("Array length exceeds blob - {}", count));
        }

        let mut values = Vec::with_capacity(count as usize);
        for _ in 0..count {
            values.push(self.parse_fixed_argument(element)?);
        }

        Ok(CustomAttributeArgument::Array(values))
    }

    fn parse_named_argument(&mut self) -> Result<CustomAttributeNamedArgument> {
        let is_field = match self.parser.read_le::<u8>()? {
            SERIALIZATION_TYPE::FIELD => true,
            SERIALIZATION_TYPE::PROPERTY => false,
            other => {
                return Err(malformed_error!(
                    "Invalid field/property indicator: {:#04x}",
                    other
                ))
            }
        };

        let ser_type = self.parse_ser_type()?;
        let Some(name) = self.parser.read_ser_string()? else {
            return Err(malformed_error!("Named argument without name"));
        };

        Ok(CustomAttributeNamedArgument {
            is_field,
            name,
            value: self.parse_value(&ser_type)?,
        })
    }

    /// Read a `FieldOrPropType`: a serialization tag, plus the enum name or element type
    fn parse_ser_type(&mut self) -> Result<SerType> {
        self.enter()?;

        let tag = self.parser.read_le::<u8>()?;
        let ser_type = match tag {
            SERIALIZATION_TYPE::BOOLEAN..=SERIALIZATION_TYPE::R8 => SerType::Primitive(tag),
            SERIALIZATION_TYPE::STRING => SerType::String,
            SERIALIZATION_TYPE::TYPE => SerType::Type,
            SERIALIZATION_TYPE::TAGGED_OBJECT => SerType::Boxed,
            SERIALIZATION_TYPE::ENUM => {
                let name = self.parser.read_ser_string()?.unwrap_or_default();
                let tag = self.named_enum_tag(&name);
                SerType::Enum(name, tag)
            }
            SERIALIZATION_TYPE::SZARRAY => SerType::SzArray(Box::new(self.parse_ser_type()?)),
            _ => {
                return Err(malformed_error!(
                    "Unsupported serialization type: {:#04x}",
                    tag
                ))
            }
        };

        self.depth -= 1;
        Ok(ser_type)
    }

    fn parse_value(&mut self, ser_type: &SerType) -> Result<CustomAttributeArgument> {
        self.enter()?;

        let value = match ser_type {
            SerType::Primitive(tag) => self.parse_primitive(*tag)?,
            SerType::String => match self.parser.read_ser_string()? {
                Some(value) => CustomAttributeArgument::String(value),
                None => CustomAttributeArgument::Null,
            },
            SerType::Type => match self.parser.read_ser_string()? {
                Some(value) => CustomAttributeArgument::Type(value),
                None => CustomAttributeArgument::Null,
            },
            SerType::Boxed => {
                let boxed_type = self.parse_ser_type()?;
                self.parse_value(&boxed_type)?
            }
            SerType::Enum(name, tag) => {
                CustomAttributeArgument::Enum(name.clone(), Box::new(self.parse_primitive(*tag)?))
            }
            SerType::SzArray(element) => {
                let count = self.parser.read_le::<u32>()?;
                if count == u32::MAX {
                    CustomAttributeArgument::Null
                } else {
                    if count as usize > self.parser.remaining() {
                        return Err(malformed_error!("Array length exceeds blob - {}", count));
                    }

                    let mut values = Vec::with_capacity(count as usize);
                    for _ in 0..count {
                        values.push(self.parse_value(element)?);
                    }
                    CustomAttributeArgument::Array(values)
                }
            }
        };

        self.depth -= 1;
        Ok(value)
    }

    fn parse_primitive(&mut self, tag: u8) -> Result<CustomAttributeArgument> {
        Ok(match tag {
            SERIALIZATION_TYPE::BOOLEAN => {
                CustomAttributeArgument::Bool(self.parser.read_le::<u8>()? != 0)
            }
            SERIALIZATION_TYPE::CHAR => {
                let code_unit = self.parser.read_le::<u16>()?;
                CustomAttributeArgument::Char(
                    char::from_u32(u32::from(code_unit)).unwrap_or(char::REPLACEMENT_CHARACTER),
                )
            }
            SERIALIZATION_TYPE::I1 => CustomAttributeArgument::I1(self.parser.read_le::<i8>()?),
            SERIALIZATION_TYPE::U1 => CustomAttributeArgument::U1(self.parser.read_le::<u8>()?),
            SERIALIZATION_TYPE::I2 => CustomAttributeArgument::I2(self.parser.read_le::<i16>()?),
            SERIALIZATION_TYPE::U2 => CustomAttributeArgument::U2(self.parser.read_le::<u16>()?),
            SERIALIZATION_TYPE::I4 => CustomAttributeArgument::I4(self.parser.read_le::<i32>()?),
            SERIALIZATION_TYPE::U4 => CustomAttributeArgument::U4(self.parser.read_le::<u32>()?),
            SERIALIZATION_TYPE::I8 => CustomAttributeArgument::I8(self.parser.read_le::<i64>()?),
            SERIALIZATION_TYPE::U8 => CustomAttributeArgument::U8(self.parser.read_le::<u64>()?),
            SERIALIZATION_TYPE::R4 => CustomAttributeArgument::R4(self.parser.read_le::<f32>()?),
            SERIALIZATION_TYPE::R8 => CustomAttributeArgument::R8(self.parser.read_le::<f64>()?),
            _ => return Err(malformed_error!("Not a primitive type tag - {:#04x}", tag)),
        })
    }

    /// The underlying type of an enum named in the blob, `int32` unless it is known otherwise
    fn named_enum_tag(&self, name: &str) -> u8 {
        // Names of enums from other assemblies are assembly qualified
        let type_name = name.split(',').next().unwrap_or(name).trim();

        self.resolver
            .enum_underlying_type_by_name(type_name)
            .as_ref()
            .and_then(enum_tag)
            .or_else(|| well_known_enum(type_name))
            .unwrap_or(SERIALIZATION_TYPE::I4)
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(RecursionLimit(MAX_NESTING_DEPTH));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn resolve(table: TableId, row: u32) -> Option<String> {
        match (table, row) {
            (TableId::TypeRef, 1) => Some("System.Type".to_string()),
            (TableId::TypeRef, 2) => Some("System.AttributeTargets".to_string()),
            (TableId::TypeRef, 3) => Some("System.Exception".to_string()),
            (TableId::TypeRef, 4) => Some("System.Security.SecurityRuleSet".to_string()),
            _ => None,
        }
    }

    /// Knows the byte-backed enum `Sample.Level`, `TypeDef` 4
    struct SampleTypes;

    impl TypeResolver for SampleTypes {
        fn type_name(&self, table: TableId, row: u32) -> Option<String> {
            match (table, row) {
                (TableId::TypeDef, 4) => Some("Sample.Level".to_string()),
                _ => resolve(table, row),
            }
        }

        fn enum_underlying_type(&self, table: TableId, row: u32) -> Option<TypeSignature> {
            (table == TableId::TypeDef && row == 4).then_some(TypeSignature::U1)
        }

        fn enum_underlying_type_by_name(&self, name: &str) -> Option<TypeSignature> {
            (name == "Sample.Level").then_some(TypeSignature::U1)
        }
    }

    fn parse(data: &[u8], params: &[TypeSignature]) -> Result<CustomAttributeValue> {
        parse_custom_attribute_blob(data, params, &resolve)
    }

    #[test]
    fn string_argument() {
        #[rustfmt::skip]
        let data = [
            0x01, 0x00,
            0x05, b'1', b'.', b'2', b'.', b'3',
            0x00, 0x00,
        ];

        let value = parse(&data, &[TypeSignature::String]).unwrap();
        assert_eq!(
            value.fixed_args,
            vec![CustomAttributeArgument::String("1.2.3".into())]
        );
        assert!(value.named_args.is_empty());
    }

    #[test]
    fn null_string_argument() {
        let value = parse(&[0x01, 0x00, 0xFF, 0x00, 0x00], &[TypeSignature::String]).unwrap();
        assert_eq!(value.fixed_args, vec![CustomAttributeArgument::Null]);
    }

    #[test]
    fn primitive_arguments() {
        #[rustfmt::skip]
        let data = [
            0x01, 0x00,
            0x01,                               // bool
            0x41, 0x00,                         // char 'A'
            0xFE,                               // i1
            0x08, 0x00, 0x00, 0x00,             // i4
            0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // u8
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF8, 0x3F, // r8 1.5
            0x00, 0x00,
        ];

        let params = [
            TypeSignature::Boolean,
            TypeSignature::Char,
            TypeSignature::I1,
            TypeSignature::I4,
            TypeSignature::U8,
            TypeSignature::R8,
        ];

        let value = parse(&data, &params).unwrap();
        assert_eq!(
            value.fixed_args,
            vec![
                CustomAttributeArgument::Bool(true),
                CustomAttributeArgument::Char('A'),
                CustomAttributeArgument::I1(-2),
                CustomAttributeArgument::I4(8),
                CustomAttributeArgument::U8(u64::MAX),
                CustomAttributeArgument::R8(1.5),
            ]
        );
    }

    #[test]
    fn type_enum_and_object() {
        #[rustfmt::skip]
        let data = [
            0x01, 0x00,
            0x0C, b'S', b'y', b's', b't', b'e', b'm', b'.', b'I', b'n', b't', b'3', b'2', // System.Type
            0x04, 0x00, 0x00, 0x00,             // AttributeTargets.Class
            0x08, 0x2A, 0x00, 0x00, 0x00,       // object: boxed int32
            0x00, 0x00,
        ];

        let params = [
            TypeSignature::Class(TableId::TypeRef, 1),
            TypeSignature::ValueType(TableId::TypeRef, 2),
            TypeSignature::Object,
        ];

        let value = parse(&data, &params).unwrap();
        assert_eq!(
            value.fixed_args,
            vec![
                CustomAttributeArgument::Type("System.Int32".into()),
                CustomAttributeArgument::Enum(
                    "System.AttributeTargets".into(),
                    Box::new(CustomAttributeArgument::I4(4))
                ),
                CustomAttributeArgument::I4(42),
            ]
        );
    }

    #[test]
    fn enum_underlying_types() {
        #[rustfmt::skip]
        let data = [
            0x01, 0x00,
            0x02,                               // Sample.Level, one byte
            0x01, 0x00,
            0x54, 0x02, 0x04, b'F', b'l', b'a', b'g', 0x01,
        ];

        let value = parse_custom_attribute_blob(
            &data,
            &[TypeSignature::ValueType(TableId::TypeDef, 4)],
            &SampleTypes,
        )
        .unwrap();

        assert_eq!(
            value.fixed_args,
            vec![CustomAttributeArgument::Enum(
                "Sample.Level".into(),
                Box::new(CustomAttributeArgument::U1(2))
            )]
        );
        assert_eq!(value.fixed_args[0].to_string(), "2");
        assert_eq!(value.named_args.len(), 1);
        assert_eq!(value.named_args[0].name, "Flag");
        assert_eq!(value.named_args[0].value, CustomAttributeArgument::Bool(true));

        // Without enum definitions the same blob can not be decoded
        assert!(parse(&data, &[TypeSignature::ValueType(TableId::TypeDef, 4)]).is_err());
        assert!(parse(&data, &[TypeSignature::ValueType(TableId::TypeRef, 9)]).is_err());

        // Framework enums are known by name
        let value = parse(
            &[0x01, 0x00, 0x02, 0x00, 0x00],
            &[TypeSignature::ValueType(TableId::TypeRef, 4)],
        )
        .unwrap();
        assert_eq!(
            value.fixed_args,
            vec![CustomAttributeArgument::Enum(
                "System.Security.SecurityRuleSet".into(),
                Box::new(CustomAttributeArgument::U1(2))
            )]
        );
    }

    #[test]
    fn named_enum_underlying_types() {
        #[rustfmt::skip]
        let data = [
            0x01, 0x00,
            0x03, 0x00,
            0x53, 0x55,                         // field Sample.Level
            0x0C, b'S', b'a', b'm', b'p', b'l', b'e', b'.', b'L', b'e', b'v', b'e', b'l',
            0x01, b'A',
            0x03,
            0x53, 0x55,                         // field Sample.Level, assembly qualified
            0x14, b'S', b'a', b'm', b'p', b'l', b'e', b'.', b'L', b'e', b'v', b'e', b'l',
                  b',', b' ', b'S', b'a', b'm', b'p', b'l', b'e',
            0x01, b'B',
            0x04,
            0x53, 0x55,                         // field Other.Mode, int32 assumed
            0x0A, b'O', b't', b'h', b'e', b'r', b'.', b'M', b'o', b'd', b'e',
            0x01, b'C',
            0x05, 0x00, 0x00, 0x00,
        ];

        let value = parse_custom_attribute_blob(&data, &[], &SampleTypes).unwrap();
        assert_eq!(value.named_args.len(), 3);

        let underlying = |index: usize| match &value.named_args[index].value {
            CustomAttributeArgument::Enum(_, underlying) => (**underlying).clone(),
            other => panic!("not an enum: {other:?}"),
        };

        assert_eq!(underlying(0), CustomAttributeArgument::U1(3));
        assert_eq!(underlying(1), CustomAttributeArgument::U1(4));
        assert_eq!(underlying(2), CustomAttributeArgument::I4(5));
    }

    #[test]
    fn arrays() {
        #[rustfmt::skip]
        let data = [
            0x01, 0x00,
            0x02, 0x00, 0x00, 0x00, 0x01, b'a', 0xFF,  // string[] { "a", null }
            0xFF, 0xFF, 0xFF, 0xFF,                    // null int[]
            0x00, 0x00,
        ];

        let params = [
            TypeSignature::SzArray(Box::new(TypeSignature::String)),
            TypeSignature::SzArray(Box::new(TypeSignature::I4)),
        ];

        let value = parse(&data, &params).unwrap();
        assert_eq!(
            value.fixed_args,
            vec![
                CustomAttributeArgument::Array(vec![
                    CustomAttributeArgument::String("a".into()),
                    CustomAttributeArgument::Null,
                ]),
                CustomAttributeArgument::Null,
            ]
        );

        // Length beyond the end of the blob
        let data = [0x01, 0x00, 0x10, 0x00, 0x00, 0x00, 0x01];
        assert!(parse(&data, &[TypeSignature::SzArray(Box::new(TypeSignature::U1))]).is_err());
    }

    #[test]
    fn named_arguments() {
        #[rustfmt::skip]
        let data = [
            0x01, 0x00,
            0x02, 0x00,
            0x54, 0x02,                         // property bool
            0x16, b'W', b'r', b'a', b'p', b'N', b'o', b'n', b'E', b'x', b'c', b'e', b'p', b't',
                  b'i', b'o', b'n', b'T', b'h', b'r', b'o', b'w', b's',
            0x01,
            0x53, 0x55,                         // field enum
            0x17, b'S', b'y', b's', b't', b'e', b'm', b'.', b'A', b't', b't', b'r', b'i', b'b',
                  b'u', b't', b'e', b'T', b'a', b'r', b'g', b'e', b't', b's',
            0x02, b'O', b'n',
            0x01, 0x00, 0x00, 0x00,
        ];

        let value = parse(&data, &[]).unwrap();
        assert!(value.fixed_args.is_empty());
        assert_eq!(value.named_args.len(), 2);

        assert!(!value.named_args[0].is_field);
        assert_eq!(value.named_args[0].name, "WrapNonExceptionThrows");
        assert_eq!(value.named_args[0].value, CustomAttributeArgument::Bool(true));

        assert!(value.named_args[1].is_field);
        assert_eq!(value.named_args[1].name, "On");
        assert_eq!(
            value.named_args[1].value,
            CustomAttributeArgument::Enum(
                "System.AttributeTargets".into(),
                Box::new(CustomAttributeArgument::I4(1))
            )
        );
    }

    #[test]
    fn named_arguments_stop_quietly() {
        #[rustfmt::skip]
        let data = [
            0x01, 0x00,
            0x08, 0x00, 0x00, 0x00,
            0x02, 0x00,
            0x54, 0x08, 0x01, b'A', 0x07, 0x00, 0x00, 0x00,
            0x54, 0x99, 0x01, b'B',             // unknown type tag
        ];

        let value = parse(&data, &[TypeSignature::I4]).unwrap();
        assert_eq!(value.fixed_args, vec![CustomAttributeArgument::I4(8)]);
        assert_eq!(value.named_args.len(), 1);
        assert_eq!(value.named_args[0].value, CustomAttributeArgument::I4(7));
    }

    #[test]
    fn empty_blob() {
        assert_eq!(parse(&[], &[]).unwrap(), CustomAttributeValue::default());
        assert!(parse(&[], &[TypeSignature::String]).is_err());

        // Prolog only, no named argument count
        let value = parse(&[0x01, 0x00], &[]).unwrap();
        assert!(value.named_args.is_empty());
    }

    #[test]
    fn errors() {
        assert!(parse(&[0x02, 0x00], &[]).is_err());
        assert!(matches!(
            parse(&[0x01, 0x00, 0x05, b'a'], &[TypeSignature::String]),
            Err(Error::OutOfBounds)
        ));
        assert!(matches!(
            parse(&[0x01, 0x00, 0x00], &[TypeSignature::Class(TableId::TypeRef, 3)]),
            Err(NotSupported)
        ));
        assert!(matches!(
            parse(&[0x01, 0x00, 0x00], &[TypeSignature::I]),
            Err(NotSupported)
        ));

        let mut nested = vec![0x01, 0x00];
        for _ in 0..100 {
            nested.push(0x51);
        }
        assert!(matches!(
            parse(&nested, &[TypeSignature::Object]),
            Err(RecursionLimit(_))
        ));
    }
}

//! Decoder for method and field signature blobs.

use crate::{
    file::parser::Parser,
    metadata::signatures::{SignatureMethod, TypeSignature, CALLING_CONVENTION, ELEMENT_TYPE},
    Error::RecursionLimit,
    Result,
};

const MAX_RECURSION_DEPTH: usize = 50;

/// Parser for method signature blobs
pub struct SignatureParser<'a> {
    parser: Parser<'a>,
    depth: usize,
}

impl<'a> SignatureParser<'a> {
    /// Create a new `SignatureParser` from a byte slice
    ///
    /// ## Arguments
    /// * 'data' - The byte slice to read from
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        SignatureParser {
            parser: Parser::new(data),
            depth: 0,
        }
    }

    /// Parse a method signature from the blob - `MethodDefSig` or `MethodRefSig`
    ///
    /// Vararg methods are accepted, the types following the sentinel are ignored.
    ///
    /// # Errors
    /// Returns an error if the signature data is malformed or contains a type which can not be
    /// part of a custom attribute constructor
    pub fn parse_method_signature(&mut self) -> Result<SignatureMethod> {
        let convention_byte = self.parser.read_le::<u8>()?;

        let param_count_generic = if convention_byte & CALLING_CONVENTION::GENERIC != 0 {
            self.parser.read_compressed_uint()?
        } else {
            0
        };

        let param_count = self.parser.read_compressed_uint()?;
        let return_type = self.parse_param()?;

        let mut params = Vec::with_capacity((param_count as usize).min(self.parser.remaining()));
        for _ in 0..param_count {
            if self.parser.peek_byte()? == ELEMENT_TYPE::SENTINEL {
                break;
            }

            params.push(self.parse_param()?);
        }

        Ok(SignatureMethod {
            has_this: convention_byte & CALLING_CONVENTION::HASTHIS != 0,
            explicit_this: convention_byte & CALLING_CONVENTION::EXPLICITTHIS != 0,
            param_count_generic,
            return_type,
            params,
        })
    }

    /// Parse a field signature from the blob - `FieldSig` (II.23.2.4)
    ///
    /// Custom modifiers are skipped; the field type is returned.
    ///
    /// # Errors
    /// Returns an error if the signature does not start with `FIELD` or the type is malformed
    pub fn parse_field_signature(&mut self) -> Result<TypeSignature> {
        let head_byte = self.parser.read_le::<u8>()?;
        if head_byte != CALLING_CONVENTION::FIELD {
            return Err(malformed_error!(
                "SignatureField - invalid start - {:#x}",
                head_byte
            ));
        }

        self.skip_custom_mods()?;
        self.parse_type()
    }

    /// Parse a parameter or return type, including custom modifiers and the by-ref marker
    fn parse_param(&mut self) -> Result<TypeSignature> {
        self.skip_custom_mods()?;

        if self.parser.peek_byte()? == ELEMENT_TYPE::BYREF {
            self.parser.advance_by(1)?;
            return Ok(TypeSignature::ByRef(Box::new(self.parse_type()?)));
        }

        if self.parser.peek_byte()? == ELEMENT_TYPE::TYPEDBYREF {
            self.parser.advance_by(1)?;
            return Ok(TypeSignature::TypedByRef);
        }

        self.parse_type()
    }

    fn parse_type(&mut self) -> Result<TypeSignature> {
        self.depth += 1;
        if self.depth >= MAX_RECURSION_DEPTH {
            return Err(RecursionLimit(MAX_RECURSION_DEPTH));
        }

        let current_byte = self.parser.read_le::<u8>()?;
        let result = match current_byte {
            ELEMENT_TYPE::VOID => TypeSignature::Void,
            ELEMENT_TYPE::BOOLEAN => TypeSignature::Boolean,
            ELEMENT_TYPE::CHAR => TypeSignature::Char,
            ELEMENT_TYPE::I1 => TypeSignature::I1,
            ELEMENT_TYPE::U1 => TypeSignature::U1,
            ELEMENT_TYPE::I2 => TypeSignature::I2,
            ELEMENT_TYPE::U2 => TypeSignature::U2,
            ELEMENT_TYPE::I4 => TypeSignature::I4,
            ELEMENT_TYPE::U4 => TypeSignature::U4,
            ELEMENT_TYPE::I8 => TypeSignature::I8,
            ELEMENT_TYPE::U8 => TypeSignature::U8,
            ELEMENT_TYPE::R4 => TypeSignature::R4,
            ELEMENT_TYPE::R8 => TypeSignature::R8,
            ELEMENT_TYPE::I => TypeSignature::I,
            ELEMENT_TYPE::U => TypeSignature::U,
            ELEMENT_TYPE::STRING => TypeSignature::String,
            ELEMENT_TYPE::OBJECT => TypeSignature::Object,
            ELEMENT_TYPE::VALUETYPE => {
                let (table, row) = self.parser.read_compressed_token()?;
                TypeSignature::ValueType(table, row)
            }
            ELEMENT_TYPE::CLASS => {
                let (table, row) = self.parser.read_compressed_token()?;
                TypeSignature::Class(table, row)
            }
            ELEMENT_TYPE::SZARRAY => {
                self.skip_custom_mods()?;
                TypeSignature::SzArray(Box::new(self.parse_type()?))
            }
            ELEMENT_TYPE::VAR => TypeSignature::GenericParamType(self.parser.read_compressed_uint()?),
            ELEMENT_TYPE::MVAR => {
                TypeSignature::GenericParamMethod(self.parser.read_compressed_uint()?)
            }
            _ => {
                return Err(malformed_error!(
                    "Unsupported ELEMENT_TYPE - {:#x}",
                    current_byte
                ))
            }
        };

        self.depth -= 1;
        Ok(result)
    }

    /// Skip custom modifiers (`CMOD_OPT` or `CMOD_REQD`)
    fn skip_custom_mods(&mut self) -> Result<()> {
        while self.parser.has_more_data() {
            let next_byte = self.parser.peek_byte()?;
            if next_byte != ELEMENT_TYPE::CMOD_OPT && next_byte != ELEMENT_TYPE::CMOD_REQD {
                break;
            }

            self.parser.advance_by(1)?;
            self.parser.read_compressed_token()?;
        }

        Ok(())
    }
}

//! Cursor based parser for metadata blobs and signatures.
//!
//! The [`Parser`] keeps a position into a borrowed byte slice and offers the ECMA-335 specific
//! primitives needed to walk signatures and custom attribute blobs: little-endian reads,
//! compressed unsigned integers (II.23.2), compressed `TypeDefOrRefOrSpecEncoded` tokens and
//! `SerString` values (II.23.3).
//!
//! # Examples
//!
//! ```rust,ignore
//! use dotversion::file::parser::Parser;
//!
//! let blob = [0x01, 0x00, 0x05, b'H', b'e', b'l', b'l', b'o'];
//! let mut parser = Parser::new(&blob);
//! assert_eq!(parser.read_le::<u16>()?, 0x0001);
//! assert_eq!(parser.read_ser_string()?.as_deref(), Some("Hello"));
//! assert!(!parser.has_more_data());
//! # Ok::<(), dotversion::Error>(())
//! ```

use crate::{
    file::io::{read_le_at, CilIO},
    metadata::tables::TableId,
    Error::OutOfBounds,
    Result,
};

/// A forward-only reader over a byte slice.
pub struct Parser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser positioned at the start of `data`
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Total length of the underlying data
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the underlying data is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true while unread bytes remain
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Number of unread bytes
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Current position
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Skip `step` bytes
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if this would move past the end of the data
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        if step > self.remaining() {
            return Err(OutOfBounds);
        }

        self.position += step;
        Ok(())
    }

    /// Read the next byte without consuming it
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if no data is left
    pub fn peek_byte(&self) -> Result<u8> {
        match self.data.get(self.position) {
            Some(byte) => Ok(*byte),
            None => Err(OutOfBounds),
        }
    }

    /// Read a little-endian value and advance
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough data is left
    pub fn read_le<T: CilIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Read `len` raw bytes and advance
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough data is left
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(OutOfBounds);
        }

        let bytes = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    /// Read a compressed unsigned integer (ECMA-335 II.23.2)
    ///
    /// # Errors
    /// Returns an error if the data is truncated or the leading byte is not a valid encoding
    pub fn read_compressed_uint(&mut self) -> Result<u32> {
        let first_byte = self.read_le::<u8>()?;

        // 1-byte encoding: 0xxxxxxx
        if (first_byte & 0x80) == 0 {
            return Ok(u32::from(first_byte));
        }

        // 2-byte encoding: 10xxxxxx xxxxxxxx
        if (first_byte & 0xC0) == 0x80 {
            let second_byte = self.read_le::<u8>()?;
            return Ok(((u32::from(first_byte) & 0x3F) << 8) | u32::from(second_byte));
        }

        // 4-byte encoding: 110xxxxx xxxxxxxx xxxxxxxx xxxxxxxx
        if (first_byte & 0xE0) == 0xC0 {
            let b1 = u32::from(self.read_le::<u8>()?);
            let b2 = u32::from(self.read_le::<u8>()?);
            let b3 = u32::from(self.read_le::<u8>()?);
            return Ok(((u32::from(first_byte) & 0x1F) << 24) | (b1 << 16) | (b2 << 8) | b3);
        }

        Err(malformed_error!("Invalid compressed uint - {}", first_byte))
    }

    /// Read a `TypeDefOrRefOrSpecEncoded` value, as used in signatures
    ///
    /// Returns the referenced table and the 1-based row
    ///
    /// # Errors
    /// Returns an error if the data is truncated or the tag is invalid
    pub fn read_compressed_token(&mut self) -> Result<(TableId, u32)> {
        let compressed_token = self.read_compressed_uint()?;

        let table = match compressed_token & 0x3 {
            0x0 => TableId::TypeDef,
            0x1 => TableId::TypeRef,
            0x2 => TableId::TypeSpec,
            _ => {
                return Err(malformed_error!(
                    "Invalid compressed token - {}",
                    compressed_token
                ))
            }
        };

        Ok((table, compressed_token >> 2))
    }

    /// Read a `SerString` - a compressed length followed by UTF-8 bytes
    ///
    /// The single byte `0xFF` encodes a null string, which is returned as `None`.
    ///
    /// # Errors
    /// Returns an error if the data is truncated or not valid UTF-8
    pub fn read_ser_string(&mut self) -> Result<Option<String>> {
        if self.peek_byte()? == 0xFF {
            self.position += 1;
            return Ok(None);
        }

        let len = self.read_compressed_uint()? as usize;
        let bytes = self.read_bytes(len)?;
        match std::str::from_utf8(bytes) {
            Ok(value) => Ok(Some(value.to_string())),
            Err(_) => Err(malformed_error!(
                "Invalid UTF-8 in SerString at offset {}",
                self.position - len
            )),
        }
    }
}

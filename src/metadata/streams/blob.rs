//! The `#Blob` heap (ECMA-335 II.24.2.4).

use crate::{file::parser::Parser, Error::OutOfBounds, Result};

/// The `#Blob` heap (ECMA-335 II.24.2.4): byte sequences prefixed by their compressed length,
/// addressed by byte offset. Offset `0` is always the empty blob.
pub struct Blob<'a> {
    data: &'a [u8],
}

impl<'a> Blob<'a> {
    /// Create a view over a `#Blob` heap
    ///
    /// # Errors
    /// Returns an error if the heap is empty or does not start with the empty blob
    pub fn from(data: &'a [u8]) -> Result<Blob<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Invalid memory for #Blob heap"));
        }

        Ok(Blob { data })
    }

    /// Get the blob starting at `index`, without its length prefix
    ///
    /// # Errors
    /// Returns an error if `index` is out of range or the length prefix exceeds the heap
    pub fn get(&self, index: usize) -> Result<&'a [u8]> {
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(&self.data[index..]);
        let len = parser.read_compressed_uint()? as usize;
        let data_start = index + parser.pos();

        let Some(data_end) = data_start.checked_add(len) else {
            return Err(OutOfBounds);
        };

        if data_end > self.data.len() {
            return Err(OutOfBounds);
        }

        Ok(&self.data[data_start..data_end])
    }
}

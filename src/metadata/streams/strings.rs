//! The `#Strings` heap (ECMA-335 II.24.2.3).

use std::{ffi::CStr, str};

use crate::{Error::OutOfBounds, Result};

/// The `#Strings` heap (ECMA-335 II.24.2.3): NUL terminated UTF-8 identifiers, addressed by
/// byte offset. Offset `0` is always the empty string.
pub struct Strings<'a> {
    data: &'a [u8],
}

impl<'a> Strings<'a> {
    /// Create a view over a `#Strings` heap
    ///
    /// # Errors
    /// Returns an error if the heap is empty or does not start with the empty string
    pub fn from(data: &'a [u8]) -> Result<Strings<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Provided #Strings heap is empty"));
        }

        Ok(Strings { data })
    }

    /// Get the string starting at `index`
    ///
    /// # Errors
    /// Returns an error if `index` is out of range, or the string is not terminated or not
    /// valid UTF-8
    pub fn get(&self, index: usize) -> Result<&'a str> {
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        match CStr::from_bytes_until_nul(&self.data[index..]) {
            Ok(result) => match result.to_str() {
                Ok(result) => Ok(result),
                Err(_) => Err(malformed_error!("Invalid string at index - {}", index)),
            },
            Err(_) => Err(malformed_error!("Invalid string at index - {}", index)),
        }
    }
}

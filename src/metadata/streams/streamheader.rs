//! Stream headers of the metadata root.

use crate::{file::io::read_le, Error::OutOfBounds, Result};

/// Names of the streams this crate knows about
pub const STREAM_NAMES: [&str; 6] = ["#~", "#-", "#Strings", "#US", "#GUID", "#Blob"];

/// A stream header of the metadata root (ECMA-335 II.24.2.2).
///
/// The header locates a stream relative to the start of the metadata root. Its on-disk size is
/// 8 bytes plus the NUL terminated name, padded to a multiple of 4.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamHeader {
    /// Offset of the stream, relative to the metadata root
    pub offset: u32,
    /// Size of the stream in bytes
    pub size: u32,
    /// Name of the stream
    pub name: String,
}

impl StreamHeader {
    /// Parse a stream header from the start of `data`
    ///
    /// # Errors
    /// Returns an error if the data is truncated, or the name is not terminated within 32 bytes
    pub fn from(data: &[u8]) -> Result<StreamHeader> {
        if data.len() < 9 {
            return Err(OutOfBounds);
        }

        let name_bytes = &data[8..data.len().min(8 + 32)];
        let Some(name_len) = name_bytes.iter().position(|byte| *byte == 0) else {
            return Err(malformed_error!("Stream header name is not terminated"));
        };

        let name = String::from_utf8_lossy(&name_bytes[..name_len]).into_owned();

        Ok(StreamHeader {
            offset: read_le::<u32>(data)?,
            size: read_le::<u32>(&data[4..])?,
            name,
        })
    }

    /// Returns true for the streams listed in [`STREAM_NAMES`]
    #[must_use]
    pub fn is_known(&self) -> bool {
        STREAM_NAMES.contains(&self.name.as_str())
    }

    /// Size of this header as stored in the metadata root
    #[must_use]
    pub fn stored_size(&self) -> usize {
        8 + ((self.name.len() + 1 + 3) & !3)
    }
}

//! The metadata root (ECMA-335 II.24.2.1).
//!
//! The root sits at the start of the metadata block referenced by the CLI header. It carries the
//! runtime version string the image was built against and the directory of metadata streams.
//!
//! # Example
//!
//! ```rust,ignore
//! use dotversion::metadata::root::Root;
//!
//! let root = Root::read(metadata)?;
//! println!("Built against {}", root.version);
//! for stream in &root.stream_headers {
//!     println!("{} at {:#x}", stream.name, stream.offset);
//! }
//! ```

use tracing::warn;

use crate::{
    file::io::{read_le, read_le_at},
    metadata::streams::StreamHeader,
    Error::OutOfBounds,
    Result,
};

/// The `BSJB` signature of the metadata root
pub const CIL_HEADER_MAGIC: u32 = 0x424A_5342;

/// Upper bound of stream headers a root may declare, known or not
const MAX_STREAMS: u16 = 32;

/// The metadata root header and its stream directory.
pub struct Root {
    /// Magic signature, always [`CIL_HEADER_MAGIC`]
    pub signature: u32,
    /// Major version, 1
    pub major_version: u16,
    /// Minor version, 1
    pub minor_version: u16,
    /// Length of the version string including padding
    pub length: u32,
    /// The runtime version string, e.g. `v4.0.30319`
    pub version: String,
    /// Reserved, always 0
    pub flags: u16,
    /// The stream directory, known streams only
    pub stream_headers: Vec<StreamHeader>,
}

impl Root {
    /// Read the metadata root from the start of the metadata block
    ///
    /// # Arguments
    /// * `data` - The metadata block, as referenced by the CLI header
    ///
    /// # Errors
    /// Returns an error if the data is too short, the signature is invalid, or a known stream
    /// lies outside of the metadata block or is declared twice. Unknown streams are skipped.
    pub fn read(data: &[u8]) -> Result<Root> {
        if data.len() < 20 {
            return Err(OutOfBounds);
        }

        let signature = read_le::<u32>(data)?;
        if signature != CIL_HEADER_MAGIC {
            return Err(malformed_error!(
                "CIL_HEADER_MAGIC does not match - {:#x}",
                signature
            ));
        }

        let length = read_le::<u32>(&data[12..])?;
        let Some(version_end) = (length as usize).checked_add(16) else {
            return Err(malformed_error!("Version string length overflows - {}", length));
        };

        if version_end + 4 > data.len() {
            return Err(OutOfBounds);
        }

        // Version string is NUL padded to a 4 byte boundary
        let version_bytes = &data[16..version_end];
        let version_len = version_bytes
            .iter()
            .position(|byte| *byte == 0)
            .unwrap_or(version_bytes.len());
        let version = String::from_utf8_lossy(&version_bytes[..version_len]).into_owned();

        let mut offset = version_end;
        let flags = read_le_at::<u16>(data, &mut offset)?;
        let stream_count = read_le_at::<u16>(data, &mut offset)?;
        if stream_count == 0 || stream_count > MAX_STREAMS {
            return Err(malformed_error!("Invalid stream count - {}", stream_count));
        }

        let mut stream_headers = Vec::with_capacity(stream_count as usize);
        for _ in 0..stream_count {
            if offset >= data.len() {
                return Err(OutOfBounds);
            }

            let stream = StreamHeader::from(&data[offset..])?;
            offset += stream.stored_size();

            if !stream.is_known() {
                warn!(
                    name = %stream.name,
                    offset = stream.offset,
                    size = stream.size,
                    "skipping unknown metadata stream"
                );
                continue;
            }

            match stream.offset.checked_add(stream.size) {
                Some(end) if end as usize <= data.len() => {}
                Some(_) => return Err(OutOfBounds),
                None => {
                    return Err(malformed_error!(
                        "Stream offset and size overflow - {} + {}",
                        stream.offset,
                        stream.size
                    ))
                }
            }

            if stream_headers
                .iter()
                .any(|existing: &StreamHeader| existing.name == stream.name)
            {
                return Err(malformed_error!("Duplicate stream - {}", stream.name));
            }

            stream_headers.push(stream);
        }

        Ok(Root {
            signature,
            major_version: read_le::<u16>(&data[4..])?,
            minor_version: read_le::<u16>(&data[6..])?,
            length,
            version,
            flags,
            stream_headers,
        })
    }

    /// Find a stream by name
    #[must_use]
    pub fn stream(&self, name: &str) -> Option<&StreamHeader> {
        self.stream_headers.iter().find(|stream| stream.name == name)
    }
}

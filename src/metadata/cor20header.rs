//! The CLI header (ECMA-335 II.25.3.3).
//!
//! Located through the `IMAGE_DIRECTORY_ENTRY_COM_DESCRIPTOR` data directory, the header tells
//! whether a PE image is a .NET assembly at all, and where its metadata lives.

use crate::{file::parser::Parser, Error::OutOfBounds, Result};

/// The CLI (`COR20`) header of a .NET image.
///
/// Only the leading fields are retained; the trailing directories (resources, strong name
/// signature, vtable fixups) play no role in reading metadata.
pub struct Cor20Header {
    /// Size of header in bytes, always 72
    pub cb: u32,
    /// The minimum version of runtime required to run this program
    pub major_runtime_version: u16,
    /// The minor portion of the version
    pub minor_runtime_version: u16,
    /// RVA of the metadata root
    pub meta_data_rva: u32,
    /// Size of the metadata
    pub meta_data_size: u32,
    /// Runtime flags
    pub flags: u32,
    /// Token for the `MethodDef` or File of the entry point for the image
    pub entry_point_token: u32,
}

impl Cor20Header {
    /// Size of the header as stored on disk
    pub const SIZE: usize = 72;

    /// Read the header from the start of `data`
    ///
    /// # Errors
    /// Returns an error if the data is too short, the header size is not 72 or the metadata
    /// directory is empty
    pub fn read(data: &[u8]) -> Result<Cor20Header> {
        if data.len() < Self::SIZE {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(data);

        let cb = parser.read_le::<u32>()?;
        if cb as usize != Self::SIZE {
            return Err(malformed_error!(
                "Invalid CLR header size: expected 72, got {}",
                cb
            ));
        }

        let major_runtime_version = parser.read_le::<u16>()?;
        let minor_runtime_version = parser.read_le::<u16>()?;

        let meta_data_rva = parser.read_le::<u32>()?;
        let meta_data_size = parser.read_le::<u32>()?;
        if meta_data_rva == 0 || meta_data_size == 0 {
            return Err(malformed_error!("Image does not contain metadata"));
        }

        Ok(Cor20Header {
            cb,
            major_runtime_version,
            minor_runtime_version,
            meta_data_rva,
            meta_data_size,
            flags: parser.read_le::<u32>()?,
            entry_point_token: parser.read_le::<u32>()?,
        })
    }
}

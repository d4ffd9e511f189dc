//! PE file access.
//!
//! A [`File`] owns the bytes of a PE image, either memory mapped from disk or held in a buffer,
//! together with the `goblin` view of its headers. Loading fails for images without a CLR
//! runtime header directory, i.e. anything that is not a .NET assembly.
//!
//! - [`File`] - the image, its CLR header location and RVA to offset translation
//! - [`Backend`] - data sources, memory mapped files and owned buffers
//! - [`io`] - little-endian readers
//! - [`parser`] - a cursor for blobs and signatures
//!
//! # Examples
//!
//! ```rust,no_run
//! use dotversion::file::File;
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("assembly.dll"))?;
//! let (clr_rva, clr_size) = file.clr()?;
//! let clr_offset = file.rva_to_offset(clr_rva)?;
//! let cor20 = file.data_slice(clr_offset, clr_size)?;
//! # Ok::<(), dotversion::Error>(())
//! ```

pub mod io;
pub mod parser;

mod memory;
mod physical;

use std::path::Path;

use crate::{
    Error::{Empty, GoblinErr},
    Result,
};

use goblin::pe::PE;
use memory::Memory;
use ouroboros::self_referencing;
use physical::Physical;

/// A source of image bytes.
pub trait Backend: Send + Sync {
    /// Get `len` bytes starting at `offset`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the data
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// All bytes of this backend
    fn data(&self) -> &[u8];

    /// Number of bytes
    fn len(&self) -> usize;
}

#[self_referencing]
/// A loaded PE image carrying a CLR runtime header.
pub struct File {
    /// The backing bytes
    data: Box<dyn Backend>,
    /// The parsed PE headers, borrowing from `data`
    #[borrows(data)]
    #[not_covariant]
    pe: PE<'this>,
}

impl File {
    /// Load an image from disk
    ///
    /// # Errors
    /// Returns an error if the file can not be read, is empty, is not a PE image or carries no
    /// CLR runtime header
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;
        Self::load(input)
    }

    /// Load an image from an owned buffer
    ///
    /// # Errors
    /// Returns an error if the buffer is empty, is not a PE image or carries no CLR runtime
    /// header
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);
        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        let data: Box<dyn Backend> = Box::new(data);
        File::try_new(data, |data| {
            let pe = PE::parse(data.data()).map_err(GoblinErr)?;

            let Some(optional_header) = &pe.header.optional_header else {
                return Err(malformed_error!("File does not have an OptionalHeader"));
            };

            let has_clr_header = optional_header
                .data_directories
                .get_clr_runtime_header()
                .is_some();

            if has_clr_header {
                Ok(pe)
            } else {
                Err(malformed_error!(
                    "File does not have a CLR runtime header directory"
                ))
            }
        })
    }

    /// Size of the image in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.with_data(|data| data.len())
    }

    /// Returns true if the image holds no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All bytes of the image
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.with_data(|data| data.data())
    }

    /// Get `len` bytes starting at file offset `offset`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the image
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.with_data(|data| data.data_slice(offset, len))
    }

    /// RVA and size of the CLR runtime header
    ///
    /// # Errors
    /// Returns an error if the image carries no CLR runtime header directory
    pub fn clr(&self) -> Result<(usize, usize)> {
        self.with_pe(|pe| {
            if let Some(optional_header) = &pe.header.optional_header {
                if let Some(clr_dir) = optional_header.data_directories.get_clr_runtime_header() {
                    return Ok((clr_dir.virtual_address as usize, clr_dir.size as usize));
                }
            }

            Err(malformed_error!(
                "File does not have a CLR runtime header directory"
            ))
        })
    }

    /// Translate a relative virtual address into a file offset
    ///
    /// # Errors
    /// Returns an error if no section contains `rva`
    pub fn rva_to_offset(&self, rva: usize) -> Result<usize> {
        let rva_u32 =
            u32::try_from(rva).map_err(|_| malformed_error!("RVA too large - {:#x}", rva))?;

        self.with_pe(|pe| {
            for section in &pe.sections {
                let size = section.virtual_size.max(section.size_of_raw_data);
                let Some(section_max) = section.virtual_address.checked_add(size) else {
                    return Err(malformed_error!(
                        "Section malformed, causing integer overflow - {} + {}",
                        section.virtual_address,
                        size
                    ));
                };

                if section.virtual_address <= rva_u32 && section_max > rva_u32 {
                    return Ok((rva - section.virtual_address as usize)
                        + section.pointer_to_raw_data as usize);
                }
            }

            Err(malformed_error!(
                "RVA could not be converted to offset - {:#x}",
                rva
            ))
        })
    }
}

//! Raw `Assembly` rows.

use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::tables::{RowReadable, TableId, TableInfo},
    Result,
};

/// The single row of the `Assembly` table (ECMA-335 II.22.2), holding the identity of the
/// assembly this module belongs to.
#[derive(Clone, Debug)]
pub struct AssemblyRaw {
    /// Row identifier
    pub rid: u32,
    /// Hash algorithm used for the manifest
    pub hash_alg_id: u32,
    /// Major version
    pub major_version: u16,
    /// Minor version
    pub minor_version: u16,
    /// Build number
    pub build_number: u16,
    /// Revision number
    pub revision_number: u16,
    /// `AssemblyFlags`
    pub flags: u32,
    /// `#Blob` index of the public key
    pub public_key: u32,
    /// `#Strings` index of the simple name
    pub name: u32,
    /// `#Strings` index of the culture
    pub culture: u32,
}

impl RowReadable for AssemblyRaw {
    const TABLE_ID: TableId = TableId::Assembly;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(AssemblyRaw {
            rid,
            hash_alg_id: read_le_at::<u32>(data, offset)?,
            major_version: read_le_at::<u16>(data, offset)?,
            minor_version: read_le_at::<u16>(data, offset)?,
            build_number: read_le_at::<u16>(data, offset)?,
            revision_number: read_le_at::<u16>(data, offset)?,
            flags: read_le_at::<u32>(data, offset)?,
            public_key: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            culture: read_le_at_dyn(data, offset, sizes.is_large_str())?,
        })
    }
}

//! Raw `Module` rows.

use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::tables::{RowReadable, TableId, TableInfo},
    Result,
};

/// A row of the `Module` table (ECMA-335 II.22.30).
#[derive(Clone, Debug)]
pub struct ModuleRaw {
    /// Row identifier
    pub rid: u32,
    /// Reserved, zero
    pub generation: u16,
    /// `#Strings` index of the module name
    pub name: u32,
    /// `#GUID` index of the module version id
    pub mvid: u32,
    /// `#GUID` index, reserved
    pub encid: u32,
    /// `#GUID` index, reserved
    pub encbaseid: u32,
}

impl RowReadable for ModuleRaw {
    const TABLE_ID: TableId = TableId::Module;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(ModuleRaw {
            rid,
            generation: read_le_at::<u16>(data, offset)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            mvid: read_le_at_dyn(data, offset, sizes.is_large_guid())?,
            encid: read_le_at_dyn(data, offset, sizes.is_large_guid())?,
            encbaseid: read_le_at_dyn(data, offset, sizes.is_large_guid())?,
        })
    }
}

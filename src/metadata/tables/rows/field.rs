//! Raw `Field` rows.

use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::tables::{RowReadable, TableId, TableInfo},
    Result,
};

/// `FieldAttributes::Static`
pub const FIELD_STATIC: u16 = 0x0010;

/// A row of the `Field` table (ECMA-335 II.22.15).
#[derive(Clone, Debug)]
pub struct FieldRaw {
    /// Row identifier
    pub rid: u32,
    /// `FieldAttributes`
    pub flags: u16,
    /// `#Strings` index of the field name
    pub name: u32,
    /// `#Blob` index of the field signature
    pub signature: u32,
}

impl FieldRaw {
    /// Returns true for static fields
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags & FIELD_STATIC != 0
    }
}

impl RowReadable for FieldRaw {
    const TABLE_ID: TableId = TableId::Field;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(FieldRaw {
            rid,
            flags: read_le_at::<u16>(data, offset)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}

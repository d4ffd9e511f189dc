//! Raw `MethodDef` rows.

use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::tables::{RowReadable, TableId, TableInfo},
    Result,
};

/// A row of the `MethodDef` table (ECMA-335 II.22.26).
#[derive(Clone, Debug)]
pub struct MethodDefRaw {
    /// Row identifier
    pub rid: u32,
    /// RVA of the method body
    pub rva: u32,
    /// `MethodImplAttributes`
    pub impl_flags: u16,
    /// `MethodAttributes`
    pub flags: u16,
    /// `#Strings` index of the method name
    pub name: u32,
    /// `#Blob` index of the method signature
    pub signature: u32,
    /// First row in the `Param` table owned by this method
    pub param_list: u32,
}

impl RowReadable for MethodDefRaw {
    const TABLE_ID: TableId = TableId::MethodDef;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(MethodDefRaw {
            rid,
            rva: read_le_at::<u32>(data, offset)?,
            impl_flags: read_le_at::<u16>(data, offset)?,
            flags: read_le_at::<u16>(data, offset)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
            param_list: read_le_at_dyn(data, offset, sizes.is_large(TableId::Param))?,
        })
    }
}

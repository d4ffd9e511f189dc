//! Raw `MemberRef` rows.

use crate::{
    file::io::read_le_at_dyn,
    metadata::tables::{CodedIndex, CodedIndexType, RowReadable, TableId, TableInfo},
    Result,
};

/// A row of the `MemberRef` table (ECMA-335 II.22.25), a reference to a field or method of
/// another type. Attribute constructors from other assemblies are referenced this way.
#[derive(Clone, Debug)]
pub struct MemberRefRaw {
    /// Row identifier
    pub rid: u32,
    /// `MemberRefParent` coded index of the declaring type
    pub class: CodedIndex,
    /// `#Strings` index of the member name
    pub name: u32,
    /// `#Blob` index of the member signature
    pub signature: u32,
}

impl RowReadable for MemberRefRaw {
    const TABLE_ID: TableId = TableId::MemberRef;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(MemberRefRaw {
            rid,
            class: CodedIndex::read(data, offset, sizes, CodedIndexType::MemberRefParent)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}

//! Raw `CustomAttribute` rows.

use crate::{
    file::io::read_le_at_dyn,
    metadata::tables::{CodedIndex, CodedIndexType, RowReadable, TableId, TableInfo},
    Result,
};

/// A row of the `CustomAttribute` table (ECMA-335 II.22.10).
#[derive(Clone, Debug)]
pub struct CustomAttributeRaw {
    /// Row identifier
    pub rid: u32,
    /// `HasCustomAttribute` coded index of the element carrying the attribute
    pub parent: CodedIndex,
    /// `CustomAttributeType` coded index of the attribute constructor
    pub constructor: CodedIndex,
    /// `#Blob` index of the encoded arguments, `0` if there are none
    pub value: u32,
}

impl RowReadable for CustomAttributeRaw {
    const TABLE_ID: TableId = TableId::CustomAttribute;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(CustomAttributeRaw {
            rid,
            parent: CodedIndex::read(data, offset, sizes, CodedIndexType::HasCustomAttribute)?,
            constructor: CodedIndex::read(
                data,
                offset,
                sizes,
                CodedIndexType::CustomAttributeType,
            )?,
            value: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}

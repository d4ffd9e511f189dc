//! Raw `TypeRef` rows.

use crate::{
    file::io::read_le_at_dyn,
    metadata::tables::{CodedIndex, CodedIndexType, RowReadable, TableId, TableInfo},
    Result,
};

/// A row of the `TypeRef` table (ECMA-335 II.22.38), a reference to a type defined elsewhere.
#[derive(Clone, Debug)]
pub struct TypeRefRaw {
    /// Row identifier
    pub rid: u32,
    /// `ResolutionScope` coded index - where the type lives
    pub resolution_scope: CodedIndex,
    /// `#Strings` index of the type name
    pub type_name: u32,
    /// `#Strings` index of the namespace
    pub type_namespace: u32,
}

impl RowReadable for TypeRefRaw {
    const TABLE_ID: TableId = TableId::TypeRef;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(TypeRefRaw {
            rid,
            resolution_scope: CodedIndex::read(data, offset, sizes, CodedIndexType::ResolutionScope)?,
            type_name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            type_namespace: read_le_at_dyn(data, offset, sizes.is_large_str())?,
        })
    }
}

//! Raw `TypeDef` rows.

use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::tables::{CodedIndex, CodedIndexType, RowReadable, TableId, TableInfo},
    Result,
};

/// A row of the `TypeDef` table (ECMA-335 II.22.37).
///
/// `field_list` and `method_list` mark the first field / method owned by this type; a type owns
/// everything up to the first entry of the next type.
#[derive(Clone, Debug)]
pub struct TypeDefRaw {
    /// Row identifier
    pub rid: u32,
    /// `TypeAttributes`
    pub flags: u32,
    /// `#Strings` index of the type name
    pub type_name: u32,
    /// `#Strings` index of the namespace
    pub type_namespace: u32,
    /// `TypeDefOrRef` coded index of the base type
    pub extends: CodedIndex,
    /// First row in the `Field` table owned by this type
    pub field_list: u32,
    /// First row in the `MethodDef` table owned by this type
    pub method_list: u32,
}

impl RowReadable for TypeDefRaw {
    const TABLE_ID: TableId = TableId::TypeDef;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self> {
        let flags = read_le_at::<u32>(data, offset)?;
        let type_name = read_le_at_dyn(data, offset, sizes.is_large_str())?;
        let type_namespace = read_le_at_dyn(data, offset, sizes.is_large_str())?;

        // <Module> and interfaces carry a null base type, which still decodes to a valid tag
        let extends = CodedIndex::read(data, offset, sizes, CodedIndexType::TypeDefOrRef)?;

        Ok(TypeDefRaw {
            rid,
            flags,
            type_name,
            type_namespace,
            extends,
            field_list: read_le_at_dyn(data, offset, sizes.is_large(TableId::Field))?,
            method_list: read_le_at_dyn(data, offset, sizes.is_large(TableId::MethodDef))?,
        })
    }
}

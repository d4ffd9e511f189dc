//! Coded indexes (ECMA-335 II.24.2.6).
//!
//! A coded index references a row in one of several tables. The low bits select the table,
//! the remaining bits hold the row; the width of the tag depends on the number of candidate
//! tables.

use strum::{EnumCount, EnumIter};

use crate::{
    file::io::read_le_at,
    metadata::tables::{TableId, TableInfo},
    Error::OutOfBounds,
    Result,
};

/// The coded index kinds of ECMA-335 II.24.2.6.
///
/// A coded index packs a table selector (the tag, in the low bits) and a row number into a
/// single 2 or 4 byte value.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, EnumIter, EnumCount)]
#[repr(usize)]
#[allow(missing_docs)]
pub enum CodedIndexType {
    TypeDefOrRef,
    HasConstant,
    HasCustomAttribute,
    HasFieldMarshal,
    HasDeclSecurity,
    MemberRefParent,
    HasSemantics,
    MethodDefOrRef,
    MemberForwarded,
    Implementation,
    CustomAttributeType,
    ResolutionScope,
    TypeOrMethodDef,
}

impl CodedIndexType {
    /// The tables this coded index can reference, in tag order.
    ///
    /// `CustomAttributeType` is the exception: only tags 2 (`MethodDef`) and 3 (`MemberRef`) are
    /// in use, the remaining slots are reserved. Use [`CodedIndexType::table_for_tag`] to
    /// decode tags.
    #[must_use]
    pub fn tables(&self) -> &'static [TableId] {
        match self {
            CodedIndexType::TypeDefOrRef => {
                &[TableId::TypeDef, TableId::TypeRef, TableId::TypeSpec]
            }
            CodedIndexType::HasConstant => &[TableId::Field, TableId::Param, TableId::Property],
            CodedIndexType::HasCustomAttribute => &[
                TableId::MethodDef,
                TableId::Field,
                TableId::TypeRef,
                TableId::TypeDef,
                TableId::Param,
                TableId::InterfaceImpl,
                TableId::MemberRef,
                TableId::Module,
                TableId::DeclSecurity,
                TableId::Property,
                TableId::Event,
                TableId::StandAloneSig,
                TableId::ModuleRef,
                TableId::TypeSpec,
                TableId::Assembly,
                TableId::AssemblyRef,
                TableId::File,
                TableId::ExportedType,
                TableId::ManifestResource,
                TableId::GenericParam,
                TableId::GenericParamConstraint,
                TableId::MethodSpec,
            ],
            CodedIndexType::HasFieldMarshal => &[TableId::Field, TableId::Param],
            CodedIndexType::HasDeclSecurity => {
                &[TableId::TypeDef, TableId::MethodDef, TableId::Assembly]
            }
            CodedIndexType::MemberRefParent => &[
                TableId::TypeDef,
                TableId::TypeRef,
                TableId::ModuleRef,
                TableId::MethodDef,
                TableId::TypeSpec,
            ],
            CodedIndexType::HasSemantics => &[TableId::Event, TableId::Property],
            CodedIndexType::MethodDefOrRef => &[TableId::MethodDef, TableId::MemberRef],
            CodedIndexType::MemberForwarded => &[TableId::Field, TableId::MethodDef],
            CodedIndexType::Implementation => {
                &[TableId::File, TableId::AssemblyRef, TableId::ExportedType]
            }
            CodedIndexType::CustomAttributeType => &[TableId::MethodDef, TableId::MemberRef],
            CodedIndexType::ResolutionScope => &[
                TableId::Module,
                TableId::ModuleRef,
                TableId::AssemblyRef,
                TableId::TypeRef,
            ],
            CodedIndexType::TypeOrMethodDef => &[TableId::TypeDef, TableId::MethodDef],
        }
    }

    /// Number of low bits used for the tag
    #[must_use]
    pub fn tag_bits(&self) -> u8 {
        let slots = match self {
            CodedIndexType::CustomAttributeType => 5,
            _ => self.tables().len() as u32,
        };

        // ceil(log2(slots)), slots is always >= 2
        (u32::BITS - (slots - 1).leading_zeros()) as u8
    }

    /// Resolve a tag value to the table it selects
    #[must_use]
    pub fn table_for_tag(&self, tag: u32) -> Option<TableId> {
        match self {
            CodedIndexType::CustomAttributeType => match tag {
                2 => Some(TableId::MethodDef),
                3 => Some(TableId::MemberRef),
                _ => None,
            },
            _ => self.tables().get(tag as usize).copied(),
        }
    }
}

/// A decoded coded index: the referenced table and the 1-based row within it.
///
/// A row of `0` is a null reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodedIndex {
    /// The table this index references
    pub tag: TableId,
    /// The row within `tag`
    pub row: u32,
}

impl CodedIndex {
    /// Create a new coded index
    #[must_use]
    pub fn new(tag: TableId, row: u32) -> CodedIndex {
        CodedIndex { tag, row }
    }

    /// Read and decode a coded index of `ci_type` at `offset`
    ///
    /// # Errors
    /// Returns an error if the data is truncated, or the tag does not select a valid table
    pub fn read(
        data: &[u8],
        offset: &mut usize,
        info: &TableInfo,
        ci_type: CodedIndexType,
    ) -> Result<Self> {
        let coded_index = if info.coded_index_bytes(ci_type) == 4 {
            read_le_at::<u32>(data, offset)?
        } else {
            u32::from(read_le_at::<u16>(data, offset)?)
        };

        Self::decode(coded_index, ci_type)
    }

    /// Decode a raw coded index value
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the tag does not select a valid table
    pub fn decode(value: u32, ci_type: CodedIndexType) -> Result<Self> {
        let tag_bits = ci_type.tag_bits();
        let tag = value & ((1 << tag_bits) - 1);

        match ci_type.table_for_tag(tag) {
            Some(table) => Ok(CodedIndex::new(table, value >> tag_bits)),
            None => Err(OutOfBounds),
        }
    }

    /// Returns true if this index references `table` row `row`
    #[must_use]
    pub fn is(&self, table: TableId, row: u32) -> bool {
        self.tag == table && self.row == row
    }
}

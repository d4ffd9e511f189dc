//! Row counts and the resulting index, coded index and row widths of a `#~` stream.

use strum::{EnumCount, IntoEnumIterator};

use crate::{
    file::io::{read_le, read_le_at},
    metadata::tables::{CodedIndexType, Column, TableId},
    Error::OutOfBounds,
    Result,
};

/// Heap size flag: `#Strings` indexes are 4 bytes wide
pub const HEAP_LARGE_STRINGS: u8 = 0x01;
/// Heap size flag: `#GUID` indexes are 4 bytes wide
pub const HEAP_LARGE_GUID: u8 = 0x02;
/// Heap size flag: `#Blob` indexes are 4 bytes wide
pub const HEAP_LARGE_BLOB: u8 = 0x04;
/// Heap size flag: an additional dword follows the row counts
pub const HEAP_EXTRA_DATA: u8 = 0x40;

/// Row count and index width information for every table, plus the heap index widths.
///
/// This is all that is required to compute the size of any column, and with that the size of
/// every row and the position of every table inside the `#~` stream.
#[derive(Clone, Default, Debug)]
pub struct TableInfo {
    rows: Vec<u32>,
    coded_indexes: Vec<u8>,
    is_large_index_str: bool,
    is_large_index_guid: bool,
    is_large_index_blob: bool,
}

impl TableInfo {
    /// Read the row counts from a `#~` stream
    ///
    /// Row counts of tables beyond the ones defined in [`TableId`] (portable PDB tables) are
    /// consumed but not retained.
    ///
    /// # Arguments
    /// * `data`         - The `#~` stream, starting at its header
    /// * `valid_bitvec` - The bit vector of present tables
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the stream is too short
    pub fn new(data: &[u8], valid_bitvec: u64) -> Result<Self> {
        if data.len() < 24 {
            return Err(OutOfBounds);
        }

        let mut rows = vec![0_u32; TableId::COUNT];
        let mut next_row_offset = 24;

        for bit in 0..64_usize {
            if valid_bitvec & (1 << bit) == 0 {
                continue;
            }

            let row_count = read_le_at::<u32>(data, &mut next_row_offset)?;
            if let Some(slot) = rows.get_mut(bit) {
                *slot = row_count;
            }
        }

        let heap_size_flags = read_le::<u8>(&data[6..])?;
        let mut table_info = TableInfo {
            rows,
            coded_indexes: vec![2; CodedIndexType::COUNT],
            is_large_index_str: heap_size_flags & HEAP_LARGE_STRINGS != 0,
            is_large_index_guid: heap_size_flags & HEAP_LARGE_GUID != 0,
            is_large_index_blob: heap_size_flags & HEAP_LARGE_BLOB != 0,
        };

        table_info.calculate_coded_index_bytes();
        Ok(table_info)
    }

    /// Build table information from explicit row counts
    #[must_use]
    pub fn from_rows(
        valid_tables: &[(TableId, u32)],
        large_str: bool,
        large_blob: bool,
        large_guid: bool,
    ) -> Self {
        let mut table_info = TableInfo {
            rows: vec![0; TableId::COUNT],
            coded_indexes: vec![2; CodedIndexType::COUNT],
            is_large_index_str: large_str,
            is_large_index_guid: large_guid,
            is_large_index_blob: large_blob,
        };

        for (table, rows) in valid_tables {
            table_info.rows[*table as usize] = *rows;
        }

        table_info.calculate_coded_index_bytes();
        table_info
    }

    /// Number of rows in `table`
    #[must_use]
    pub fn rows(&self, table: TableId) -> u32 {
        self.rows[table as usize]
    }

    /// Returns true if `#Strings` indexes are 4 bytes wide
    #[must_use]
    pub fn is_large_str(&self) -> bool {
        self.is_large_index_str
    }

    /// Returns true if `#GUID` indexes are 4 bytes wide
    #[must_use]
    pub fn is_large_guid(&self) -> bool {
        self.is_large_index_guid
    }

    /// Returns true if `#Blob` indexes are 4 bytes wide
    #[must_use]
    pub fn is_large_blob(&self) -> bool {
        self.is_large_index_blob
    }

    /// Returns true if simple indexes into `table` are 4 bytes wide
    #[must_use]
    pub fn is_large(&self, table: TableId) -> bool {
        self.rows(table) > u32::from(u16::MAX)
    }

    /// Width in bytes of a coded index of `coded_index_type`
    #[must_use]
    pub fn coded_index_bytes(&self, coded_index_type: CodedIndexType) -> u8 {
        self.coded_indexes[coded_index_type as usize]
    }

    /// Width in bytes of a single column
    #[must_use]
    pub fn column_size(&self, column: Column) -> u8 {
        let wide = |is_large: bool| if is_large { 4 } else { 2 };

        match column {
            Column::Fixed(size) => size,
            Column::String => wide(self.is_large_index_str),
            Column::Guid => wide(self.is_large_index_guid),
            Column::Blob => wide(self.is_large_index_blob),
            Column::Table(table) => wide(self.is_large(table)),
            Column::Coded(coded_index_type) => self.coded_index_bytes(coded_index_type),
        }
    }

    /// Size in bytes of a single row of `table`
    #[must_use]
    pub fn row_size(&self, table: TableId) -> u32 {
        table
            .columns()
            .iter()
            .map(|column| u32::from(self.column_size(*column)))
            .sum()
    }

    fn calculate_coded_index_bytes(&mut self) {
        for coded_index in CodedIndexType::iter() {
            let max_rows = coded_index
                .tables()
                .iter()
                .map(|table| self.rows(*table))
                .max()
                .unwrap_or(0);

            // A 2 byte coded index can address 2^(16 - tag_bits) rows
            let limit = 1_u32 << (16 - coded_index.tag_bits());
            self.coded_indexes[coded_index as usize] = if max_rows < limit { 2 } else { 4 };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small() {
        let info = TableInfo::from_rows(&[(TableId::Assembly, 1)], false, false, false);

        assert_eq!(info.rows(TableId::Assembly), 1);
        assert_eq!(info.rows(TableId::TypeDef), 0);
        assert_eq!(info.row_size(TableId::Assembly), 22);
        assert_eq!(info.row_size(TableId::CustomAttribute), 6);
        assert_eq!(info.row_size(TableId::TypeDef), 14);
        assert_eq!(info.row_size(TableId::MethodDef), 14);
    }

    #[test]
    fn large_heaps() {
        let info = TableInfo::from_rows(&[(TableId::Assembly, 1)], true, true, true);

        assert_eq!(info.row_size(TableId::Assembly), 28);
        assert_eq!(info.row_size(TableId::Module), 2 + 4 * 4);
    }

    #[test]
    fn coded_index_threshold() {
        // HasCustomAttribute uses 5 tag bits: 2^11 rows still fit into 2 bytes
        let info = TableInfo::from_rows(&[(TableId::MethodDef, 2047)], false, false, false);
        assert_eq!(info.coded_index_bytes(CodedIndexType::HasCustomAttribute), 2);
        assert_eq!(info.coded_index_bytes(CodedIndexType::MethodDefOrRef), 2);

        let info = TableInfo::from_rows(&[(TableId::MethodDef, 2048)], false, false, false);
        assert_eq!(info.coded_index_bytes(CodedIndexType::HasCustomAttribute), 4);
        assert_eq!(info.coded_index_bytes(CodedIndexType::MethodDefOrRef), 2);
        assert_eq!(info.row_size(TableId::CustomAttribute), 4 + 2 + 2);
    }

    #[test]
    fn large_table_index() {
        let info = TableInfo::from_rows(&[(TableId::Param, 0x1_0000)], false, false, false);

        assert!(info.is_large(TableId::Param));
        assert_eq!(info.row_size(TableId::MethodDef), 4 + 2 + 2 + 2 + 2 + 4);
    }

    #[test]
    fn from_stream() {
        #[rustfmt::skip]
        let data = [
            0x00, 0x00, 0x00, 0x00, // reserved
            0x02, 0x00,             // version
            0x05,                   // heap sizes
            0x01,                   // reserved
            0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, // valid: Module, Assembly
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // sorted
            0x01, 0x00, 0x00, 0x00, // Module rows
            0x01, 0x00, 0x00, 0x00, // Assembly rows
        ];

        let info = TableInfo::new(&data, 0x0000_0001_0000_0001).unwrap();
        assert_eq!(info.rows(TableId::Module), 1);
        assert_eq!(info.rows(TableId::Assembly), 1);
        assert!(info.is_large_str());
        assert!(!info.is_large_guid());
        assert!(info.is_large_blob());

        assert!(TableInfo::new(&data[..26], 0x0000_0001_0000_0001).is_err());
    }
}

//! The `#~` stream header.

use strum::IntoEnumIterator;

use crate::{
    file::io::read_le,
    metadata::tables::{MetadataTable, RowReadable, TableId, TableInfo, HEAP_EXTRA_DATA},
    Error::OutOfBounds,
    Result,
};

/// The header of the `#~` stream (ECMA-335 II.24.2.6), and the tables following it.
///
/// Row counts are read once on construction, from which the position of every present table is
/// derived. Rows themselves are decoded lazily through [`TablesHeader::table`].
///
/// ```rust,ignore
/// use dotversion::metadata::{streams::TablesHeader, tables::AssemblyRaw};
///
/// let tables = TablesHeader::from(tables_stream)?;
/// if let Some(assembly) = tables.table::<AssemblyRaw>().and_then(|table| table.get(1)) {
///     println!("{}.{}", assembly.major_version, assembly.minor_version);
/// }
/// ```
pub struct TablesHeader<'a> {
    /// Major version of the table schema, shall be 2
    pub major_version: u8,
    /// Minor version of the table schema, shall be 0
    pub minor_version: u8,
    /// Bit vector of present tables
    pub valid: u64,
    /// Bit vector of sorted tables
    pub sorted: u64,
    info: TableInfo,
    data: &'a [u8],
    offsets: Vec<Option<usize>>,
}

impl<'a> TablesHeader<'a> {
    /// Create a `TablesHeader` from the content of a `#~` or `#-` stream
    ///
    /// # Arguments
    /// * 'data' - The stream data
    ///
    /// # Errors
    /// Returns an error if the data is too short, no tables are present, or a present table
    /// extends beyond the end of the stream
    pub fn from(data: &'a [u8]) -> Result<TablesHeader<'a>> {
        if data.len() < 24 {
            return Err(OutOfBounds);
        }

        let valid_bitvec = read_le::<u64>(&data[8..])?;
        if valid_bitvec == 0 {
            return Err(malformed_error!("No valid rows in any of the tables"));
        }

        let info = TableInfo::new(data, valid_bitvec)?;
        let heap_sizes = read_le::<u8>(&data[6..])?;

        let mut current_offset = 24 + valid_bitvec.count_ones() as usize * 4;
        if heap_sizes & HEAP_EXTRA_DATA != 0 {
            current_offset += 4;
        }

        let mut offsets = vec![None; TableId::GenericParamConstraint as usize + 1];
        for table_id in TableId::iter() {
            let row_count = info.rows(table_id);
            if row_count == 0 {
                continue;
            }

            let table_size = row_count as usize * info.row_size(table_id) as usize;
            if current_offset + table_size > data.len() {
                return Err(OutOfBounds);
            }

            offsets[table_id as usize] = Some(current_offset);
            current_offset += table_size;
        }

        Ok(TablesHeader {
            major_version: read_le::<u8>(&data[4..])?,
            minor_version: read_le::<u8>(&data[5..])?,
            valid: valid_bitvec,
            sorted: read_le::<u64>(&data[16..])?,
            info,
            data,
            offsets,
        })
    }

    /// Get the table count
    #[must_use]
    pub fn table_count(&self) -> u32 {
        self.valid.count_ones()
    }

    /// Row count and index width information of these tables
    #[must_use]
    pub fn info(&self) -> &TableInfo {
        &self.info
    }

    /// Returns true if `table_id` holds at least one row
    #[must_use]
    pub fn has_table(&self, table_id: TableId) -> bool {
        self.info.rows(table_id) > 0
    }

    /// Get a typed view of the table holding rows of type `T`
    ///
    /// Returns `None` if the table is absent or empty
    #[must_use]
    pub fn table<T: RowReadable>(&self) -> Option<MetadataTable<'_, T>> {
        let offset = self.offsets.get(T::TABLE_ID as usize).copied().flatten()?;

        MetadataTable::new(
            &self.data[offset..],
            self.info.rows(T::TABLE_ID),
            &self.info,
        )
        .ok()
    }
}

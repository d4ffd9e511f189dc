//! Typed, lazily decoded access to the rows of a single table.

use std::marker::PhantomData;

use crate::{
    metadata::tables::{TableId, TableInfo},
    Error::OutOfBounds,
    Result,
};

/// A row type which can be decoded from the raw bytes of its table.
pub trait RowReadable: Sized {
    /// The table this row type belongs to
    const TABLE_ID: TableId;

    /// Decode a single row starting at `offset`, and advance `offset` past it
    ///
    /// ## Arguments
    /// * `data`    - The raw table data
    /// * `offset`  - Position of the row within `data`
    /// * `rid`     - The 1-based row identifier
    /// * `sizes`   - Index width information
    ///
    /// # Errors
    /// Returns an error if the row is truncated or contains an invalid coded index
    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfo) -> Result<Self>;
}

/// A typed view over the rows of one metadata table.
pub struct MetadataTable<'a, T> {
    data: &'a [u8],
    row_count: u32,
    row_size: u32,
    sizes: &'a TableInfo,
    _row: PhantomData<T>,
}

impl<'a, T: RowReadable> MetadataTable<'a, T> {
    /// Create a view over `row_count` rows in `data`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `data` can not hold all rows
    pub fn new(data: &'a [u8], row_count: u32, sizes: &'a TableInfo) -> Result<Self> {
        let row_size = sizes.row_size(T::TABLE_ID);
        let Some(table_size) = (row_count as usize).checked_mul(row_size as usize) else {
            return Err(OutOfBounds);
        };

        if table_size > data.len() {
            return Err(OutOfBounds);
        }

        Ok(MetadataTable {
            data: &data[..table_size],
            row_count,
            row_size,
            sizes,
            _row: PhantomData,
        })
    }

    /// Number of rows in this table
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Size of one row in bytes
    #[must_use]
    pub fn row_size(&self) -> u32 {
        self.row_size
    }

    /// Get the row with the 1-based identifier `rid`
    #[must_use]
    pub fn get(&self, rid: u32) -> Option<T> {
        if rid == 0 || rid > self.row_count {
            return None;
        }

        let mut offset = (rid - 1) as usize * self.row_size as usize;
        T::row_read(self.data, &mut offset, rid, self.sizes).ok()
    }

    /// Iterate over all rows, in row order
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (1..=self.row_count).filter_map(move |rid| self.get(rid))
    }
}

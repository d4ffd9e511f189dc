//! ECMA-335 metadata tables.
//!
//! The `#~` stream stores all metadata tables back to back, with row and column widths that
//! depend on the size of the heaps and of the other tables. This module provides:
//!
//! - [`TableId`] and the per-table column schema ([`Column`])
//! - [`CodedIndexType`] / [`CodedIndex`] for compact multi-table references
//! - [`TableInfo`] to resolve column, row and coded index widths
//! - [`MetadataTable`] to access typed rows implementing [`RowReadable`]
//!
//! # References
//!
//! - ECMA-335 6th Edition, Partition II, Section 22 - Metadata Logical Format: Tables
//! - ECMA-335 6th Edition, Partition II, Section 24.2.6 - #~ stream

mod codedindex;
mod rows;
mod tableid;
mod tableinfo;
mod types;

pub use codedindex::{CodedIndex, CodedIndexType};
pub use rows::*;
pub use tableid::{Column, TableId};
pub use tableinfo::{
    TableInfo, HEAP_EXTRA_DATA, HEAP_LARGE_BLOB, HEAP_LARGE_GUID, HEAP_LARGE_STRINGS,
};
pub use types::{MetadataTable, RowReadable};

//! Low-level little-endian readers for PE and metadata structures.
//!
//! Every multi-byte value in a .NET image (PE headers, the CLI header, metadata tables and
//! custom attribute blobs) is stored little-endian. The helpers in this module perform
//! bounds-checked reads of primitive values at a given offset and advance that offset,
//! returning [`crate::Error::OutOfBounds`] instead of panicking on truncated input.
//!
//! # Examples
//!
//! ```rust,ignore
//! use dotversion::file::io::{read_le, read_le_at};
//!
//! let data = [0x01, 0x00, 0x02, 0x00, 0x00, 0x00];
//! let first: u16 = read_le(&data)?;
//!
//! let mut offset = 2;
//! let second: u32 = read_le_at(&data, &mut offset)?;
//! assert_eq!((first, second, offset), (1, 2, 6));
//! # Ok::<(), dotversion::Error>(())
//! ```

use crate::{Error::OutOfBounds, Result};

/// Primitive types which can be decoded from their little-endian byte representation.
pub trait CilIO: Sized {
    /// The fixed size byte array backing this type
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Decodes a value from its little-endian representation
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_cil_io {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CilIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_cil_io!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Reads a value of type `T` from the start of `data`.
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `T`.
pub fn read_le<T: CilIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Reads a value of type `T` at `offset`, and advances `offset` by the size of `T`.
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if the read would exceed `data`.
pub fn read_le_at<T: CilIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };

    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(OutOfBounds);
    };

    *offset = end;
    Ok(T::from_le_bytes(read))
}

/// Reads either a 2 or a 4 byte index, depending on `is_large`, and widens it to `u32`.
///
/// Metadata tables use this encoding for heap and table indexes whose width depends on the
/// size of the heap or table being referenced.
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if the read would exceed `data`.
pub fn read_le_at_dyn(data: &[u8], offset: &mut usize, is_large: bool) -> Result<u32> {
    let res = if is_large {
        read_le_at::<u32>(data, offset)?
    } else {
        u32::from(read_le_at::<u16>(data, offset)?)
    };

    Ok(res)
}

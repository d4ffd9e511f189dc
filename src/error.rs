//! Error type and the `malformed_error!` helper.

use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Missing metadata is never an error: the reader reports it as `None` (or an empty string
/// through [`crate::VersionInfo::get_version`]). Errors are reserved for images that can not be
/// parsed and for attribute values that can not be rendered.
///
/// # Examples
///
/// ```rust,no_run
/// use dotversion::{CilModule, Error};
/// use std::path::Path;
///
/// match CilModule::from_file(Path::new("assembly.dll")) {
///     Ok(_) => println!("Successfully loaded assembly"),
///     Err(Error::NotSupported) => eprintln!("File format is not supported"),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed file: {} ({}:{})", message, file, line);
///     }
///     Err(Error::FileError(io_err)) => eprintln!("I/O error: {}", io_err),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The file is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the file.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// This file type, or a construct inside of it, is not supported.
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Generic error for miscellaneous failures.
    #[error("{0}")]
    Error(String),

    /// Recursion limit reached while decoding a signature or attribute value.
    ///
    /// The associated value is the limit that was exceeded.
    #[error("Reached the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// Error from the goblin crate during PE parsing.
    #[error("{0}")]
    GoblinErr(#[from] goblin::error::Error),

    /// A matching metadata attribute was found, but its first constructor argument is null.
    ///
    /// The associated value is the full type name of the attribute.
    #[error("The first constructor argument of '{0}' is null")]
    NullAttributeValue(String),
}

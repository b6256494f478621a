//! Error types for catalog loading and patch application

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for patching operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for catalog and patching operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Catalog definitions file could not be opened or read
    #[error("Cannot read patch catalog {}: {source}", path.display())]
    CatalogRead {
        /// Path of the catalog file
        path: PathBuf,
        /// The underlying I/O failure
        source: io::Error,
    },

    /// An offset patch would write past the end of the target file
    #[error("Offset patch out of bounds: offset {offset:#x} + {len} bytes exceeds file size {size}")]
    OffsetOutOfBounds {
        /// Absolute byte position the write would start at
        offset: u64,
        /// Number of bytes the patch would write
        len: usize,
        /// Size of the target file in bytes
        size: u64,
    },

    /// A pattern patch's byte sequence was not found in the target file
    #[error("Pattern not found in target file")]
    PatternNotFound,
}

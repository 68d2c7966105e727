//! Error types shared by the compression and decompression paths.

use std::io;
use thiserror::Error;

/// Everything that can go wrong while packing or unpacking an archive.
#[derive(Debug, Error)]
pub enum Error {
    /// The input path does not exist.
    #[error("Input missing")]
    InputMissing,

    /// The input path exists but could not be opened for reading.
    #[error("Cannot open input")]
    CannotOpenInput(#[source] io::Error),

    /// The output path could not be created.
    #[error("Cannot open output")]
    CannotOpenOutput(#[source] io::Error),

    /// The output path already exists and overwriting was not forced.
    #[error("Output already exists")]
    OutputExists,

    /// The archive magic does not match the selected profile.
    #[error("Invalid file format")]
    InvalidFormat,

    /// The archive was written by an incompatible version.
    #[error("Unsupported version")]
    UnsupportedVersion,

    /// The archive ended in the middle of a header or payload.
    #[error("Unexpected EOF")]
    UnexpectedEof,

    /// Any other I/O failure while reading or writing.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// A specialized Result type for compression operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Fold the io-level EOF kind into the format-level error so callers
    /// see one consistent message for truncated archives.
    pub fn from_read(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEof
        } else {
            Error::Io(err)
        }
    }
}

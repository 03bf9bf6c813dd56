//! Unified error types for cellchunk.
//!
//! This module provides a coarse error type that wraps the detailed errors
//! of the member crates and presents a consistent interface to users.

use thiserror::Error;

/// All cellchunk errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Offsets, ranges or cells handed in by the caller are invalid
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Chunk or frame capacity exceeded
    #[error("capacity exceeded: {0}")]
    Capacity(String),

    /// Chunk contents do not match the expected layout
    #[error("corruption: {0}")]
    Corruption(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cellchunk operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a capacity error.
    ///
    /// Capacity errors are resolved by writing to a fresh chunk.
    pub fn is_capacity(&self) -> bool {
        matches!(self, Error::Capacity(_))
    }

    /// Check if this is a corruption error.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::Corruption(_))
    }
}

// Convert from member crate errors
impl From<cellchunk_core::Error> for Error {
    fn from(e: cellchunk_core::Error) -> Self {
        use cellchunk_core::Error as CoreError;
        match e {
            CoreError::Io(io_err) => Error::Io(io_err),
            CoreError::InvalidConfig(msg) => Error::Config(msg),
            CoreError::InvalidHeader(msg) => Error::Corruption(format!("header: {}", msg)),
            e @ (CoreError::ChunkFull { .. } | CoreError::RecordTooLarge { .. }) => {
                Error::Capacity(e.to_string())
            }
            e @ CoreError::NegativeLength { .. } => Error::Corruption(e.to_string()),
            e @ (CoreError::InvalidOffset { .. }
            | CoreError::InvalidRange { .. }
            | CoreError::FrameOutOfBounds { .. }
            | CoreError::MisalignedEnd { .. }
            | CoreError::InvalidCell(_)) => Error::InvalidArgument(e.to_string()),
        }
    }
}

//! Error types shared by the cell chunk crates
//!
//! The raw codec performs no validation. Every variant here is produced by a
//! checked wrapper, the chunk collaborators, or cell parsing, so that a bad
//! offset or a damaged header is reported before any byte is touched.

use thiserror::Error;

/// Errors raised by cell chunk operations
#[derive(Debug, Error)]
pub enum Error {
    /// Record offset falls inside the chunk header
    #[error("offset {offset} lies inside the chunk header (first record offset is {min})")]
    InvalidOffset {
        /// Offending offset
        offset: usize,
        /// Smallest offset a record may start at
        min: usize,
    },

    /// Decode range is inverted or exceeds the buffer
    #[error("invalid range [{start}, {end}) for buffer of {len} bytes")]
    InvalidRange {
        /// Range start
        start: usize,
        /// Range end
        end: usize,
        /// Buffer length
        len: usize,
    },

    /// Record frame would extend past the end of the buffer
    #[error("frame at {offset} needs {needed} bytes, buffer has {available}")]
    FrameOutOfBounds {
        /// Frame start offset
        offset: usize,
        /// Bytes the frame needs
        needed: usize,
        /// Bytes available from the frame start
        available: usize,
    },

    /// End offset does not fall on a frame boundary
    #[error("end offset {end} splits the frame at {offset} (frame ends at {frame_end})")]
    MisalignedEnd {
        /// Start of the frame that crosses the end offset
        offset: usize,
        /// Where that frame ends
        frame_end: usize,
        /// Requested end offset
        end: usize,
    },

    /// Length prefix is negative
    #[error("negative record length {length} at offset {offset}")]
    NegativeLength {
        /// Frame start offset
        offset: usize,
        /// Raw length read from the frame
        length: i32,
    },

    /// Record body does not fit a 4-byte length prefix
    #[error("record body of {size} bytes exceeds the {max} byte limit")]
    RecordTooLarge {
        /// Body size
        size: usize,
        /// Maximum body size
        max: usize,
    },

    /// Chunk has no room left for the requested bytes
    #[error("chunk full: requested {requested} bytes, {remaining} remaining")]
    ChunkFull {
        /// Bytes requested
        requested: usize,
        /// Bytes still free
        remaining: usize,
    },

    /// Cell body is malformed
    #[error("invalid cell: {0}")]
    InvalidCell(String),

    /// Chunk header is inconsistent
    #[error("invalid chunk header: {0}")]
    InvalidHeader(String),

    /// Configuration is invalid
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cell chunk operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a caller-contract violation
    ///
    /// These errors mean the caller handed in offsets or ranges that the raw
    /// codec would have mishandled.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Error::InvalidOffset { .. }
                | Error::InvalidRange { .. }
                | Error::FrameOutOfBounds { .. }
                | Error::MisalignedEnd { .. }
                | Error::NegativeLength { .. }
        )
    }

    /// Check if this error reports exhausted capacity
    pub fn is_capacity(&self) -> bool {
        matches!(self, Error::ChunkFull { .. } | Error::RecordTooLarge { .. })
    }
}

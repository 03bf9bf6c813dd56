//! Core types for cell chunks
//!
//! This module defines the identifiers shared by every layer:
//! - [`SequenceId`]: Write-order identifier attached to every cell
//! - [`ChunkId`]: Allocator-assigned identifier stored in a chunk header

use serde::{Deserialize, Serialize};

/// Write-order identifier of a cell
///
/// Assigned when a cell is written and stored after the cell body in its
/// chunk frame. Higher-level replay uses it to order cells across chunks;
/// within one chunk the frame position already gives write order.
///
/// # Examples
///
/// ```
/// use cellchunk_core::types::SequenceId;
///
/// let seq = SequenceId::new(42);
/// assert_eq!(seq.as_u64(), 42);
/// assert!(seq < seq.next());
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SequenceId(u64);

impl SequenceId {
    /// Sequence id of a cell that was never assigned one
    pub const ZERO: SequenceId = SequenceId(0);

    /// Wrap a raw sequence number
    pub const fn new(value: u64) -> Self {
        SequenceId(value)
    }

    /// Raw sequence number
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// The sequence id that follows this one
    pub const fn next(self) -> Self {
        SequenceId(self.0 + 1)
    }
}

impl From<u64> for SequenceId {
    fn from(value: u64) -> Self {
        SequenceId(value)
    }
}

impl std::fmt::Display for SequenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a chunk
///
/// Owned by the chunk allocator and stored in the first four bytes of the
/// chunk header. The codec never reads or writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkId(u32);

impl ChunkId {
    /// Wrap a raw chunk id
    pub const fn new(value: u32) -> Self {
        ChunkId(value)
    }

    /// Raw chunk id
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for ChunkId {
    fn from(value: u32) -> Self {
        ChunkId(value)
    }
}

impl std::fmt::Display for ChunkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chunk-{}", self.0)
    }
}

//! Chunk storage for cells
//!
//! This crate provides the caller side of the chunk codec:
//! - OffsetAllocator: atomic bump allocation of frame offsets
//! - Chunk: fixed-size buffer with a published end offset, append and recovery
//! - ChunkOptions: chunk sizing and recovery configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod allocator;
pub mod chunk;
pub mod options;

pub use allocator::OffsetAllocator;
pub use chunk::{AppendResult, Chunk};
pub use options::{ChunkOptions, DEFAULT_DATA_SIZE, MAX_DATA_SIZE};

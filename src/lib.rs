//! # cellchunk
//!
//! Durable cell chunk codec for crash-recoverable in-memory logs.
//!
//! Cells are packed back to back into fixed-size chunk buffers. Every frame
//! carries its body length and its sequence id, and the chunk header records
//! where the last frame ends, so the cells of a chunk can be rebuilt in write
//! order after a restart or a chunk handover.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cellchunk::prelude::*;
//!
//! let chunk = Chunk::new(ChunkId::new(1), 64 * 1024)?;
//! let kv = KeyValue::builder("row-1")
//!     .family("cf")
//!     .qualifier("q")
//!     .value("hello")
//!     .sequence_id(SequenceId::new(1))
//!     .build()?;
//! chunk.append(&kv)?;
//!
//! // Hand the buffer over and rebuild
//! let chunk = Chunk::recover(chunk.into_buffer(), &ChunkOptions::default())?;
//! let cells: Vec<KeyValue> = chunk.read_cells();
//! ```
//!
//! ## Layers
//!
//! - [`CellChunkCodec`] - stateless encode/decode against a raw buffer
//! - [`Chunk`] - buffer ownership, offset allocation, published end offset
//! - [`ChunkOptions`] - sizing and recovery configuration

#![warn(missing_docs)]

mod error;

pub mod prelude;

pub use error::{Error, Result};

// Re-export member crates
pub use cellchunk_core::{CellType, ChunkId, DurableCell, KeyValue, KeyValueBuilder, SequenceId};
pub use cellchunk_durability::{codec, layout, CellChunkCodec, Frame, FrameIter};
pub use cellchunk_storage::{AppendResult, Chunk, ChunkOptions, OffsetAllocator};

//! Convenient imports for cellchunk.
//!
//! This module re-exports the most commonly used types so you can get started
//! with a single import:
//!
//! ```ignore
//! use cellchunk::prelude::*;
//!
//! let chunk = Chunk::new(ChunkId::new(1), 64 * 1024)?;
//! chunk.append(&KeyValue::builder("row").family("cf").value("v").build()?)?;
//! let cells: Vec<KeyValue> = chunk.read_cells();
//! ```

// Error handling
pub use crate::error::{Error, Result};

// Cells
pub use crate::{CellType, DurableCell, KeyValue, SequenceId};

// Codec
pub use crate::{CellChunkCodec, Frame};

// Chunks
pub use crate::{Chunk, ChunkId, ChunkOptions, OffsetAllocator};

//! In-memory cell chunk
//!
//! A [`Chunk`] owns a fixed-size buffer laid out as described in
//! [`cellchunk_durability::layout`] and coordinates writers and readers
//! around the stateless codec.
//!
//! # Design
//!
//! - Offsets come from an [`OffsetAllocator`]
//! - Appends hold the buffer write lock across allocate + encode, so the
//!   header end offset only moves forward and never covers an unwritten frame
//! - The end offset is mirrored in an `AtomicU32` published with `Release`
//! - Readers sample that mirror once, then decode under the read lock
//!
//! The chunk id and in-use flag are written here, never by the codec.

use crate::allocator::OffsetAllocator;
use crate::options::{ChunkOptions, MAX_DATA_SIZE};
use cellchunk_core::{ChunkId, DurableCell, Error, Result, MAX_CELL_SIZE};
use cellchunk_durability::layout::{
    read_chunk_id, read_end_offset, read_in_use, write_chunk_id, write_end_offset, write_in_use,
};
use cellchunk_durability::{CellChunkCodec, CHUNK_HEADER_SIZE};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, trace, warn};

/// Where an appended cell landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendResult {
    /// Offset of the cell's frame
    pub offset: usize,
    /// Chunk end offset after the append
    pub end: usize,
}

/// A fixed-capacity buffer of framed cells
#[derive(Debug)]
pub struct Chunk {
    id: ChunkId,
    buffer: RwLock<Box<[u8]>>,
    allocator: OffsetAllocator,
    /// Mirror of the header end offset
    end_offset: AtomicU32,
    codec: CellChunkCodec,
}

impl Chunk {
    /// Create an empty chunk with a data region of `data_size` bytes
    ///
    /// The chunk starts in use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for an empty or oversized region.
    pub fn new(id: ChunkId, data_size: usize) -> Result<Self> {
        Self::with_options(id, &ChunkOptions::new().data_size(data_size))
    }

    /// Create an empty chunk sized by `options`
    pub fn with_options(id: ChunkId, options: &ChunkOptions) -> Result<Self> {
        options.validate()?;
        let mut buf = vec![0u8; CellChunkCodec::chunk_overhead(options.data_size)].into_boxed_slice();
        write_chunk_id(&mut buf, id);
        write_in_use(&mut buf, true);
        write_end_offset(&mut buf, CHUNK_HEADER_SIZE as u32);

        debug!(chunk = %id, data_size = options.data_size, "Created chunk");

        let limit = buf.len();
        Ok(Chunk {
            id,
            buffer: RwLock::new(buf),
            allocator: OffsetAllocator::new(CHUNK_HEADER_SIZE, limit),
            end_offset: AtomicU32::new(CHUNK_HEADER_SIZE as u32),
            codec: CellChunkCodec::new(),
        })
    }

    /// Rebuild a chunk from a buffer handed over by a previous owner
    ///
    /// Reads the id, in-use flag and end offset from the header. With
    /// `verify_on_recover` set, every frame up to the end offset is walked
    /// and a header pointing into the middle of a frame is rejected.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidHeader`] if the buffer is shorter than a header or
    ///   the end offset lies outside the data region
    /// - A framing error from [`CellChunkCodec::validate_range`]
    pub fn recover(buffer: impl Into<Box<[u8]>>, options: &ChunkOptions) -> Result<Self> {
        let buf = buffer.into();
        if buf.len() < CHUNK_HEADER_SIZE || buf.len() - CHUNK_HEADER_SIZE > MAX_DATA_SIZE {
            return Err(Error::InvalidHeader(format!(
                "buffer of {} bytes cannot hold a chunk",
                buf.len()
            )));
        }

        let id = read_chunk_id(&buf);
        let end = read_end_offset(&buf) as usize;
        if end < CHUNK_HEADER_SIZE || end > buf.len() {
            warn!(chunk = %id, end, len = buf.len(), "Chunk end offset outside data region");
            return Err(Error::InvalidHeader(format!(
                "end offset {} outside data region [{}, {}]",
                end,
                CHUNK_HEADER_SIZE,
                buf.len()
            )));
        }

        let codec = CellChunkCodec::new();
        if options.verify_on_recover {
            let frames = codec.validate_range(CHUNK_HEADER_SIZE, &buf, end).map_err(|e| {
                warn!(chunk = %id, error = %e, "Chunk failed frame verification");
                e
            })?;
            debug!(chunk = %id, frames, end, in_use = read_in_use(&buf), "Recovered chunk");
        } else {
            debug!(chunk = %id, end, in_use = read_in_use(&buf), "Recovered chunk without verification");
        }

        let limit = buf.len();
        Ok(Chunk {
            id,
            buffer: RwLock::new(buf),
            allocator: OffsetAllocator::new(end, limit),
            end_offset: AtomicU32::new(end as u32),
            codec,
        })
    }

    /// Chunk identifier
    pub fn id(&self) -> ChunkId {
        self.id
    }

    /// Size of the data region
    pub fn data_size(&self) -> usize {
        self.allocator.limit() - CHUNK_HEADER_SIZE
    }

    /// Offset of the first frame
    pub fn first_record_offset(&self) -> usize {
        CHUNK_HEADER_SIZE
    }

    /// Published end offset
    ///
    /// Every frame below this offset is fully written.
    #[inline]
    pub fn end_offset(&self) -> usize {
        self.end_offset.load(Ordering::Acquire) as usize
    }

    /// Bytes of the data region holding frames
    pub fn used(&self) -> usize {
        self.end_offset() - CHUNK_HEADER_SIZE
    }

    /// Bytes of the data region not yet reserved
    pub fn remaining(&self) -> usize {
        self.allocator.remaining()
    }

    /// Check if no cell has been written
    pub fn is_empty(&self) -> bool {
        self.end_offset() == CHUNK_HEADER_SIZE
    }

    /// Check if the chunk could take a cell with a body of `size` bytes
    pub fn fits(&self, size: usize) -> bool {
        CellChunkCodec::record_overhead(size) <= self.remaining()
    }

    /// In-use flag from the header
    pub fn in_use(&self) -> bool {
        read_in_use(&self.buffer.read())
    }

    /// Set the in-use flag in the header
    pub fn set_in_use(&self, in_use: bool) {
        write_in_use(&mut self.buffer.write(), in_use);
    }

    /// Append `cell` after the last frame
    ///
    /// # Errors
    ///
    /// - [`Error::RecordTooLarge`] if the body does not fit an i32 length
    /// - [`Error::ChunkFull`] if the data region has no room for the frame
    pub fn append<C: DurableCell>(&self, cell: &C) -> Result<AppendResult> {
        let size = cell.serialized_size();
        if size > MAX_CELL_SIZE {
            return Err(Error::RecordTooLarge {
                size,
                max: MAX_CELL_SIZE,
            });
        }

        let mut buf = self.buffer.write();
        let offset = self
            .allocator
            .allocate(CellChunkCodec::record_overhead(size))?;
        let end = self.codec.encode(cell, offset, &mut buf);
        self.end_offset.store(end as u32, Ordering::Release);
        drop(buf);

        trace!(chunk = %self.id, offset, end, seq = %cell.sequence_id(), "Appended cell");
        Ok(AppendResult { offset, end })
    }

    /// Rebuild every cell written so far, in write order
    pub fn read_cells<C: DurableCell>(&self) -> Vec<C> {
        let end = self.end_offset();
        let buf = self.buffer.read();
        self.codec.decode(CHUNK_HEADER_SIZE, &buf, end)
    }

    /// Rebuild the cells stored in `[start, end)`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] if `end` is past the published end
    /// offset, or a framing error if the range does not follow frame
    /// boundaries.
    pub fn read_range<C: DurableCell>(&self, start: usize, end: usize) -> Result<Vec<C>> {
        let published = self.end_offset();
        if end > published {
            return Err(Error::InvalidRange {
                start,
                end,
                len: published,
            });
        }
        let buf = self.buffer.read();
        if start != end && start < CHUNK_HEADER_SIZE {
            return Err(Error::InvalidOffset {
                offset: start,
                min: CHUNK_HEADER_SIZE,
            });
        }
        self.codec.try_decode(start, &buf, end)
    }

    /// Copy of the whole buffer, header included
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.read().to_vec()
    }

    /// Give up the buffer for handover
    pub fn into_buffer(self) -> Box<[u8]> {
        self.buffer.into_inner()
    }
}

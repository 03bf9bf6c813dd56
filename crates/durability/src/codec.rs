//! Cell chunk codec
//!
//! Packs [`DurableCell`]s into a chunk buffer and rebuilds them after a
//! restart or chunk handover.
//!
//! ## Encode
//!
//! ```text
//! encode(cell, o, buf):
//!   buf[o..o+4)           = L = cell.serialized_size()
//!   buf[o+4..o+4+L)       = cell body
//!   buf[o+4+L..o+4+L+8)   = cell.sequence_id()
//!   header.end_offset     = o + 4 + L + 8
//! ```
//!
//! ## Decode
//!
//! Frames are packed with no gaps, so decode walks forward from the start
//! offset until it reaches the end offset. Output order is buffer order,
//! which is write order. The sequence id rides along as an attribute of
//! each cell and is never used for sorting.
//!
//! ## Checking
//!
//! [`CellChunkCodec::encode`] and [`CellChunkCodec::decode`] trust their
//! arguments. An offset outside the buffer panics; an end offset that splits
//! a frame yields garbage cells. Callers that cannot vouch for their offsets
//! use [`CellChunkCodec::try_encode`] and [`CellChunkCodec::try_decode`],
//! which validate everything up front and then run the same code.
//!
//! ## Concurrency
//!
//! The codec holds no state. Encode takes `&mut [u8]` and decode takes
//! `&[u8]`; a caller that shares a chunk between threads must hand out
//! non-overlapping offsets and sample the end offset once per decode.

use crate::layout::{
    write_end_offset, CHUNK_HEADER_SIZE, MIN_RECORD_OFFSET, RECORD_FRAMING_SIZE,
    RECORD_LENGTH_SIZE, RECORD_SEQUENCE_SIZE,
};
use byteorder::{BigEndian, ByteOrder};
use cellchunk_core::{DurableCell, Error, Result, SequenceId, MAX_CELL_SIZE};
use tracing::warn;

/// Encoder and decoder for cells stored in chunk buffers
#[derive(Debug, Clone, Copy, Default)]
pub struct CellChunkCodec;

impl CellChunkCodec {
    /// Create a codec
    pub const fn new() -> Self {
        CellChunkCodec
    }

    /// Write `cell` as a frame starting at `offset`
    ///
    /// Updates the chunk header end offset and returns the value written
    /// there.
    ///
    /// # Panics
    ///
    /// Panics if the frame does not fit inside `buf`. The caller guarantees
    /// the range `[offset, offset + record_overhead(size))` is free.
    pub fn encode<C: DurableCell>(&self, cell: &C, offset: usize, buf: &mut [u8]) -> usize {
        let size = cell.serialized_size();
        let body_start = offset + RECORD_LENGTH_SIZE;
        let seq_start = body_start + size;
        let end = seq_start + RECORD_SEQUENCE_SIZE;

        BigEndian::write_i32(&mut buf[offset..body_start], size as i32);
        cell.write_to(&mut buf[body_start..seq_start]);
        BigEndian::write_u64(&mut buf[seq_start..end], cell.sequence_id().as_u64());
        write_end_offset(buf, end as u32);
        end
    }

    /// Rebuild every cell stored in `[start, end)`
    ///
    /// `end` must be a frame boundary, normally a value previously written
    /// to the header end offset. Each returned cell owns its bytes.
    ///
    /// # Panics
    ///
    /// Panics if a frame reaches past the end of `buf`.
    pub fn decode<C: DurableCell>(&self, start: usize, buf: &[u8], end: usize) -> Vec<C> {
        self.frames(start, buf, end)
            .map(|frame| C::from_serialized(frame.body, frame.sequence_id))
            .collect()
    }

    /// Iterate the raw frames stored in `[start, end)` without copying
    pub fn frames<'a>(&self, start: usize, buf: &'a [u8], end: usize) -> FrameIter<'a> {
        FrameIter {
            buf,
            pos: start,
            end,
        }
    }

    /// Checked [`encode`](CellChunkCodec::encode)
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidOffset`] if `offset` lies inside the header fields
    /// - [`Error::RecordTooLarge`] if the body does not fit an i32 length
    /// - [`Error::FrameOutOfBounds`] if the frame would run past `buf`
    /// - [`Error::InvalidRange`] if the new end offset does not fit the header
    pub fn try_encode<C: DurableCell>(
        &self,
        cell: &C,
        offset: usize,
        buf: &mut [u8],
    ) -> Result<usize> {
        if offset < MIN_RECORD_OFFSET {
            return Err(rejected(
                "encode",
                Error::InvalidOffset {
                    offset,
                    min: MIN_RECORD_OFFSET,
                },
            ));
        }
        let size = cell.serialized_size();
        if size > MAX_CELL_SIZE {
            return Err(rejected(
                "encode",
                Error::RecordTooLarge {
                    size,
                    max: MAX_CELL_SIZE,
                },
            ));
        }
        let needed = Self::record_overhead(size);
        let end = offset
            .checked_add(needed)
            .filter(|&end| end <= buf.len())
            .ok_or_else(|| {
                rejected(
                    "encode",
                    Error::FrameOutOfBounds {
                        offset,
                        needed,
                        available: buf.len().saturating_sub(offset),
                    },
                )
            })?;
        if end > u32::MAX as usize {
            return Err(rejected(
                "encode",
                Error::InvalidRange {
                    start: offset,
                    end,
                    len: buf.len(),
                },
            ));
        }
        Ok(self.encode(cell, offset, buf))
    }

    /// Checked [`decode`](CellChunkCodec::decode)
    ///
    /// Walks the frame lengths first and only rebuilds cells once the whole
    /// range is known to be well framed.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRange`] if `start > end` or `end` exceeds `buf`
    /// - [`Error::InvalidOffset`] if a non-empty range starts inside the header
    /// - [`Error::NegativeLength`] if a length prefix is negative
    /// - [`Error::MisalignedEnd`] if `end` falls inside a frame
    pub fn try_decode<C: DurableCell>(
        &self,
        start: usize,
        buf: &[u8],
        end: usize,
    ) -> Result<Vec<C>> {
        self.validate_range(start, buf, end)
            .map_err(|e| rejected("decode", e))?;
        Ok(self.decode(start, buf, end))
    }

    /// Check that `[start, end)` is a well framed run of records in `buf`
    ///
    /// Returns the number of frames in the range.
    pub fn validate_range(&self, start: usize, buf: &[u8], end: usize) -> Result<usize> {
        if start > end || end > buf.len() {
            return Err(Error::InvalidRange {
                start,
                end,
                len: buf.len(),
            });
        }
        if start == end {
            return Ok(0);
        }
        if start < MIN_RECORD_OFFSET {
            return Err(Error::InvalidOffset {
                offset: start,
                min: MIN_RECORD_OFFSET,
            });
        }

        let mut pos = start;
        let mut count = 0;
        while pos < end {
            if pos + RECORD_LENGTH_SIZE > end {
                return Err(Error::MisalignedEnd {
                    offset: pos,
                    frame_end: pos + RECORD_LENGTH_SIZE,
                    end,
                });
            }
            let length = BigEndian::read_i32(&buf[pos..pos + RECORD_LENGTH_SIZE]);
            if length < 0 {
                return Err(Error::NegativeLength {
                    offset: pos,
                    length,
                });
            }
            let frame_end = pos + Self::record_overhead(length as usize);
            if frame_end > end {
                return Err(Error::MisalignedEnd {
                    offset: pos,
                    frame_end,
                    end,
                });
            }
            pos = frame_end;
            count += 1;
        }
        Ok(count)
    }

    /// Bytes a record with a body of `size` bytes occupies in a chunk
    pub const fn record_overhead(size: usize) -> usize {
        size + RECORD_FRAMING_SIZE
    }

    /// Bytes a chunk needs to hold a header plus `data_region_size` bytes
    pub const fn chunk_overhead(data_region_size: usize) -> usize {
        CHUNK_HEADER_SIZE + data_region_size
    }
}

fn rejected(op: &'static str, err: Error) -> Error {
    warn!(op, error = %err, "Rejected chunk codec call");
    err
}

/// A record frame borrowed from a chunk buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Offset of the length prefix
    pub offset: usize,
    /// Serialized cell body
    pub body: &'a [u8],
    /// Sequence id stored after the body
    pub sequence_id: SequenceId,
}

impl Frame<'_> {
    /// Offset of the first byte after this frame
    pub fn end(&self) -> usize {
        self.offset + CellChunkCodec::record_overhead(self.body.len())
    }
}

/// Iterator over the frames of a chunk range
///
/// Created by [`CellChunkCodec::frames`]. Stops once the cursor reaches the
/// end offset it was created with.
#[derive(Debug, Clone)]
pub struct FrameIter<'a> {
    buf: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Iterator for FrameIter<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Frame<'a>> {
        if self.pos >= self.end {
            return None;
        }
        let offset = self.pos;
        let size = BigEndian::read_i32(&self.buf[offset..offset + RECORD_LENGTH_SIZE]) as usize;
        let body_start = offset + RECORD_LENGTH_SIZE;
        let seq_start = body_start + size;
        let sequence_id = SequenceId::new(BigEndian::read_u64(
            &self.buf[seq_start..seq_start + RECORD_SEQUENCE_SIZE],
        ));
        self.pos = seq_start + RECORD_SEQUENCE_SIZE;
        Some(Frame {
            offset,
            body: &self.buf[body_start..seq_start],
            sequence_id,
        })
    }
}

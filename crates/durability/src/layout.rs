//! Chunk header and record frame layout
//!
//! All integers are big-endian.
//!
//! ```text
//! Chunk:
//!   [0..4)    chunk_id       allocator-owned
//!   [4..5)    in_use flag    allocator-owned
//!   [5..9)    end_offset     written by the codec on every encode
//!   [9..13)   reserved       allocator-owned
//!   [13..)    data region
//!
//! Record frame at offset o, body length L:
//!   [o .. o+4)            L             (i32)
//!   [o+4 .. o+4+L)        body
//!   [o+4+L .. o+4+L+8)    sequence_id   (i64)
//! ```
//!
//! The position of `end_offset` is part of the persistent format: every
//! reader that recovers a chunk looks for it at byte 5.

use byteorder::{BigEndian, ByteOrder};
use cellchunk_core::ChunkId;

/// Size of an int field
pub const INT_SIZE: usize = 4;
/// Size of a long field
pub const LONG_SIZE: usize = 8;
/// Size of a byte field
pub const BYTE_SIZE: usize = 1;

/// Position of the chunk id
pub const CHUNK_ID_OFFSET: usize = 0;
/// Position of the in-use flag
pub const IN_USE_OFFSET: usize = INT_SIZE;
/// Position of the end offset, right after the chunk id and in-use flag
pub const END_OFFSET_POS: usize = INT_SIZE + BYTE_SIZE;
/// Position of the allocator-reserved int
pub const RESERVED_OFFSET: usize = END_OFFSET_POS + INT_SIZE;
/// Bytes reserved for the chunk header: three ints and one flag byte
pub const CHUNK_HEADER_SIZE: usize = 3 * INT_SIZE + BYTE_SIZE;

/// Lowest offset at which a record frame may start
pub const MIN_RECORD_OFFSET: usize = END_OFFSET_POS + INT_SIZE;

/// Length prefix of a record frame
pub const RECORD_LENGTH_SIZE: usize = INT_SIZE;
/// Sequence id suffix of a record frame
pub const RECORD_SEQUENCE_SIZE: usize = LONG_SIZE;
/// Framing bytes around every record body
pub const RECORD_FRAMING_SIZE: usize = RECORD_LENGTH_SIZE + RECORD_SEQUENCE_SIZE;

/// Write the chunk id into the header
pub fn write_chunk_id(buf: &mut [u8], id: ChunkId) {
    BigEndian::write_u32(&mut buf[CHUNK_ID_OFFSET..], id.as_u32());
}

/// Read the chunk id from the header
pub fn read_chunk_id(buf: &[u8]) -> ChunkId {
    ChunkId::new(BigEndian::read_u32(&buf[CHUNK_ID_OFFSET..]))
}

/// Write the in-use flag into the header
pub fn write_in_use(buf: &mut [u8], in_use: bool) {
    buf[IN_USE_OFFSET] = in_use as u8;
}

/// Read the in-use flag from the header
pub fn read_in_use(buf: &[u8]) -> bool {
    buf[IN_USE_OFFSET] != 0
}

/// Write the end offset into the header
pub fn write_end_offset(buf: &mut [u8], end: u32) {
    BigEndian::write_u32(&mut buf[END_OFFSET_POS..], end);
}

/// Read the end offset from the header
pub fn read_end_offset(buf: &[u8]) -> u32 {
    BigEndian::read_u32(&buf[END_OFFSET_POS..])
}

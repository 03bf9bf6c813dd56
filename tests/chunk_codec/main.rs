//! Chunk Codec Integration Test Suite
//!
//! Exercises the codec through the public facade: raw encode/decode against
//! caller-owned buffers, chunk recovery after handover, and concurrent
//! appenders racing readers.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test chunk_codec
//! cargo test --test chunk_codec recovery::
//! ```

use cellchunk::layout;
use cellchunk::prelude::*;

// Test modules
pub mod codec_properties;
pub mod concurrency;
pub mod recovery;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Build a Put cell with a value derived from `seq`
pub fn put(row: &str, seq: u64) -> KeyValue {
    KeyValue::builder(row)
        .family("cf")
        .qualifier("col")
        .timestamp(1_000 + seq as i64)
        .value(format!("value-{:06}", seq))
        .sequence_id(SequenceId::new(seq))
        .build()
        .expect("valid cell")
}

/// Zeroed buffer sized for a chunk with `data_size` bytes of data
pub fn raw_chunk(data_size: usize) -> Vec<u8> {
    vec![0u8; CellChunkCodec::chunk_overhead(data_size)]
}

/// Encode `cells` back to back from the first record offset
///
/// Returns the final end offset.
pub fn encode_all(buf: &mut [u8], cells: &[KeyValue]) -> cellchunk::Result<usize> {
    let codec = CellChunkCodec::new();
    let mut end = layout::CHUNK_HEADER_SIZE;
    for cell in cells {
        end = codec.try_encode(cell, end, buf)?;
    }
    Ok(end)
}

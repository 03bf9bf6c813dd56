//! Durable cell chunk codec
//!
//! This crate implements the byte format of cell chunks:
//! - Layout: chunk header fields and record framing
//! - Encode: write one framed cell and advance the header end offset
//! - Decode: rebuild the cells of a range in write order, as owned copies
//! - Size calculators used to size chunks before anything is written

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod layout;

pub use codec::{CellChunkCodec, Frame, FrameIter};
pub use layout::{CHUNK_HEADER_SIZE, END_OFFSET_POS, MIN_RECORD_OFFSET, RECORD_FRAMING_SIZE};

//! Core types and traits for cell chunks
//!
//! This crate defines the vocabulary shared by the codec and its callers:
//! - [`SequenceId`] and [`ChunkId`]
//! - [`DurableCell`]: the record contract the codec consumes
//! - [`KeyValue`]: the stock row/family/qualifier cell
//! - [`Error`] and [`Result`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cell;
pub mod error;
pub mod key_value;
pub mod types;

pub use cell::{CellType, DurableCell};
pub use error::{Error, Result};
pub use key_value::{KeyValue, KeyValueBuilder, MAX_CELL_SIZE};
pub use types::{ChunkId, SequenceId};

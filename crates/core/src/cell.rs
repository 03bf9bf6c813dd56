//! The record contract consumed by the chunk codec
//!
//! A cell is opaque to the codec except for four capabilities: it knows its
//! serialized body length, it can write that body into a buffer, it carries a
//! [`SequenceId`], and it can be rebuilt from body bytes.

use crate::types::SequenceId;

/// A record that can be stored in a chunk
///
/// # Ownership
///
/// [`from_serialized`](DurableCell::from_serialized) receives a borrowed
/// slice whose lifetime is not tied to `Self`, so an implementation cannot
/// keep a view into the chunk buffer. Rebuilt cells always own their bytes
/// and survive the buffer being recycled.
///
/// # Sequence ids
///
/// The sequence id is a constructor argument rather than a setter, so a
/// decoded cell is never observable without its id.
pub trait DurableCell: Sized {
    /// Number of bytes [`write_to`](DurableCell::write_to) produces
    fn serialized_size(&self) -> usize;

    /// Write the serialized body into `buf`
    ///
    /// `buf` is exactly [`serialized_size`](DurableCell::serialized_size)
    /// bytes long.
    fn write_to(&self, buf: &mut [u8]);

    /// Write-order identifier of this cell
    fn sequence_id(&self) -> SequenceId;

    /// Rebuild an independent cell from its serialized body
    fn from_serialized(body: &[u8], sequence_id: SequenceId) -> Self;
}

/// Kind of mutation a cell represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CellType {
    /// Lowest possible type, used for seeking
    Minimum = 0,
    /// Value write
    Put = 4,
    /// Deletes one version of a column
    Delete = 8,
    /// Deletes one version across a family
    DeleteFamilyVersion = 10,
    /// Deletes all versions of a column
    DeleteColumn = 12,
    /// Deletes all columns of a family
    DeleteFamily = 14,
    /// Highest possible type, used for seeking
    Maximum = 255,
}

impl CellType {
    /// Stored type code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up a type by its stored code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CellType::Minimum),
            4 => Some(CellType::Put),
            8 => Some(CellType::Delete),
            10 => Some(CellType::DeleteFamilyVersion),
            12 => Some(CellType::DeleteColumn),
            14 => Some(CellType::DeleteFamily),
            255 => Some(CellType::Maximum),
            _ => None,
        }
    }

    /// Check if this type is any kind of delete marker
    pub fn is_delete(self) -> bool {
        matches!(
            self,
            CellType::Delete
                | CellType::DeleteFamilyVersion
                | CellType::DeleteColumn
                | CellType::DeleteFamily
        )
    }
}

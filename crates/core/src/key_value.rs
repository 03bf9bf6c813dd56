//! KeyValue cell
//!
//! The stock [`DurableCell`] implementation: a versioned column value
//! addressed by row, family and qualifier.
//!
//! ## Body Layout
//!
//! ```text
//! [0..4)    key length K      (i32 BE)
//! [4..8)    value length V    (i32 BE)
//! key:      row length R (i16 BE) | row | family length F (u8) | family |
//!           qualifier | timestamp (i64 BE) | type (u8)
//! value:    V bytes
//! tags:     tags length T (u16 BE) | tags      -- present only when T > 0
//! ```

use crate::cell::{CellType, DurableCell};
use crate::error::{Error, Result};
use crate::types::SequenceId;
use byteorder::{BigEndian, ByteOrder};

/// Key length + value length prefix
const LENGTHS_SIZE: usize = 8;
/// Row length field
const ROW_LENGTH_SIZE: usize = 2;
/// Family length field
const FAMILY_LENGTH_SIZE: usize = 1;
/// Timestamp + type trailer of the key
const KEY_TRAILER_SIZE: usize = 9;
/// Tags length field
const TAGS_LENGTH_SIZE: usize = 2;
/// Key bytes that are not row, family or qualifier
const KEY_FIXED_SIZE: usize = ROW_LENGTH_SIZE + FAMILY_LENGTH_SIZE + KEY_TRAILER_SIZE;

/// Largest body a chunk frame can describe
pub const MAX_CELL_SIZE: usize = i32::MAX as usize;

/// A serialized row/family/qualifier cell
///
/// Owns its serialized body. Accessors read straight from those bytes, so
/// a cell rebuilt from an unchecked buffer should go through
/// [`KeyValue::parse`] before its fields are read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyValue {
    bytes: Vec<u8>,
    sequence_id: SequenceId,
}

impl KeyValue {
    /// Start building a cell for `row`
    pub fn builder(row: impl Into<Vec<u8>>) -> KeyValueBuilder {
        KeyValueBuilder::new(row.into())
    }

    /// Validate a serialized body and take ownership of a copy of it
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCell`] if any length field disagrees with the
    /// body size or the type code is unknown.
    pub fn parse(body: &[u8], sequence_id: SequenceId) -> Result<Self> {
        if body.len() < LENGTHS_SIZE + KEY_FIXED_SIZE {
            return Err(Error::InvalidCell(format!(
                "body of {} bytes is shorter than the fixed key layout",
                body.len()
            )));
        }
        let key_len = read_len(body, 0, "key")?;
        let value_len = read_len(body, 4, "value")?;
        if key_len < KEY_FIXED_SIZE {
            return Err(Error::InvalidCell(format!("key length {} too small", key_len)));
        }
        let kv_end = LENGTHS_SIZE
            .checked_add(key_len)
            .and_then(|n| n.checked_add(value_len))
            .filter(|&n| n <= body.len())
            .ok_or_else(|| {
                Error::InvalidCell(format!(
                    "key {} + value {} exceed body of {} bytes",
                    key_len,
                    value_len,
                    body.len()
                ))
            })?;

        let row_len = BigEndian::read_i16(&body[LENGTHS_SIZE..]);
        if row_len < 0 {
            return Err(Error::InvalidCell(format!("negative row length {}", row_len)));
        }
        let family_len_pos = LENGTHS_SIZE + ROW_LENGTH_SIZE + row_len as usize;
        if family_len_pos + FAMILY_LENGTH_SIZE + KEY_TRAILER_SIZE > LENGTHS_SIZE + key_len {
            return Err(Error::InvalidCell(format!(
                "row length {} overflows key of {} bytes",
                row_len, key_len
            )));
        }
        let family_len = body[family_len_pos] as usize;
        if ROW_LENGTH_SIZE + row_len as usize + FAMILY_LENGTH_SIZE + family_len + KEY_TRAILER_SIZE
            > key_len
        {
            return Err(Error::InvalidCell(format!(
                "family length {} overflows key of {} bytes",
                family_len, key_len
            )));
        }
        let type_code = body[LENGTHS_SIZE + key_len - 1];
        if CellType::from_code(type_code).is_none() {
            return Err(Error::InvalidCell(format!("unknown type code {}", type_code)));
        }

        let rest = body.len() - kv_end;
        if rest != 0 {
            if rest < TAGS_LENGTH_SIZE {
                return Err(Error::InvalidCell(format!(
                    "{} trailing bytes cannot hold a tags length",
                    rest
                )));
            }
            let tags_len = BigEndian::read_u16(&body[kv_end..]) as usize;
            if tags_len == 0 || TAGS_LENGTH_SIZE + tags_len != rest {
                return Err(Error::InvalidCell(format!(
                    "tags length {} does not match {} trailing bytes",
                    tags_len, rest
                )));
            }
        }

        Ok(KeyValue {
            bytes: body.to_vec(),
            sequence_id,
        })
    }

    /// Same cell carrying a different sequence id
    pub fn with_sequence_id(self, sequence_id: SequenceId) -> Self {
        KeyValue {
            bytes: self.bytes,
            sequence_id,
        }
    }

    /// Serialized body
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn key_len(&self) -> usize {
        BigEndian::read_i32(&self.bytes[0..4]) as usize
    }

    fn value_len(&self) -> usize {
        BigEndian::read_i32(&self.bytes[4..8]) as usize
    }

    fn row_len(&self) -> usize {
        BigEndian::read_i16(&self.bytes[LENGTHS_SIZE..]) as usize
    }

    fn family_len_pos(&self) -> usize {
        LENGTHS_SIZE + ROW_LENGTH_SIZE + self.row_len()
    }

    fn family_len(&self) -> usize {
        self.bytes[self.family_len_pos()] as usize
    }

    fn key_end(&self) -> usize {
        LENGTHS_SIZE + self.key_len()
    }

    /// Row key
    pub fn row(&self) -> &[u8] {
        let start = LENGTHS_SIZE + ROW_LENGTH_SIZE;
        &self.bytes[start..start + self.row_len()]
    }

    /// Column family
    pub fn family(&self) -> &[u8] {
        let start = self.family_len_pos() + FAMILY_LENGTH_SIZE;
        &self.bytes[start..start + self.family_len()]
    }

    /// Column qualifier
    pub fn qualifier(&self) -> &[u8] {
        let start = self.family_len_pos() + FAMILY_LENGTH_SIZE + self.family_len();
        &self.bytes[start..self.key_end() - KEY_TRAILER_SIZE]
    }

    /// Write timestamp
    pub fn timestamp(&self) -> i64 {
        BigEndian::read_i64(&self.bytes[self.key_end() - KEY_TRAILER_SIZE..])
    }

    /// Mutation type, `None` for an unknown code
    pub fn cell_type(&self) -> Option<CellType> {
        CellType::from_code(self.bytes[self.key_end() - 1])
    }

    /// Cell value
    pub fn value(&self) -> &[u8] {
        let start = self.key_end();
        &self.bytes[start..start + self.value_len()]
    }

    /// Cell tags, empty when the cell has none
    pub fn tags(&self) -> &[u8] {
        let kv_end = self.key_end() + self.value_len();
        if self.bytes.len() > kv_end {
            &self.bytes[kv_end + TAGS_LENGTH_SIZE..]
        } else {
            &[]
        }
    }
}

impl DurableCell for KeyValue {
    fn serialized_size(&self) -> usize {
        self.bytes.len()
    }

    fn write_to(&self, buf: &mut [u8]) {
        buf.copy_from_slice(&self.bytes);
    }

    fn sequence_id(&self) -> SequenceId {
        self.sequence_id
    }

    fn from_serialized(body: &[u8], sequence_id: SequenceId) -> Self {
        KeyValue {
            bytes: body.to_vec(),
            sequence_id,
        }
    }
}

fn read_len(body: &[u8], pos: usize, what: &str) -> Result<usize> {
    let len = BigEndian::read_i32(&body[pos..pos + 4]);
    if len < 0 {
        return Err(Error::InvalidCell(format!("negative {} length {}", what, len)));
    }
    Ok(len as usize)
}

/// Builder for [`KeyValue`]
///
/// Defaults: empty family and qualifier, timestamp 0, [`CellType::Put`],
/// empty value, no tags, [`SequenceId::ZERO`].
#[derive(Debug, Clone)]
pub struct KeyValueBuilder {
    row: Vec<u8>,
    family: Vec<u8>,
    qualifier: Vec<u8>,
    timestamp: i64,
    cell_type: CellType,
    value: Vec<u8>,
    tags: Vec<u8>,
    sequence_id: SequenceId,
}

impl KeyValueBuilder {
    fn new(row: Vec<u8>) -> Self {
        KeyValueBuilder {
            row,
            family: Vec::new(),
            qualifier: Vec::new(),
            timestamp: 0,
            cell_type: CellType::Put,
            value: Vec::new(),
            tags: Vec::new(),
            sequence_id: SequenceId::ZERO,
        }
    }

    /// Set the column family
    pub fn family(mut self, family: impl Into<Vec<u8>>) -> Self {
        self.family = family.into();
        self
    }

    /// Set the column qualifier
    pub fn qualifier(mut self, qualifier: impl Into<Vec<u8>>) -> Self {
        self.qualifier = qualifier.into();
        self
    }

    /// Set the write timestamp
    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Set the mutation type
    pub fn cell_type(mut self, cell_type: CellType) -> Self {
        self.cell_type = cell_type;
        self
    }

    /// Set the value
    pub fn value(mut self, value: impl Into<Vec<u8>>) -> Self {
        self.value = value.into();
        self
    }

    /// Set the tags
    pub fn tags(mut self, tags: impl Into<Vec<u8>>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Set the sequence id
    pub fn sequence_id(mut self, sequence_id: SequenceId) -> Self {
        self.sequence_id = sequence_id;
        self
    }

    /// Serialize the cell
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCell`] if a field exceeds its length prefix,
    /// or [`Error::RecordTooLarge`] if the body exceeds [`MAX_CELL_SIZE`].
    pub fn build(self) -> Result<KeyValue> {
        if self.row.len() > i16::MAX as usize {
            return Err(Error::InvalidCell(format!(
                "row of {} bytes exceeds {}",
                self.row.len(),
                i16::MAX
            )));
        }
        if self.family.len() > u8::MAX as usize {
            return Err(Error::InvalidCell(format!(
                "family of {} bytes exceeds {}",
                self.family.len(),
                u8::MAX
            )));
        }
        if self.tags.len() > u16::MAX as usize {
            return Err(Error::InvalidCell(format!(
                "tags of {} bytes exceed {}",
                self.tags.len(),
                u16::MAX
            )));
        }

        let key_len = KEY_FIXED_SIZE + self.row.len() + self.family.len() + self.qualifier.len();
        let tags_size = if self.tags.is_empty() {
            0
        } else {
            TAGS_LENGTH_SIZE + self.tags.len()
        };
        let size = LENGTHS_SIZE + key_len + self.value.len() + tags_size;
        if size > MAX_CELL_SIZE {
            return Err(Error::RecordTooLarge {
                size,
                max: MAX_CELL_SIZE,
            });
        }

        let mut bytes = vec![0u8; size];
        BigEndian::write_i32(&mut bytes[0..4], key_len as i32);
        BigEndian::write_i32(&mut bytes[4..8], self.value.len() as i32);
        let mut pos = LENGTHS_SIZE;
        BigEndian::write_i16(&mut bytes[pos..], self.row.len() as i16);
        pos += ROW_LENGTH_SIZE;
        pos = put(&mut bytes, pos, &self.row);
        bytes[pos] = self.family.len() as u8;
        pos += FAMILY_LENGTH_SIZE;
        pos = put(&mut bytes, pos, &self.family);
        pos = put(&mut bytes, pos, &self.qualifier);
        BigEndian::write_i64(&mut bytes[pos..], self.timestamp);
        pos += 8;
        bytes[pos] = self.cell_type.code();
        pos += 1;
        pos = put(&mut bytes, pos, &self.value);
        if !self.tags.is_empty() {
            BigEndian::write_u16(&mut bytes[pos..], self.tags.len() as u16);
            pos += TAGS_LENGTH_SIZE;
            put(&mut bytes, pos, &self.tags);
        }

        Ok(KeyValue {
            bytes,
            sequence_id: self.sequence_id,
        })
    }
}

fn put(buf: &mut [u8], pos: usize, src: &[u8]) -> usize {
    buf[pos..pos + src.len()].copy_from_slice(src);
    pos + src.len()
}

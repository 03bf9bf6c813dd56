//! Offset allocation for chunk writers
//!
//! Hands out non-overlapping byte ranges of a chunk's data region. The
//! cursor only moves forward, which keeps frames packed in write order.

use cellchunk_core::{Error, Result};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Atomic bump allocator over `[start, limit)`
///
/// # Thread Safety
///
/// `allocate` is lock-free. Two concurrent calls never receive overlapping
/// ranges; a call that would cross `limit` fails without moving the cursor.
#[derive(Debug)]
pub struct OffsetAllocator {
    /// Next free offset
    next: AtomicUsize,
    /// One past the last usable offset
    limit: usize,
}

impl OffsetAllocator {
    /// Create an allocator whose first range starts at `start`
    pub fn new(start: usize, limit: usize) -> Self {
        debug_assert!(start <= limit);
        Self {
            next: AtomicUsize::new(start),
            limit,
        }
    }

    /// Reserve `len` bytes and return the offset of the first one
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChunkFull`] if fewer than `len` bytes remain.
    pub fn allocate(&self, len: usize) -> Result<usize> {
        let mut current = self.next.load(Ordering::Acquire);
        loop {
            let end = match current.checked_add(len) {
                Some(end) if end <= self.limit => end,
                _ => {
                    return Err(Error::ChunkFull {
                        requested: len,
                        remaining: self.limit - current,
                    })
                }
            };
            match self
                .next
                .compare_exchange_weak(current, end, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return Ok(current),
                Err(actual) => current = actual,
            }
        }
    }

    /// Next offset that would be handed out
    #[inline]
    pub fn position(&self) -> usize {
        self.next.load(Ordering::Acquire)
    }

    /// One past the last usable offset
    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Bytes still available
    pub fn remaining(&self) -> usize {
        self.limit - self.position()
    }
}

//! Sliding-window dictionary holding previously compressed input.

use alloc::vec::Vec;

use crate::error::MppcError;

/// Fixed-capacity circular byte store addressed by logical offsets.
///
/// Logical offsets count the bytes appended since the last reset; the byte at
/// logical offset `o` lives at physical index `o & (capacity - 1)`. The
/// dictionary is the window `[start(), write_offset())`, never wider than the
/// capacity.
///
/// A reset empties the dictionary by rewinding the write position to offset 0,
/// so the next byte lands at physical index 0. The storage is neither freed
/// nor cleared. Offsets handed out before a reset must not be used after it.
pub(crate) struct HistoryBuffer {
    buffer: Vec<u8>,
    mask: usize,
    /// Logical offset of the next byte to be appended.
    write_offset: usize,
}

impl HistoryBuffer {
    /// Allocates a history buffer of `capacity` bytes (a power of two).
    pub(crate) fn new(capacity: usize) -> Result<Self, MppcError> {
        debug_assert!(capacity.is_power_of_two());

        Ok(Self {
            buffer: crate::try_alloc_filled(capacity, 0u8)?,
            mask: capacity - 1,
            write_offset: 0,
        })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub(crate) fn write_offset(&self) -> usize {
        self.write_offset
    }

    /// Logical offset of the oldest byte still in the dictionary.
    pub(crate) fn start(&self) -> usize {
        self.write_offset.saturating_sub(self.capacity())
    }

    pub(crate) fn len(&self) -> usize {
        self.write_offset - self.start()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Space left before the write position reaches the end of the physical buffer.
    ///
    /// A chunk that does not fit has to restart at the front, since the
    /// receiving side does not wrap within a chunk.
    pub(crate) fn remaining(&self) -> usize {
        self.capacity().saturating_sub(self.write_offset)
    }

    /// Whether `offset` addresses a byte of the current dictionary.
    pub(crate) fn contains(&self, offset: usize) -> bool {
        (self.start()..self.write_offset).contains(&offset)
    }

    /// Returns the byte previously appended at logical `offset`.
    ///
    /// Only offsets inside the dictionary window are meaningful.
    pub(crate) fn byte_at(&self, offset: usize) -> u8 {
        debug_assert!(self.contains(offset), "offset {offset} outside of the history window");
        self.buffer[offset & self.mask]
    }

    pub(crate) fn push(&mut self, byte: u8) {
        self.buffer[self.write_offset & self.mask] = byte;
        self.write_offset += 1;
    }

    #[cfg(test)]
    pub(crate) fn append(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.push(byte);
        }
    }

    /// Empties the dictionary and moves the write position to the physical front.
    pub(crate) fn reset(&mut self) {
        self.write_offset = 0;
    }
}

//! Single-slot hash table of 3-byte prefixes.

use alloc::vec::Vec;

use crate::error::MppcError;

const EMPTY: usize = usize::MAX;

/// Fibonacci hashing multiplier (2^32 / golden ratio).
const HASH_MULTIPLIER: u32 = 0x9E37_79B1;

/// Maps the hash of a 3-byte prefix to the most recent logical history offset
/// where that prefix was seen.
///
/// There is no chaining: recording a prefix replaces whatever the bucket held,
/// so older occurrences and colliding prefixes are forgotten. Callers verify
/// candidates against the history before using them.
pub(crate) struct MatchFinder {
    table: Vec<usize>,
    shift: u32,
}

impl MatchFinder {
    /// Allocates a table of `size` buckets (a power of two).
    pub(crate) fn new(size: usize) -> Result<Self, MppcError> {
        debug_assert!(size.is_power_of_two() && size > 1);

        Ok(Self {
            table: crate::try_alloc_filled(size, EMPTY)?,
            shift: 32 - size.trailing_zeros(),
        })
    }

    pub(crate) fn hash(&self, prefix: [u8; 3]) -> usize {
        let key = u32::from(prefix[0]) | (u32::from(prefix[1]) << 8) | (u32::from(prefix[2]) << 16);
        usize::try_from(key.wrapping_mul(HASH_MULTIPLIER) >> self.shift).unwrap_or_default()
    }

    pub(crate) fn lookup(&self, hash: usize) -> Option<usize> {
        match self.table[hash] {
            EMPTY => None,
            offset => Some(offset),
        }
    }

    pub(crate) fn record(&mut self, hash: usize, offset: usize) {
        self.table[hash] = offset;
    }

    pub(crate) fn clear(&mut self) {
        self.table.fill(EMPTY);
    }
}

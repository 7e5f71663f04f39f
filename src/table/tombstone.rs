//! Tombstone bitmap
//!
//! One bit per row slot, 1 = deleted.

use crate::limits::{MAX_ROWS, TOMBSTONE_WORDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tombstones {
    words: [u64; TOMBSTONE_WORDS],
}

impl Tombstones {
    pub const EMPTY: Self = Self {
        words: [0; TOMBSTONE_WORDS],
    };

    pub fn from_words(words: [u64; TOMBSTONE_WORDS]) -> Self {
        Self { words }
    }

    pub fn words(&self) -> &[u64; TOMBSTONE_WORDS] {
        &self.words
    }

    /// Slots past the capacity report as not deleted
    #[inline]
    pub fn is_set(&self, slot: usize) -> bool {
        if slot >= MAX_ROWS {
            return false;
        }
        (self.words[slot / 64] >> (slot % 64)) & 1 == 1
    }

    #[inline]
    pub fn set(&mut self, slot: usize) {
        self.words[slot / 64] |= 1u64 << (slot % 64);
    }

    #[inline]
    pub fn clear(&mut self, slot: usize) {
        self.words[slot / 64] &= !(1u64 << (slot % 64));
    }

    pub fn reset(&mut self) {
        self.words = [0; TOMBSTONE_WORDS];
    }

    /// Deleted slots in `[0, limit)`
    pub fn count_below(&self, limit: usize) -> usize {
        (0..limit.min(MAX_ROWS)).filter(|&slot| self.is_set(slot)).count()
    }
}

impl Default for Tombstones {
    fn default() -> Self {
        Self::EMPTY
    }
}

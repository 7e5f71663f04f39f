//! LIFO stack of reclaimed row slots

use crate::limits::MAX_ROWS;

#[derive(Debug, Clone, Copy)]
pub struct FreeList {
    slots: [u16; MAX_ROWS],
    top: usize,
}

impl FreeList {
    pub const EMPTY: Self = Self {
        slots: [0; MAX_ROWS],
        top: 0,
    };

    /// Every slot is freed at most once before reuse, so the stack never
    /// holds more than `MAX_ROWS` entries.
    pub fn push(&mut self, slot: usize) {
        debug_assert!(self.top < MAX_ROWS, "free list overflow");
        if self.top < MAX_ROWS {
            self.slots[self.top] = slot as u16;
            self.top += 1;
        }
    }

    pub fn pop(&mut self) -> Option<usize> {
        if self.top == 0 {
            return None;
        }
        self.top -= 1;
        Some(self.slots[self.top] as usize)
    }

    pub fn peek(&self) -> Option<usize> {
        self.top.checked_sub(1).map(|i| self.slots[i] as usize)
    }

    pub fn len(&self) -> usize {
        self.top
    }

    pub fn is_empty(&self) -> bool {
        self.top == 0
    }

    pub fn clear(&mut self) {
        self.top = 0;
    }

    /// Slots in pop order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots[..self.top].iter().rev().map(|&s| s as usize)
    }
}

impl Default for FreeList {
    fn default() -> Self {
        Self::EMPTY
    }
}

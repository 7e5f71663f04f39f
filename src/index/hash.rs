//! Primary-key hash index
//!
//! Open addressing over `HASH_SIZE` buckets with linear probing.
//!
//! ## Bucket Encoding
//! ```text
//! ┌──────────┬──────────────────────────┐
//! │ 0        │ empty                    │
//! │ slot + 1 │ row slot holding the key │
//! └──────────┴──────────────────────────┘
//! ```
//!
//! The index stores slots only. Keys are read back from the table through a
//! resolver closure that returns the primary key of a *live* slot, so a bucket
//! pointing at a tombstoned row never matches.

use crate::error::{Result, TableError};
use crate::limits::HASH_SIZE;

const MASK: usize = HASH_SIZE - 1;

/// 32-bit xorshift-multiply avalanche mix
#[inline]
pub fn mix32(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

/// Bucket positions visited for `key`, in probe order
fn probe(key: i32) -> impl Iterator<Item = usize> {
    let home = mix32(key as u32) as usize;
    (0..HASH_SIZE).map(move |i| (home + i) & MASK)
}

#[inline]
fn encode(slot: usize) -> u16 {
    (slot + 1) as u16
}

#[inline]
fn decode(bucket: u16) -> usize {
    bucket as usize - 1
}

/// Hash map from primary-key value to row slot
#[derive(Debug, Clone, Copy)]
pub struct PkIndex {
    buckets: [u16; HASH_SIZE],
}

impl PkIndex {
    pub const EMPTY: Self = Self {
        buckets: [0; HASH_SIZE],
    };

    pub fn clear(&mut self) {
        self.buckets = [0; HASH_SIZE];
    }

    /// Occupied buckets
    pub fn len(&self) -> usize {
        self.buckets.iter().filter(|&&b| b != 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|&b| b == 0)
    }

    /// Map `key` to `slot`.
    ///
    /// Fails with `Unsupported` when a live row already holds `key`, and with
    /// `Full` if no bucket is free. The index is unchanged on failure.
    pub fn insert<F>(&mut self, key: i32, slot: usize, resolve: F) -> Result<()>
    where
        F: Fn(usize) -> Option<i32>,
    {
        for idx in probe(key) {
            match self.buckets[idx] {
                0 => {
                    self.buckets[idx] = encode(slot);
                    return Ok(());
                }
                bucket => {
                    if resolve(decode(bucket)) == Some(key) {
                        return Err(TableError::Unsupported(format!(
                            "duplicate primary key {}",
                            key
                        )));
                    }
                }
            }
        }
        Err(TableError::Full)
    }

    /// Slot of the live row holding `key`
    pub fn find<F>(&self, key: i32, resolve: F) -> Option<usize>
    where
        F: Fn(usize) -> Option<i32>,
    {
        self.position(key, &resolve).map(|idx| decode(self.buckets[idx]))
    }

    /// Remove the bucket for the live row holding `key`, returning its slot.
    ///
    /// Must run while the row is still live. The rest of the probe cluster is
    /// re-seated so colliding keys stay reachable.
    pub fn remove<F>(&mut self, key: i32, resolve: F) -> Option<usize>
    where
        F: Fn(usize) -> Option<i32>,
    {
        let hole = self.position(key, &resolve)?;
        let slot = decode(self.buckets[hole]);
        self.buckets[hole] = 0;
        self.reseat_cluster(hole, &resolve);
        Some(slot)
    }

    fn position<F>(&self, key: i32, resolve: &F) -> Option<usize>
    where
        F: Fn(usize) -> Option<i32>,
    {
        for idx in probe(key) {
            match self.buckets[idx] {
                0 => return None,
                bucket => {
                    if resolve(decode(bucket)) == Some(key) {
                        return Some(idx);
                    }
                }
            }
        }
        None
    }

    /// Re-insert every entry after `hole` up to the next empty bucket.
    /// Entries whose row is no longer live are dropped.
    fn reseat_cluster<F>(&mut self, hole: usize, resolve: &F)
    where
        F: Fn(usize) -> Option<i32>,
    {
        let mut idx = (hole + 1) & MASK;
        while self.buckets[idx] != 0 {
            let bucket = self.buckets[idx];
            self.buckets[idx] = 0;
            if let Some(key) = resolve(decode(bucket)) {
                if let Some(free) = probe(key).find(|&i| self.buckets[i] == 0) {
                    self.buckets[free] = bucket;
                }
            }
            idx = (idx + 1) & MASK;
        }
    }
}

impl Default for PkIndex {
    fn default() -> Self {
        Self::EMPTY
    }
}

//! Compile-time ceilings
//!
//! Every table has exactly the same footprint, fixed by these constants.

/// Row slots per table
pub const MAX_ROWS: usize = 256;

/// Columns per table (extra column specs are dropped at initialization)
pub const MAX_COLUMNS: usize = 16;

/// Bytes reserved for a table or column name, terminator included
pub const MAX_NAME_LEN: usize = 32;

/// Bytes reserved for a text cell, terminator included
pub const MAX_TEXT_LEN: usize = 32;

/// Buckets in the primary-key hash index
pub const HASH_SIZE: usize = 512;

/// 64-bit words in the tombstone bitmap
pub const TOMBSTONE_WORDS: usize = (MAX_ROWS + 63) / 64;

/// Column 0 always holds the integer primary key
pub const PRIMARY_KEY_COLUMN: usize = 0;

const _: () = assert!(HASH_SIZE.is_power_of_two(), "HASH_SIZE must be a power of two");
const _: () = assert!(HASH_SIZE >= MAX_ROWS, "HASH_SIZE must cover every row slot");
// Hash buckets store `slot + 1` in a u16, zero meaning empty.
const _: () = assert!(MAX_ROWS < u16::MAX as usize);
const _: () = assert!(MAX_NAME_LEN > 1 && MAX_TEXT_LEN > 1);

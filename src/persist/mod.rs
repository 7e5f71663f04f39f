//! Persist Module
//!
//! Flat binary snapshots of a single table.
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Header                                                       │
//! │   Name [u8; MAX_NAME_LEN] | ColumnCount i32 | HighWater u64  │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Column Metadata (ColumnCount times)                          │
//! │   Name [u8; MAX_NAME_LEN] | TypeTag i32                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Tombstone Bitmap                                             │
//! │   [u64; TOMBSTONE_WORDS] (fixed size, independent of rows)   │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Column Data (declared order, HighWater rows each)            │
//! │   Int:  i32 per row                                          │
//! │   Text: [u8; MAX_TEXT_LEN] per row                           │
//! │   Bool / Float / Double / Pointer: not written               │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian. There is no magic, version or checksum:
//! a file written by a build with different limits misparses.
//!
//! ## What Is Not Persisted
//! - Bool, Float, Double and Pointer cells (loaded zero-filled)
//! - The primary-key hash index and the free list. A loaded table starts with
//!   both empty unless [`Config::reindex_on_load`](crate::Config) is set or
//!   [`Table::reindex`](crate::Table::reindex) is called; until then
//!   primary-key lookups find nothing and deleted slots are not reused.

mod reader;
mod writer;

use crate::column::ColumnType;
use crate::limits::{MAX_NAME_LEN, MAX_TEXT_LEN, TOMBSTONE_WORDS};

pub use reader::{decode, load, load_with_config};
pub use writer::{encode, save};

/// Name (MAX_NAME_LEN) + column count (4) + high-water mark (8)
pub(crate) const HEADER_SIZE: usize = MAX_NAME_LEN + 4 + 8;

/// Column name (MAX_NAME_LEN) + type tag (4)
pub(crate) const COLUMN_META_SIZE: usize = MAX_NAME_LEN + 4;

pub(crate) const TOMBSTONE_SIZE: usize = TOMBSTONE_WORDS * 8;

/// Bytes per row for persisted column types
pub(crate) fn row_width(column_type: ColumnType) -> Option<usize> {
    match column_type {
        ColumnType::Int => Some(4),
        ColumnType::Text => Some(MAX_TEXT_LEN),
        ColumnType::Bool | ColumnType::Float | ColumnType::Double | ColumnType::Pointer => None,
    }
}

//! Table Module
//!
//! Column store and row lifecycle.
//!
//! ## Responsibilities
//! - Own every column array, sized to `MAX_ROWS`
//! - Allocate slots (free list first, then the high-water mark)
//! - Track liveness with a tombstone bitmap
//! - Keep the primary-key hash index in step with inserts and deletes
//!
//! ## Slot States
//! ```text
//!   unused ──insert──► live ──delete──► tombstoned (on free list)
//!                        ▲                     │
//!                        └──────insert─────────┘
//! ```

mod free_list;
mod row;
#[allow(clippy::module_inception)]
mod table;
mod tombstone;

pub use free_list::FreeList;
pub use row::RowView;
pub use table::Table;
pub use tombstone::Tombstones;

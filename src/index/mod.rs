//! Index Module
//!
//! Two accelerators over a [`Table`](crate::Table):
//!
//! - [`PkIndex`]: hash map from the primary key to its slot, owned by the
//!   table and updated on every insert and delete.
//! - [`SortIndex`]: explicitly built, sorted permutation of the live slots of
//!   one column. It is a snapshot: inserts and deletes after `build` are not
//!   reflected until the next `build`, and queries on a stale index report
//!   whatever the slots hold now (deleted rows included).

mod hash;
mod sorted;

pub use hash::{mix32, PkIndex};
pub use sorted::SortIndex;

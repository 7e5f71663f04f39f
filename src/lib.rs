//! # tinycol
//!
//! A fixed-capacity, allocation-free columnar table engine with:
//! - Typed columns stored as fixed arrays sized at compile time
//! - Tombstone deletion with LIFO slot recycling
//! - Primary-key hash index maintained on every insert/delete
//! - Optional sort index for binary-search range queries
//! - Flat binary snapshots
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Query Engine                             │
//! │        select_where_eq / select_where_op / delete            │
//! └──────────────┬─────────────────────────────┬────────────────┘
//!                │                             │
//!                ▼                             ▼
//!   ┌─────────────────────────┐     ┌─────────────────────┐
//!   │          Table          │     │     SortIndex       │
//!   │  columns + tombstones   │◄────│  (explicit build,   │
//!   │  free list + PkIndex    │     │   snapshot of rows) │
//!   └────────────┬────────────┘     └─────────────────────┘
//!                │
//!                ▼
//!        ┌──────────────┐
//!        │   Snapshot   │
//!        │ (save/load)  │
//!        └──────────────┘
//! ```
//!
//! ## Concurrency
//! Everything is synchronous and single-threaded. A [`Table`] is plain owned
//! data; callers that share it across threads must serialize access
//! themselves.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod limits;

pub mod column;
pub mod table;
pub mod index;
pub mod query;
pub mod persist;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{TableError, Result};
pub use config::Config;
pub use column::{ColumnSpec, ColumnType, FixedStr, Handle, TypeSet, Value};
pub use table::{RowView, Table};
pub use index::SortIndex;
pub use query::Op;
pub use persist::{load, load_with_config, save};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of tinycol
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

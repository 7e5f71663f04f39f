//! Query Module
//!
//! Predicate evaluation over a single column.
//!
//! ## Access Paths
//! ```text
//! select_where_eq(pk)   ──► PkIndex lookup         O(1)
//! select_where_eq(col)  ──► linear scan            O(high-water mark)
//! select_where_op(col)  ──► linear scan            O(high-water mark)
//! SortIndex::select_*   ──► binary search + walk   O(log n + matches)
//! ```
//!
//! Visitors receive the table and a live slot, synchronously and in slot
//! order for scans (sorted order for the sort index). They get a shared
//! borrow, so a visitor cannot insert or delete mid-scan.

mod scan;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// Comparison operator of a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    Eq,
    Gt,
    Lt,
    Gte,
}

impl Op {
    /// Whether `cell.cmp(key)` satisfies the operator.
    /// Unordered pairs (NaN) never match.
    pub fn matches(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (_, None) => false,
            (Op::Eq, Some(o)) => o == Ordering::Equal,
            (Op::Gt, Some(o)) => o == Ordering::Greater,
            (Op::Lt, Some(o)) => o == Ordering::Less,
            (Op::Gte, Some(o)) => o != Ordering::Less,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Gt => ">",
            Op::Lt => "<",
            Op::Gte => ">=",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Op {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eq" | "=" | "==" => Ok(Op::Eq),
            "gt" | ">" => Ok(Op::Gt),
            "lt" | "<" => Ok(Op::Lt),
            "gte" | "ge" | ">=" => Ok(Op::Gte),
            other => Err(TableError::Invalid(format!("unknown operator '{}'", other))),
        }
    }
}

//! Secondary sort index
//!
//! A sorted permutation of the live slots of one column, built on demand.
//!
//! ## Lifecycle
//! ```text
//!   inactive ──build──► active ──drop_index──► inactive
//!                         │
//!                    (table mutates: index is stale until rebuilt)
//! ```

use std::cmp::Ordering;
use std::ops::Range;

use crate::column::{Cell, ColumnData, ColumnType, Value};
use crate::error::{Result, TableError};
use crate::limits::MAX_ROWS;
use crate::query::Op;
use crate::table::Table;

/// Sorted slot permutation over one column of a table
///
/// The index refers to the table by column position only; it does not own or
/// borrow it between calls. Correct results are guaranteed only between
/// `build` and the next insert or delete on that table.
#[derive(Debug, Clone)]
pub struct SortIndex {
    column: usize,
    rows: [u16; MAX_ROWS],
    len: usize,
    active: bool,
}

impl SortIndex {
    pub const fn new() -> Self {
        Self {
            column: 0,
            rows: [0; MAX_ROWS],
            len: 0,
            active: false,
        }
    }

    /// Collect the live slots of `table` and sort them by `column`.
    ///
    /// The sort is a stable insertion sort, so equal values keep slot order.
    /// NaN cells are left out: no operator matches them.
    /// Bool and Pointer columns cannot be ordered: the index is left inactive
    /// and `Unsupported` is returned. An index over zero live rows is active.
    pub fn build(&mut self, table: &Table, column: &str) -> Result<()> {
        self.active = false;
        self.len = 0;

        let (index, column_type) = table.resolve_column(column)?;
        if !column_type.is_sortable() {
            return Err(TableError::Unsupported(format!(
                "cannot sort-index {} column '{}'",
                column_type, column
            )));
        }

        let data = table.columns()[index].data();
        for slot in table.live_slots().filter(|&slot| data.is_ordered(slot)) {
            self.rows[self.len] = slot as u16;
            self.len += 1;
        }

        insertion_sort(&mut self.rows[..self.len], data);

        self.column = index;
        self.active = true;
        tracing::debug!(
            "Table '{}': built sort index on '{}' over {} rows",
            table.name(),
            column,
            self.len
        );
        Ok(())
    }

    /// Deactivate; contents are left as they are
    pub fn drop_index(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Indexed column position, if active
    pub fn column(&self) -> Option<usize> {
        self.active.then_some(self.column)
    }

    pub fn len(&self) -> usize {
        if self.active {
            self.len
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slots in index order
    pub fn slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows[..self.len()].iter().map(|&s| s as usize)
    }

    /// Visit every indexed row equal to `value`
    pub fn select_eq<F>(&self, table: &Table, value: Value<'_>, visit: F) -> Result<()>
    where
        F: FnMut(&Table, usize),
    {
        self.select_op(table, Op::Eq, value, visit)
    }

    /// Visit every indexed row where `column op value` holds, in index order.
    ///
    /// `Gt` excludes every value equal to the key, not just the first one.
    /// A NaN key matches nothing. Text columns accept only `Eq`.
    pub fn select_op<F>(&self, table: &Table, op: Op, value: Value<'_>, mut visit: F) -> Result<()>
    where
        F: FnMut(&Table, usize),
    {
        if !self.active {
            return Err(TableError::Empty);
        }
        let column = table.columns().get(self.column).ok_or_else(|| {
            TableError::Invalid(format!("index column {} not in table", self.column))
        })?;
        let column_type = column.column_type();
        table.enabled_types().check(column_type)?;
        if !column_type.is_sortable() {
            return Err(TableError::Unsupported(format!(
                "{} column cannot be queried through a sort index",
                column_type
            )));
        }
        if column_type == ColumnType::Text && op != Op::Eq {
            return Err(TableError::Unsupported(
                "text columns support only equality through a sort index".into(),
            ));
        }

        let key = Cell::for_predicate(column_type, value)?;
        if key.is_nan() {
            return Ok(());
        }
        let data = column.data();
        let rows = &self.rows[..self.len];

        for &slot in &rows[matching_range(rows, data, op, &key)] {
            visit(table, slot as usize);
        }
        Ok(())
    }
}

impl Default for SortIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Stable in-place insertion sort of slots by column value
fn insertion_sort(rows: &mut [u16], data: &ColumnData) {
    for i in 1..rows.len() {
        let current = rows[i];
        let mut j = i;
        while j > 0 {
            let previous = rows[j - 1];
            if matches!(
                data.compare_slots(previous as usize, current as usize),
                Some(Ordering::Less | Ordering::Equal)
            ) {
                break;
            }
            rows[j] = previous;
            j -= 1;
        }
        rows[j] = current;
    }
}

/// Positions in `rows` satisfying `op` against `key`
fn matching_range(rows: &[u16], data: &ColumnData, op: Op, key: &Cell) -> Range<usize> {
    let start = lower_bound(rows, data, key);
    let equal_end = start
        + rows[start..]
            .iter()
            .take_while(|&&s| data.compare(s as usize, key) == Some(Ordering::Equal))
            .count();

    match op {
        Op::Eq => start..equal_end,
        Op::Lt => 0..start,
        Op::Gt => equal_end..rows.len(),
        Op::Gte => start..rows.len(),
    }
}

/// First position whose value is not less than `key`
fn lower_bound(rows: &[u16], data: &ColumnData, key: &Cell) -> usize {
    let (mut lo, mut hi) = (0, rows.len());
    while lo < hi {
        let mid = (lo + hi) / 2;
        if data.compare(rows[mid] as usize, key) == Some(Ordering::Less) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

//! Predicate scans and deletes
//!
//! Query entry points on [`Table`]. Every entry point resolves the column
//! name first (`NotFound`), then checks its type against the table's enabled
//! set (`Unsupported`), then normalizes the key (`Invalid` on a type mismatch).

use std::cmp::Ordering;

use crate::column::{Cell, ColumnType, Value};
use crate::error::{Result, TableError};
use crate::limits::PRIMARY_KEY_COLUMN;
use crate::table::Table;

use super::Op;

impl Table {
    /// Locate an enabled column by name
    pub(crate) fn resolve_column(&self, name: &str) -> Result<(usize, ColumnType)> {
        let index = self
            .column_index(name)
            .ok_or_else(|| TableError::NotFound(format!("column '{}'", name)))?;
        let column_type = self.columns[index].column_type();
        self.types.check(column_type)?;
        Ok((index, column_type))
    }

    /// Visit every live row whose `column` equals `value`.
    ///
    /// The primary-key column goes through the hash index; any other column
    /// is scanned linearly in slot order.
    pub fn select_where_eq<F>(&self, column: &str, value: Value<'_>, mut visit: F) -> Result<()>
    where
        F: FnMut(&Table, usize),
    {
        let (index, column_type) = self.resolve_column(column)?;
        let key = Cell::for_predicate(column_type, value)?;

        if index == PRIMARY_KEY_COLUMN {
            if let Cell::Int(k) = key {
                if let Some(slot) = self.find_key(k) {
                    visit(self, slot);
                }
                return Ok(());
            }
        }

        self.scan(index, Op::Eq, &key, &mut visit);
        Ok(())
    }

    /// Visit every live row where `column op value` holds.
    ///
    /// Range operators apply to Int, Float and Double. Text, Bool and Pointer
    /// columns honor only `Eq`; any other operator visits nothing.
    pub fn select_where_op<F>(
        &self,
        column: &str,
        op: Op,
        value: Value<'_>,
        mut visit: F,
    ) -> Result<()>
    where
        F: FnMut(&Table, usize),
    {
        let (index, column_type) = self.resolve_column(column)?;
        let key = Cell::for_predicate(column_type, value)?;

        if column_type.is_numeric() {
            self.scan(index, op, &key, &mut visit);
            Ok(())
        } else if op == Op::Eq {
            self.select_where_eq(column, value, visit)
        } else {
            Ok(())
        }
    }

    /// Delete every live row whose `column` equals `value`, returning how
    /// many were deleted.
    ///
    /// On the primary key at most one row matches and it is found through
    /// the hash index. Deleted slots go onto the free list.
    pub fn delete_where_eq(&mut self, column: &str, value: Value<'_>) -> Result<usize> {
        let (index, column_type) = self.resolve_column(column)?;
        let key = Cell::for_predicate(column_type, value)?;

        if index == PRIMARY_KEY_COLUMN {
            if let Cell::Int(k) = key {
                return Ok(match self.find_key(k) {
                    Some(slot) => {
                        self.delete_slot(slot);
                        1
                    }
                    None => 0,
                });
            }
        }

        let mut deleted = 0;
        for slot in 0..self.high_water {
            if self.tombstones.is_set(slot) {
                continue;
            }
            if self.columns[index].data().compare(slot, &key) == Some(Ordering::Equal) {
                self.delete_slot(slot);
                deleted += 1;
            }
        }

        tracing::debug!(
            "Table '{}': deleted {} rows where {} = {}",
            self.name,
            deleted,
            column,
            value
        );
        Ok(deleted)
    }

    /// Linear scan over `[0, high-water mark)`, skipping tombstones
    fn scan<F>(&self, index: usize, op: Op, key: &Cell, visit: &mut F)
    where
        F: FnMut(&Table, usize),
    {
        let data = self.columns[index].data();
        for slot in self.live_slots() {
            if op.matches(data.compare(slot, key)) {
                visit(self, slot);
            }
        }
    }
}

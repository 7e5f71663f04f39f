//! Row rendering

use std::fmt;

use super::Table;

/// Borrowed view of one row slot, printable as
/// `Row 0: id=1, name=Alice, age=30`
#[derive(Clone, Copy)]
pub struct RowView<'a> {
    table: &'a Table,
    slot: usize,
}

impl<'a> RowView<'a> {
    pub(crate) fn new(table: &'a Table, slot: usize) -> Self {
        Self { table, slot }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn is_deleted(&self) -> bool {
        self.table.is_deleted(self.slot)
    }
}

impl fmt::Display for RowView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: ", self.slot)?;
        for (i, column) in self.table.columns().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match self.table.value(i, self.slot) {
                Some(value) => write!(f, "{}={}", column.name(), value)?,
                None => write!(f, "{}=?", column.name())?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for RowView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

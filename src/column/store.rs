//! Column storage
//!
//! One fixed array per column; the variant is the column's type tag.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{Result, TableError};
use crate::limits::MAX_ROWS;

use super::{ColumnType, Handle, Name, Text, Value};

/// Per-column storage, one array variant per type
#[derive(Clone)]
pub enum ColumnData {
    Int([i32; MAX_ROWS]),
    Text([Text; MAX_ROWS]),
    Bool([bool; MAX_ROWS]),
    Float([f32; MAX_ROWS]),
    Double([f64; MAX_ROWS]),
    Pointer([Handle; MAX_ROWS]),
}

impl ColumnData {
    /// Zero-filled storage for a column type
    pub const fn zeroed(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Int => ColumnData::Int([0; MAX_ROWS]),
            ColumnType::Text => ColumnData::Text([Text::EMPTY; MAX_ROWS]),
            ColumnType::Bool => ColumnData::Bool([false; MAX_ROWS]),
            ColumnType::Float => ColumnData::Float([0.0; MAX_ROWS]),
            ColumnType::Double => ColumnData::Double([0.0; MAX_ROWS]),
            ColumnType::Pointer => ColumnData::Pointer([Handle(0); MAX_ROWS]),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Int(_) => ColumnType::Int,
            ColumnData::Text(_) => ColumnType::Text,
            ColumnData::Bool(_) => ColumnType::Bool,
            ColumnData::Float(_) => ColumnType::Float,
            ColumnData::Double(_) => ColumnType::Double,
            ColumnData::Pointer(_) => ColumnType::Pointer,
        }
    }

    /// Borrow the cell at `slot` as a [`Value`]
    pub fn get(&self, slot: usize) -> Option<Value<'_>> {
        if slot >= MAX_ROWS {
            return None;
        }
        Some(match self {
            ColumnData::Int(v) => Value::Int(v[slot]),
            ColumnData::Text(v) => Value::Text(v[slot].as_str()),
            ColumnData::Bool(v) => Value::Bool(v[slot]),
            ColumnData::Float(v) => Value::Float(v[slot]),
            ColumnData::Double(v) => Value::Double(v[slot]),
            ColumnData::Pointer(v) => Value::Pointer(v[slot]),
        })
    }

    /// Write a cell already validated against this column's type
    pub(crate) fn store(&mut self, slot: usize, cell: &Cell) {
        match (self, cell) {
            (ColumnData::Int(v), Cell::Int(x)) => v[slot] = *x,
            (ColumnData::Text(v), Cell::Text(x)) => v[slot] = *x,
            (ColumnData::Bool(v), Cell::Bool(x)) => v[slot] = *x,
            (ColumnData::Float(v), Cell::Float(x)) => v[slot] = *x,
            (ColumnData::Double(v), Cell::Double(x)) => v[slot] = *x,
            (ColumnData::Pointer(v), Cell::Pointer(x)) => v[slot] = *x,
            (data, cell) => debug_assert!(
                false,
                "cell {:?} stored into {} column",
                cell,
                data.column_type()
            ),
        }
    }

    /// Compare the cell at `slot` against `key`.
    ///
    /// Floats use IEEE comparison, so NaN compares as `None`. Pointers only
    /// know equality. A key of another type never matches.
    pub(crate) fn compare(&self, slot: usize, key: &Cell) -> Option<Ordering> {
        match (self, key) {
            (ColumnData::Int(v), Cell::Int(k)) => Some(v[slot].cmp(k)),
            (ColumnData::Text(v), Cell::Text(k)) => Some(v[slot].cmp(k)),
            (ColumnData::Bool(v), Cell::Bool(k)) => Some(v[slot].cmp(k)),
            (ColumnData::Float(v), Cell::Float(k)) => v[slot].partial_cmp(k),
            (ColumnData::Double(v), Cell::Double(k)) => v[slot].partial_cmp(k),
            (ColumnData::Pointer(v), Cell::Pointer(k)) => {
                (v[slot] == *k).then_some(Ordering::Equal)
            }
            _ => None,
        }
    }

    /// False for NaN cells, which compare unordered against everything
    pub(crate) fn is_ordered(&self, slot: usize) -> bool {
        self.compare_slots(slot, slot).is_some()
    }

    /// Compare two slots of this column (sort index ordering)
    pub(crate) fn compare_slots(&self, a: usize, b: usize) -> Option<Ordering> {
        match self {
            ColumnData::Int(v) => Some(v[a].cmp(&v[b])),
            ColumnData::Text(v) => Some(v[a].cmp(&v[b])),
            ColumnData::Bool(v) => Some(v[a].cmp(&v[b])),
            ColumnData::Float(v) => v[a].partial_cmp(&v[b]),
            ColumnData::Double(v) => v[a].partial_cmp(&v[b]),
            ColumnData::Pointer(v) => (v[a] == v[b]).then_some(Ordering::Equal),
        }
    }
}

/// A named column
#[derive(Clone)]
pub struct Column {
    name: Name,
    data: ColumnData,
}

impl Column {
    /// Placeholder for column positions past `column_count`
    pub(crate) const UNUSED: Column = Column {
        name: Name::EMPTY,
        data: ColumnData::zeroed(ColumnType::Int),
    };

    pub(crate) fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: Name::new(name),
            data: ColumnData::zeroed(column_type),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn fixed_name(&self) -> &Name {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.data.column_type()
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut ColumnData {
        &mut self.data
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("type", &self.column_type())
            .finish()
    }
}

// =============================================================================
// Cells
// =============================================================================

/// A value normalized to a column's storage representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Cell {
    Int(i32),
    Text(Text),
    Bool(bool),
    Float(f32),
    Double(f64),
    Pointer(Handle),
}

impl Cell {
    /// Normalize an inserted value; text is truncated to fit a cell
    pub(crate) fn for_insert(column_type: ColumnType, value: Value<'_>) -> Result<Self> {
        match (column_type, value) {
            (ColumnType::Text, Value::Text(s)) => Ok(Cell::Text(Text::new(s))),
            _ => Self::normalize(column_type, value),
        }
    }

    /// Normalize a predicate key; text keeps its full prefix so over-long
    /// keys do not match truncated cells
    pub(crate) fn for_predicate(column_type: ColumnType, value: Value<'_>) -> Result<Self> {
        match (column_type, value) {
            (ColumnType::Text, Value::Text(s)) => Ok(Cell::Text(Text::probe(s))),
            _ => Self::normalize(column_type, value),
        }
    }

    pub(crate) fn is_nan(&self) -> bool {
        match self {
            Cell::Float(v) => v.is_nan(),
            Cell::Double(v) => v.is_nan(),
            _ => false,
        }
    }

    fn normalize(column_type: ColumnType, value: Value<'_>) -> Result<Self> {
        match (column_type, value) {
            (ColumnType::Int, Value::Int(v)) => Ok(Cell::Int(v)),
            (ColumnType::Text, Value::Text(s)) => Ok(Cell::Text(Text::new(s))),
            (ColumnType::Text, Value::Null) => Ok(Cell::Text(Text::EMPTY)),
            (ColumnType::Bool, Value::Bool(b)) => Ok(Cell::Bool(b)),
            (ColumnType::Bool, Value::Null) => Ok(Cell::Bool(false)),
            (ColumnType::Float, Value::Float(v)) => Ok(Cell::Float(v)),
            (ColumnType::Double, Value::Double(v)) => Ok(Cell::Double(v)),
            (ColumnType::Pointer, Value::Pointer(h)) => Ok(Cell::Pointer(h)),
            (column_type, value) => Err(TableError::Invalid(format!(
                "{} value for {} column",
                value.type_name(),
                column_type
            ))),
        }
    }
}

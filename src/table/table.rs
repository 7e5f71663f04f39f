//! Table implementation
//!
//! Fixed-capacity columnar storage plus the row lifecycle: slot allocation,
//! tombstones, free-list recycling and primary-key index upkeep.

use crate::column::{Cell, Column, ColumnData, ColumnSpec, ColumnType, Handle, Name, TypeSet, Value};
use crate::config::Config;
use crate::error::{Result, TableError};
use crate::index::PkIndex;
use crate::limits::{MAX_COLUMNS, MAX_ROWS, PRIMARY_KEY_COLUMN};

use super::{FreeList, RowView, Tombstones};

/// A single in-memory table with a compile-time footprint
///
/// ## Slots
/// Rows live in slots `[0, MAX_ROWS)`. A slot is live iff it is below the
/// high-water mark and its tombstone bit is clear. Deleted slots are pushed
/// on a LIFO free list and reused by later inserts, so a slot number does not
/// identify a logical row across delete/insert cycles.
///
/// ## Primary Key
/// Column 0 is an `Int` primary key, unique among live rows and mapped to its
/// slot by the hash index.
#[derive(Clone)]
pub struct Table {
    pub(crate) name: Name,
    pub(crate) columns: [Column; MAX_COLUMNS],
    pub(crate) column_count: usize,
    /// Highest slot ever allocated plus one; never lowered by deletes
    pub(crate) high_water: usize,
    pub(crate) tombstones: Tombstones,
    pub(crate) free_list: FreeList,
    pub(crate) pk_index: PkIndex,
    pub(crate) types: TypeSet,
}

/// Primary key of a live slot, as seen by the hash index
pub(crate) fn live_key<'a>(
    columns: &'a [Column; MAX_COLUMNS],
    tombstones: &'a Tombstones,
) -> impl Fn(usize) -> Option<i32> + 'a {
    move |slot| match columns[PRIMARY_KEY_COLUMN].data() {
        ColumnData::Int(keys) if !tombstones.is_set(slot) => Some(keys[slot]),
        _ => None,
    }
}

impl Table {
    /// Create a table with the default configuration
    pub fn new(name: &str, specs: &[ColumnSpec<'_>]) -> Result<Self> {
        Self::with_config(name, specs, &Config::default())
    }

    /// Create a table accepting only `config.enabled_types`
    pub fn with_config(name: &str, specs: &[ColumnSpec<'_>], config: &Config) -> Result<Self> {
        let mut table = Self::blank(config.enabled_types);
        table.initialize(name, specs)?;
        Ok(table)
    }

    fn blank(types: TypeSet) -> Self {
        Self {
            name: Name::EMPTY,
            columns: [Column::UNUSED; MAX_COLUMNS],
            column_count: 0,
            high_water: 0,
            tombstones: Tombstones::EMPTY,
            free_list: FreeList::EMPTY,
            pk_index: PkIndex::EMPTY,
            types,
        }
    }

    /// Reset this storage to an empty table with the given schema.
    ///
    /// Names are truncated to `MAX_NAME_LEN - 1` bytes and specs past
    /// `MAX_COLUMNS` are ignored. The schema must start with an `Int`
    /// primary-key column; otherwise nothing is changed.
    pub fn initialize(&mut self, name: &str, specs: &[ColumnSpec<'_>]) -> Result<()> {
        let first = specs
            .first()
            .ok_or_else(|| TableError::Invalid("a table needs at least one column".into()))?;
        if first.column_type != ColumnType::Int {
            return Err(TableError::Invalid(format!(
                "primary key column '{}' must be int, got {}",
                first.name, first.column_type
            )));
        }
        if specs.len() > MAX_COLUMNS {
            tracing::debug!(
                "Table '{}': {} column specs truncated to {}",
                name,
                specs.len(),
                MAX_COLUMNS
            );
        }

        let specs = &specs[..specs.len().min(MAX_COLUMNS)];
        self.name = Name::new(name);
        for (i, column) in self.columns.iter_mut().enumerate() {
            *column = match specs.get(i) {
                Some(spec) => Column::new(spec.name, spec.column_type),
                None => Column::UNUSED,
            };
        }
        self.column_count = specs.len();
        self.high_water = 0;
        self.tombstones.reset();
        self.free_list.clear();
        self.pk_index.clear();
        Ok(())
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn fixed_name(&self) -> &Name {
        &self.name
    }

    /// Declared columns, in order
    pub fn columns(&self) -> &[Column] {
        &self.columns[..self.column_count]
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Position of the column called `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns().iter().position(|c| *c.fixed_name() == *name)
    }

    pub fn enabled_types(&self) -> TypeSet {
        self.types
    }

    /// Row capacity (compile-time ceiling)
    pub fn capacity(&self) -> usize {
        MAX_ROWS
    }

    pub fn high_water_mark(&self) -> usize {
        self.high_water
    }

    /// Rows currently live
    pub fn live_count(&self) -> usize {
        self.high_water - self.tombstones.count_below(self.high_water)
    }

    /// Reclaimed slots waiting for reuse
    pub fn free_slots(&self) -> usize {
        self.free_list.len()
    }

    pub fn is_deleted(&self, slot: usize) -> bool {
        self.tombstones.is_set(slot)
    }

    pub fn is_live(&self, slot: usize) -> bool {
        slot < self.high_water && !self.tombstones.is_set(slot)
    }

    /// Live slots in ascending order
    pub fn live_slots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.high_water).filter(move |&slot| !self.tombstones.is_set(slot))
    }

    pub fn tombstones(&self) -> &Tombstones {
        &self.tombstones
    }

    // =========================================================================
    // Cell Access
    // =========================================================================

    /// Cell at (`column`, `slot`), live or not. `None` past the high-water
    /// mark or the declared columns.
    pub fn value(&self, column: usize, slot: usize) -> Option<Value<'_>> {
        if slot >= self.high_water {
            return None;
        }
        self.columns().get(column)?.data().get(slot)
    }

    /// Cell by column name
    pub fn get(&self, column: &str, slot: usize) -> Option<Value<'_>> {
        self.value(self.column_index(column)?, slot)
    }

    pub fn int(&self, column: usize, slot: usize) -> Option<i32> {
        match self.value(column, slot)? {
            Value::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn text(&self, column: usize, slot: usize) -> Option<&str> {
        match self.value(column, slot)? {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn bool(&self, column: usize, slot: usize) -> Option<bool> {
        match self.value(column, slot)? {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn float(&self, column: usize, slot: usize) -> Option<f32> {
        match self.value(column, slot)? {
            Value::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn double(&self, column: usize, slot: usize) -> Option<f64> {
        match self.value(column, slot)? {
            Value::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn pointer(&self, column: usize, slot: usize) -> Option<Handle> {
        match self.value(column, slot)? {
            Value::Pointer(h) => Some(h),
            _ => None,
        }
    }

    /// Printable view of one row
    pub fn row(&self, slot: usize) -> RowView<'_> {
        RowView::new(self, slot)
    }

    // =========================================================================
    // Row Lifecycle
    // =========================================================================

    /// Insert one row, returning its slot.
    ///
    /// Steps:
    /// 1. Validate arity, enabled types and value types
    /// 2. Pick a slot (free list first, then the next unused slot)
    /// 3. Register the primary key (rejects duplicates)
    /// 4. Write the cells and clear the tombstone
    ///
    /// Nothing is changed if any step fails.
    pub fn insert(&mut self, values: &[Value<'_>]) -> Result<usize> {
        if values.len() != self.column_count {
            return Err(TableError::Invalid(format!(
                "expected {} values, got {}",
                self.column_count,
                values.len()
            )));
        }

        let mut cells = [Cell::Int(0); MAX_COLUMNS];
        for (i, (column, value)) in self.columns().iter().zip(values).enumerate() {
            self.types.check(column.column_type())?;
            cells[i] = Cell::for_insert(column.column_type(), *value)?;
        }
        let Cell::Int(key) = cells[PRIMARY_KEY_COLUMN] else {
            return Err(TableError::Invalid("primary key must be an int".into()));
        };

        let slot = match self.free_list.peek() {
            Some(slot) => slot,
            None if self.high_water < MAX_ROWS => self.high_water,
            None => return Err(TableError::Full),
        };

        let resolve = live_key(&self.columns, &self.tombstones);
        self.pk_index.insert(key, slot, resolve)?;

        if self.free_list.pop().is_none() {
            self.high_water += 1;
        }
        for (column, cell) in self.columns[..self.column_count].iter_mut().zip(&cells) {
            column.data_mut().store(slot, cell);
        }
        self.tombstones.clear(slot);

        tracing::trace!("Table '{}': inserted key {} at slot {}", self.name, key, slot);
        Ok(slot)
    }

    /// Slot of the live row with primary key `key`
    pub fn find_key(&self, key: i32) -> Option<usize> {
        self.pk_index
            .find(key, live_key(&self.columns, &self.tombstones))
    }

    /// Tombstone a live slot: unlink its key, set the bit, recycle the slot
    pub(crate) fn delete_slot(&mut self, slot: usize) {
        if !self.is_live(slot) {
            return;
        }
        if let ColumnData::Int(keys) = self.columns[PRIMARY_KEY_COLUMN].data() {
            let key = keys[slot];
            let resolve = live_key(&self.columns, &self.tombstones);
            self.pk_index.remove(key, resolve);
        }
        self.tombstones.set(slot);
        self.free_list.push(slot);
        tracing::trace!("Table '{}': deleted slot {}", self.name, slot);
    }

    /// Re-derive the hash index and free list from the tombstone bitmap.
    ///
    /// Needed after `load`, which restores neither. Fails with `Unsupported`
    /// if two live rows share a primary key; the table is unchanged then.
    pub fn reindex(&mut self) -> Result<()> {
        let mut pk_index = PkIndex::EMPTY;
        let mut free_list = FreeList::EMPTY;
        let resolve = live_key(&self.columns, &self.tombstones);

        for slot in 0..self.high_water {
            if self.tombstones.is_set(slot) {
                free_list.push(slot);
            } else if let Some(key) = resolve(slot) {
                pk_index.insert(key, slot, &resolve)?;
            }
        }

        tracing::debug!(
            "Table '{}': reindexed {} keys, {} free slots",
            self.name,
            pk_index.len(),
            free_list.len()
        );
        self.pk_index = pk_index;
        self.free_list = free_list;
        Ok(())
    }

    /// Restore persisted row state; hash index and free list start empty
    pub(crate) fn restore(&mut self, high_water: usize, tombstones: Tombstones) {
        self.high_water = high_water.min(MAX_ROWS);
        self.tombstones = tombstones;
        self.free_list.clear();
        self.pk_index.clear();
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("columns", &self.columns())
            .field("high_water", &self.high_water)
            .field("live", &self.live_count())
            .field("free", &self.free_list.len())
            .finish()
    }
}

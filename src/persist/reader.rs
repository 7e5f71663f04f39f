//! Snapshot Reader
//!
//! Reads a whole snapshot file and rebuilds the table from it.

use std::fs;
use std::path::Path;

use bytes::Buf;

use crate::column::{ColumnData, ColumnSpec, ColumnType, Name, Text};
use crate::config::Config;
use crate::error::{Result, TableError};
use crate::limits::{MAX_COLUMNS, MAX_NAME_LEN, MAX_ROWS, MAX_TEXT_LEN, TOMBSTONE_WORDS};
use crate::table::{Table, Tombstones};

use super::{COLUMN_META_SIZE, HEADER_SIZE, TOMBSTONE_SIZE};

/// Load a snapshot with the default configuration
pub fn load(path: impl AsRef<Path>) -> Result<Table> {
    load_with_config(path, &Config::default())
}

/// Load a snapshot; no table is returned unless the whole file parses
pub fn load_with_config(path: impl AsRef<Path>, config: &Config) -> Result<Table> {
    let path = path.as_ref();
    let image = fs::read(path)?;
    let table = decode(&image, config)?;
    tracing::debug!(
        "Table '{}': loaded {} bytes from {} (high-water {}, live {})",
        table.name(),
        image.len(),
        path.display(),
        table.high_water_mark(),
        table.live_count()
    );
    Ok(table)
}

/// Decode a snapshot image
pub fn decode(image: &[u8], config: &Config) -> Result<Table> {
    let mut buf = image;

    // Header
    ensure(&buf, HEADER_SIZE, "header")?;
    let name = read_name(&mut buf);
    let column_count = buf.get_i32_le();
    let high_water = buf.get_u64_le();

    let column_count = usize::try_from(column_count)
        .ok()
        .filter(|&n| (1..=MAX_COLUMNS).contains(&n))
        .ok_or_else(|| {
            TableError::Corrupt(format!(
                "column count {} outside 1..={}",
                column_count, MAX_COLUMNS
            ))
        })?;
    if high_water > MAX_ROWS as u64 {
        return Err(TableError::Corrupt(format!(
            "high-water mark {} exceeds capacity {}",
            high_water, MAX_ROWS
        )));
    }
    let high_water = high_water as usize;

    // Column metadata
    ensure(&buf, COLUMN_META_SIZE * column_count, "column metadata")?;
    let mut names = [Name::EMPTY; MAX_COLUMNS];
    let mut types = [ColumnType::Int; MAX_COLUMNS];
    for i in 0..column_count {
        names[i] = read_name(&mut buf);
        let tag = buf.get_i32_le();
        types[i] = ColumnType::from_tag(tag).ok_or_else(|| {
            TableError::Corrupt(format!("unknown type tag {} for column {}", tag, i))
        })?;
    }
    if types[0] != ColumnType::Int {
        return Err(TableError::Corrupt(format!(
            "primary key column has type {}",
            types[0]
        )));
    }

    let mut specs = [ColumnSpec::int(""); MAX_COLUMNS];
    for (spec, (column_name, &column_type)) in specs.iter_mut().zip(names.iter().zip(&types)) {
        *spec = ColumnSpec::new(column_name.as_str(), column_type);
    }
    let mut table = Table::with_config(name.as_str(), &specs[..column_count], config)?;

    // Tombstone bitmap
    ensure(&buf, TOMBSTONE_SIZE, "tombstone bitmap")?;
    let mut words = [0u64; TOMBSTONE_WORDS];
    for word in words.iter_mut() {
        *word = buf.get_u64_le();
    }

    // Column data
    for column in table.columns.iter_mut().take(column_count) {
        match column.data_mut() {
            ColumnData::Int(values) => {
                ensure(&buf, 4 * high_water, "int column data")?;
                for v in values[..high_water].iter_mut() {
                    *v = buf.get_i32_le();
                }
            }
            ColumnData::Text(values) => {
                ensure(&buf, MAX_TEXT_LEN * high_water, "text column data")?;
                for v in values[..high_water].iter_mut() {
                    *v = Text::from_bytes(&buf[..MAX_TEXT_LEN]);
                    buf.advance(MAX_TEXT_LEN);
                }
            }
            ColumnData::Bool(_)
            | ColumnData::Float(_)
            | ColumnData::Double(_)
            | ColumnData::Pointer(_) => {}
        }
    }

    let unpersisted = types[..column_count]
        .iter()
        .filter(|ty| super::row_width(**ty).is_none())
        .count();
    if unpersisted > 0 {
        tracing::warn!(
            "Table '{}': {} columns were not persisted and load zero-filled",
            table.name(),
            unpersisted
        );
    }
    if buf.has_remaining() {
        tracing::debug!(
            "Table '{}': ignoring {} trailing bytes",
            table.name(),
            buf.remaining()
        );
    }

    table.restore(high_water, Tombstones::from_words(words));
    if config.reindex_on_load {
        table.reindex()?;
    }
    Ok(table)
}

fn ensure(buf: &[u8], needed: usize, section: &str) -> Result<()> {
    if buf.remaining() < needed {
        return Err(TableError::Corrupt(format!(
            "truncated {}: need {} bytes, have {}",
            section,
            needed,
            buf.remaining()
        )));
    }
    Ok(())
}

fn read_name(buf: &mut &[u8]) -> Name {
    let name = Name::from_bytes(&buf[..MAX_NAME_LEN]);
    buf.advance(MAX_NAME_LEN);
    name
}

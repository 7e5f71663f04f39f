//! Snapshot Writer
//!
//! Encodes a table and writes it to disk in one piece.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::{BufMut, Bytes, BytesMut};

use crate::column::ColumnData;
use crate::error::Result;
use crate::table::Table;

use super::{row_width, COLUMN_META_SIZE, HEADER_SIZE, TOMBSTONE_SIZE};

/// Encode `table` into the snapshot layout
pub fn encode(table: &Table) -> Bytes {
    let high_water = table.high_water_mark();
    let data_size: usize = table
        .columns()
        .iter()
        .filter_map(|c| row_width(c.column_type()))
        .map(|width| width * high_water)
        .sum();
    let mut buf = BytesMut::with_capacity(
        HEADER_SIZE + COLUMN_META_SIZE * table.column_count() + TOMBSTONE_SIZE + data_size,
    );

    // Header
    buf.put_slice(table.fixed_name().as_bytes());
    buf.put_i32_le(table.column_count() as i32);
    buf.put_u64_le(high_water as u64);

    // Column metadata
    for column in table.columns() {
        buf.put_slice(column.fixed_name().as_bytes());
        buf.put_i32_le(column.column_type().tag());
    }

    // Tombstone bitmap
    for word in table.tombstones().words() {
        buf.put_u64_le(*word);
    }

    // Column data
    for column in table.columns() {
        match column.data() {
            ColumnData::Int(values) => {
                for v in &values[..high_water] {
                    buf.put_i32_le(*v);
                }
            }
            ColumnData::Text(values) => {
                for v in &values[..high_water] {
                    buf.put_slice(v.as_bytes());
                }
            }
            ColumnData::Bool(_)
            | ColumnData::Float(_)
            | ColumnData::Double(_)
            | ColumnData::Pointer(_) => {}
        }
    }

    buf.freeze()
}

/// Write a snapshot of `table` to `path`.
///
/// The image goes to a sibling `.tmp` file which is synced and renamed over
/// `path`. On failure the temporary file is removed and `path` is untouched.
pub fn save(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let image = encode(table);
    let tmp = tmp_path(path);

    let result = write_file(&tmp, &image).and_then(|()| Ok(fs::rename(&tmp, path)?));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result?;

    let skipped = table
        .columns()
        .iter()
        .filter(|c| row_width(c.column_type()).is_none())
        .count();
    if skipped > 0 {
        tracing::warn!(
            "Table '{}': {} columns have types that snapshots do not persist",
            table.name(),
            skipped
        );
    }
    tracing::debug!(
        "Table '{}': saved {} bytes to {}",
        table.name(),
        image.len(),
        path.display()
    );
    Ok(())
}

fn write_file(path: &Path, image: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    file.write_all(image)?;
    file.sync_all()?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

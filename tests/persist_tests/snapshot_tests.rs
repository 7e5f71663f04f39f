//! Tests for snapshot save/load
//!
//! These tests verify:
//! - Round-trip of schema, high-water mark, tombstones and Int/Text cells
//! - Exact byte layout of the encoded image
//! - Unpersisted column types come back zero-filled
//! - A loaded table has no hash index or free list until reindexed
//! - Truncated or malformed files are rejected as Corrupt
//! - Atomic writes leave no temporary file behind

use std::fs;

use tempfile::TempDir;
use tinycol::limits::{MAX_COLUMNS, MAX_NAME_LEN, MAX_ROWS, MAX_TEXT_LEN, TOMBSTONE_WORDS};
use tinycol::persist::{decode, encode};
use tinycol::{ColumnSpec, ColumnType, Config, Handle, Table, TableError, Value};

// =============================================================================
// Helper Functions
// =============================================================================

const HEADER_SIZE: usize = MAX_NAME_LEN + 4 + 8;
const COLUMN_META_SIZE: usize = MAX_NAME_LEN + 4;
const TOMBSTONE_SIZE: usize = TOMBSTONE_WORDS * 8;

fn people() -> Table {
    let mut table = Table::new(
        "people",
        &[
            ColumnSpec::int("id"),
            ColumnSpec::text("name"),
            ColumnSpec::int("age"),
        ],
    )
    .unwrap();
    for (id, name, age) in [(1, "Alice", 30), (2, "Bob", 22), (3, "Cara", 22)] {
        table
            .insert(&[Value::Int(id), Value::Text(name), Value::Int(age)])
            .unwrap();
    }
    table
}

fn setup_snapshot(table: &Table) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("people.tbl");
    tinycol::save(table, &path).unwrap();
    (temp_dir, path)
}

fn reindexing() -> Config {
    Config::builder().reindex_on_load(true).build()
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

#[test]
fn test_round_trip_restores_schema_and_rows() {
    let mut table = people();
    table.delete_where_eq("name", Value::Text("Bob")).unwrap();
    let (_dir, path) = setup_snapshot(&table);

    let loaded = tinycol::load(&path).unwrap();

    assert_eq!(loaded.name(), "people");
    assert_eq!(loaded.column_count(), 3);
    let columns: Vec<(&str, ColumnType)> = loaded
        .columns()
        .iter()
        .map(|c| (c.name(), c.column_type()))
        .collect();
    assert_eq!(
        columns,
        vec![
            ("id", ColumnType::Int),
            ("name", ColumnType::Text),
            ("age", ColumnType::Int),
        ]
    );
    assert_eq!(loaded.high_water_mark(), 3);
    assert_eq!(loaded.live_slots().collect::<Vec<_>>(), vec![0, 2]);
    assert!(loaded.is_deleted(1));
    assert_eq!(loaded.tombstones(), table.tombstones());
    for slot in 0..3 {
        assert_eq!(loaded.row(slot).to_string(), table.row(slot).to_string());
    }
}

#[test]
fn test_round_trip_empty_table() {
    let table = Table::new("empty", &[ColumnSpec::int("id")]).unwrap();
    let (_dir, path) = setup_snapshot(&table);

    let loaded = tinycol::load(&path).unwrap();

    assert_eq!(loaded.name(), "empty");
    assert_eq!(loaded.high_water_mark(), 0);
    assert_eq!(loaded.live_count(), 0);
}

#[test]
fn test_round_trip_full_table() {
    let mut table = Table::new("full", &[ColumnSpec::int("id"), ColumnSpec::text("tag")]).unwrap();
    for id in 0..MAX_ROWS as i32 {
        let tag = format!("row-{}", id);
        table.insert(&[Value::Int(id), Value::Text(&tag)]).unwrap();
    }
    let (_dir, path) = setup_snapshot(&table);

    let loaded = tinycol::load_with_config(&path, &reindexing()).unwrap();

    assert_eq!(loaded.live_count(), MAX_ROWS);
    assert_eq!(loaded.text(1, MAX_ROWS - 1), Some("row-255"));
    assert_eq!(loaded.find_key(128), Some(128));
}

#[test]
fn test_round_trip_widest_schema() {
    let names: Vec<String> = (0..MAX_COLUMNS).map(|i| format!("col{}", i)).collect();
    let specs: Vec<ColumnSpec<'_>> = names
        .iter()
        .enumerate()
        .map(|(i, n)| if i % 2 == 0 { ColumnSpec::int(n) } else { ColumnSpec::text(n) })
        .collect();
    let mut table = Table::new("wide", &specs).unwrap();
    let row: Vec<Value<'_>> = (0..MAX_COLUMNS)
        .map(|i| if i % 2 == 0 { Value::Int(i as i32) } else { Value::Text("t") })
        .collect();
    table.insert(&row).unwrap();
    let (_dir, path) = setup_snapshot(&table);

    let loaded = tinycol::load(&path).unwrap();

    assert_eq!(loaded.column_count(), MAX_COLUMNS);
    for (i, column) in loaded.columns().iter().enumerate() {
        assert_eq!(column.name(), names[i]);
        assert_eq!(column.column_type(), table.columns()[i].column_type());
    }
    assert_eq!(loaded.row(0).to_string(), table.row(0).to_string());
}

#[test]
fn test_save_overwrites_existing_snapshot() {
    let mut table = people();
    let (_dir, path) = setup_snapshot(&table);

    table.delete_where_eq("id", Value::Int(1)).unwrap();
    tinycol::save(&table, &path).unwrap();

    let loaded = tinycol::load(&path).unwrap();
    assert_eq!(loaded.live_count(), 2);
}

// =============================================================================
// Unpersisted State Tests
// =============================================================================

#[test]
fn test_loaded_table_has_empty_hash_index() {
    let table = people();
    let (_dir, path) = setup_snapshot(&table);

    let loaded = tinycol::load(&path).unwrap();

    assert_eq!(loaded.find_key(1), None);
    let mut visited = 0;
    loaded
        .select_where_eq("id", Value::Int(1), |_, _| visited += 1)
        .unwrap();
    assert_eq!(visited, 0);

    // scans on other columns still see the rows
    visited = 0;
    loaded
        .select_where_eq("age", Value::Int(22), |_, _| visited += 1)
        .unwrap();
    assert_eq!(visited, 2);
}

#[test]
fn test_loaded_table_does_not_reuse_deleted_slots() {
    let mut table = people();
    table.delete_where_eq("id", Value::Int(2)).unwrap();
    let (_dir, path) = setup_snapshot(&table);

    let mut loaded = tinycol::load(&path).unwrap();
    assert_eq!(loaded.free_slots(), 0);

    let slot = loaded
        .insert(&[Value::Int(9), Value::Text("Ivy"), Value::Int(40)])
        .unwrap();
    assert_eq!(slot, 3);
}

#[test]
fn test_reindex_on_load_restores_index_and_free_list() {
    let mut table = people();
    table.delete_where_eq("id", Value::Int(2)).unwrap();
    let (_dir, path) = setup_snapshot(&table);

    let mut loaded = tinycol::load_with_config(&path, &reindexing()).unwrap();

    assert_eq!(loaded.find_key(1), Some(0));
    assert_eq!(loaded.find_key(3), Some(2));
    assert_eq!(loaded.free_slots(), 1);

    let duplicate = loaded.insert(&[Value::Int(3), Value::Text("Dup"), Value::Int(1)]);
    assert!(matches!(duplicate, Err(TableError::Unsupported(_))));

    let slot = loaded
        .insert(&[Value::Int(9), Value::Text("Ivy"), Value::Int(40)])
        .unwrap();
    assert_eq!(slot, 1);
}

#[test]
fn test_manual_reindex_after_load() {
    let table = people();
    let (_dir, path) = setup_snapshot(&table);

    let mut loaded = tinycol::load(&path).unwrap();
    loaded.reindex().unwrap();

    assert_eq!(loaded.find_key(2), Some(1));
}

#[test]
fn test_unpersisted_types_load_zero_filled() {
    let mut table = Table::new(
        "mixed",
        &[
            ColumnSpec::int("id"),
            ColumnSpec::bool("on"),
            ColumnSpec::float("f"),
            ColumnSpec::double("d"),
            ColumnSpec::pointer("p"),
            ColumnSpec::text("label"),
        ],
    )
    .unwrap();
    table
        .insert(&[
            Value::Int(1),
            Value::Bool(true),
            Value::Float(1.5),
            Value::Double(2.5),
            Value::Pointer(Handle(0xabc)),
            Value::Text("kept"),
        ])
        .unwrap();
    let (_dir, path) = setup_snapshot(&table);

    let loaded = tinycol::load(&path).unwrap();

    assert_eq!(loaded.column_count(), 6);
    assert_eq!(loaded.columns()[2].column_type(), ColumnType::Float);
    assert_eq!(loaded.int(0, 0), Some(1));
    assert_eq!(loaded.bool(1, 0), Some(false));
    assert_eq!(loaded.float(2, 0), Some(0.0));
    assert_eq!(loaded.double(3, 0), Some(0.0));
    assert_eq!(loaded.pointer(4, 0), Some(Handle(0)));
    assert_eq!(loaded.text(5, 0), Some("kept"));
}

// =============================================================================
// Layout Tests
// =============================================================================

#[test]
fn test_encoded_size() {
    let table = people();

    let image = encode(&table);

    let data = 3 * (4 + MAX_TEXT_LEN + 4);
    assert_eq!(image.len(), HEADER_SIZE + 3 * COLUMN_META_SIZE + TOMBSTONE_SIZE + data);
}

#[test]
fn test_encoded_header_layout() {
    let mut table = people();
    table.delete_where_eq("id", Value::Int(2)).unwrap();

    let image = encode(&table);

    assert_eq!(&image[..6], b"people");
    assert!(image[6..MAX_NAME_LEN].iter().all(|&b| b == 0));
    assert_eq!(&image[MAX_NAME_LEN..MAX_NAME_LEN + 4], &3i32.to_le_bytes());
    assert_eq!(&image[MAX_NAME_LEN + 4..HEADER_SIZE], &3u64.to_le_bytes());

    let meta = &image[HEADER_SIZE..HEADER_SIZE + COLUMN_META_SIZE];
    assert_eq!(&meta[..2], b"id");
    assert_eq!(&meta[MAX_NAME_LEN..], &0i32.to_le_bytes());

    let text_meta = &image[HEADER_SIZE + COLUMN_META_SIZE..HEADER_SIZE + 2 * COLUMN_META_SIZE];
    assert_eq!(&text_meta[MAX_NAME_LEN..], &1i32.to_le_bytes());

    let bitmap = HEADER_SIZE + 3 * COLUMN_META_SIZE;
    assert_eq!(&image[bitmap..bitmap + 8], &0b10u64.to_le_bytes());

    let ids = bitmap + TOMBSTONE_SIZE;
    assert_eq!(&image[ids..ids + 4], &1i32.to_le_bytes());
    assert_eq!(&image[ids + 8..ids + 12], &3i32.to_le_bytes());
}

#[test]
fn test_decode_ignores_trailing_bytes() {
    let table = people();
    let mut image = encode(&table).to_vec();
    image.extend_from_slice(&[0xff; 17]);

    let loaded = decode(&image, &Config::default()).unwrap();

    assert_eq!(loaded.live_count(), 3);
    assert_eq!(loaded.text(1, 2), Some("Cara"));
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_truncated_images_are_corrupt() {
    let table = people();
    let image = encode(&table);

    for len in [0, HEADER_SIZE - 1, HEADER_SIZE + 10, image.len() - 1] {
        let result = decode(&image[..len], &Config::default());
        assert!(matches!(result, Err(TableError::Corrupt(_))), "len {}", len);
    }
}

#[test]
fn test_truncated_file_is_corrupt() {
    let table = people();
    let (_dir, path) = setup_snapshot(&table);
    let image = fs::read(&path).unwrap();
    fs::write(&path, &image[..image.len() / 2]).unwrap();

    let result = tinycol::load(&path);

    assert!(matches!(result, Err(TableError::Corrupt(_))));
}

#[test]
fn test_bad_column_count_is_corrupt() {
    let table = people();
    let mut image = encode(&table).to_vec();

    for count in [0i32, -1, 17, i32::MAX] {
        image[MAX_NAME_LEN..MAX_NAME_LEN + 4].copy_from_slice(&count.to_le_bytes());
        let result = decode(&image, &Config::default());
        assert!(matches!(result, Err(TableError::Corrupt(_))), "count {}", count);
    }
}

#[test]
fn test_bad_high_water_mark_is_corrupt() {
    let table = people();
    let mut image = encode(&table).to_vec();
    image[MAX_NAME_LEN + 4..HEADER_SIZE].copy_from_slice(&(MAX_ROWS as u64 + 1).to_le_bytes());

    let result = decode(&image, &Config::default());

    assert!(matches!(result, Err(TableError::Corrupt(_))));
}

#[test]
fn test_unknown_type_tag_is_corrupt() {
    let table = people();
    let mut image = encode(&table).to_vec();
    let tag = HEADER_SIZE + COLUMN_META_SIZE + MAX_NAME_LEN;
    image[tag..tag + 4].copy_from_slice(&9i32.to_le_bytes());

    let result = decode(&image, &Config::default());

    assert!(matches!(result, Err(TableError::Corrupt(_))));
}

#[test]
fn test_non_int_primary_key_is_corrupt() {
    let table = people();
    let mut image = encode(&table).to_vec();
    let tag = HEADER_SIZE + MAX_NAME_LEN;
    image[tag..tag + 4].copy_from_slice(&1i32.to_le_bytes());

    let result = decode(&image, &Config::default());

    assert!(matches!(result, Err(TableError::Corrupt(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();

    let result = tinycol::load(temp_dir.path().join("nope.tbl"));

    assert!(matches!(result, Err(TableError::Io(_))));
}

// =============================================================================
// Atomic Write Tests
// =============================================================================

#[test]
fn test_save_leaves_no_temporary_file() {
    let table = people();
    let (dir, path) = setup_snapshot(&table);

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();

    assert_eq!(entries.len(), 1);
    assert!(path.exists());
}

#[test]
fn test_save_to_missing_directory_fails_cleanly() {
    let table = people();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing").join("people.tbl");

    let result = tinycol::save(&table, &path);

    assert!(matches!(result, Err(TableError::Io(_))));
    assert!(!path.exists());
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

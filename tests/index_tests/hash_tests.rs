//! Tests for the primary-key hash index
//!
//! These tests verify:
//! - Hash lookups agree with a linear scan of the key column
//! - Deletes through any column unlink the key
//! - Colliding keys stay reachable after removals
//! - Long insert/delete churn does not exhaust the buckets

use tinycol::index::mix32;
use tinycol::limits::{HASH_SIZE, MAX_ROWS};
use tinycol::{ColumnSpec, Table, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn keyed_table() -> Table {
    Table::new("keys", &[ColumnSpec::int("id"), ColumnSpec::int("group")]).unwrap()
}

/// Live slot holding `key`, found without the hash index
fn scan_for_key(table: &Table, key: i32) -> Option<usize> {
    table.live_slots().find(|&slot| table.int(0, slot) == Some(key))
}

/// Keys whose home bucket is `bucket`
fn colliding_keys(bucket: usize, count: usize) -> Vec<i32> {
    (0..i32::MAX)
        .filter(|&k| mix32(k as u32) as usize & (HASH_SIZE - 1) == bucket)
        .take(count)
        .collect()
}

fn assert_index_matches_scan(table: &Table, keys: impl IntoIterator<Item = i32>) {
    for key in keys {
        assert_eq!(table.find_key(key), scan_for_key(table, key), "key {}", key);
    }
}

// =============================================================================
// Lookup Tests
// =============================================================================

#[test]
fn test_find_key_after_inserts() {
    let mut table = keyed_table();
    for (i, key) in [42, -7, 0, i32::MAX, i32::MIN].into_iter().enumerate() {
        table.insert(&[Value::Int(key), Value::Int(0)]).unwrap();
        assert_eq!(table.find_key(key), Some(i));
    }
    assert_eq!(table.find_key(43), None);
}

#[test]
fn test_select_on_primary_key_visits_one_row() {
    let mut table = keyed_table();
    for key in 0..10 {
        table.insert(&[Value::Int(key * 10), Value::Int(key)]).unwrap();
    }

    let mut visited = Vec::new();
    table
        .select_where_eq("id", Value::Int(70), |_, slot| visited.push(slot))
        .unwrap();
    assert_eq!(visited, vec![7]);

    visited.clear();
    table
        .select_where_eq("id", Value::Int(71), |_, slot| visited.push(slot))
        .unwrap();
    assert!(visited.is_empty());
}

#[test]
fn test_index_matches_scan_after_mixed_deletes() {
    let mut table = keyed_table();
    for i in 0..200 {
        let key = (i * 7919) % 10_007;
        table.insert(&[Value::Int(key), Value::Int(i % 5)]).unwrap();
    }

    for i in (0..200).step_by(3) {
        let key = (i * 7919) % 10_007;
        table.delete_where_eq("id", Value::Int(key)).unwrap();
    }
    table.delete_where_eq("group", Value::Int(2)).unwrap();

    assert_index_matches_scan(&table, (0..200).map(|i| (i * 7919) % 10_007));
}

// =============================================================================
// Collision Tests
// =============================================================================

#[test]
fn test_colliding_keys_survive_middle_removal() {
    let keys = colliding_keys(3, 5);
    let mut table = keyed_table();
    for &key in &keys {
        table.insert(&[Value::Int(key), Value::Int(0)]).unwrap();
    }

    table.delete_where_eq("id", Value::Int(keys[1])).unwrap();
    table.delete_where_eq("id", Value::Int(keys[3])).unwrap();

    assert_eq!(table.find_key(keys[0]), Some(0));
    assert_eq!(table.find_key(keys[1]), None);
    assert_eq!(table.find_key(keys[2]), Some(2));
    assert_eq!(table.find_key(keys[3]), None);
    assert_eq!(table.find_key(keys[4]), Some(4));
}

#[test]
fn test_colliding_key_reinserted_after_delete() {
    let keys = colliding_keys(HASH_SIZE - 1, 3);
    let mut table = keyed_table();
    for &key in &keys {
        table.insert(&[Value::Int(key), Value::Int(0)]).unwrap();
    }

    table.delete_where_eq("id", Value::Int(keys[0])).unwrap();
    let slot = table.insert(&[Value::Int(keys[0]), Value::Int(1)]).unwrap();

    assert_eq!(slot, 0);
    assert_index_matches_scan(&table, keys.iter().copied());
}

// =============================================================================
// Churn Tests
// =============================================================================

#[test]
fn test_insert_delete_churn_keeps_index_clean() {
    let mut table = keyed_table();
    for round in 0..(HASH_SIZE as i32 * 8) {
        table.insert(&[Value::Int(round), Value::Int(round % 2)]).unwrap();
        if round % 2 == 0 {
            table.delete_where_eq("id", Value::Int(round)).unwrap();
        } else {
            table.delete_where_eq("group", Value::Int(1)).unwrap();
        }
    }

    assert_eq!(table.live_count(), 0);
    assert_eq!(table.high_water_mark(), 1);
    assert_index_matches_scan(&table, 0..HASH_SIZE as i32 * 8);
}

#[test]
fn test_full_table_of_keys_resolves_every_key() {
    let mut table = keyed_table();
    for key in 0..MAX_ROWS as i32 {
        table.insert(&[Value::Int(key * 31), Value::Int(0)]).unwrap();
    }

    for key in 0..MAX_ROWS as i32 {
        assert_eq!(table.find_key(key * 31), Some(key as usize));
    }
}

#[test]
fn test_mix32_spreads_sequential_keys() {
    let buckets: std::collections::HashSet<usize> = (0..64u32)
        .map(|k| mix32(k) as usize & (HASH_SIZE - 1))
        .collect();
    assert!(buckets.len() > 48);
}

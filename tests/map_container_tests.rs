//! Tests for MapContainer
//!
//! These tests verify:
//! - Reservation by map size
//! - Absent values for reserved-but-unupdated keys
//! - Full deletion on remove
//! - Lifecycle (open/close) and the `size` metadata property

use slotkv::{Container, ErrorKind, MapContainer};

// =============================================================================
// Helper Functions
// =============================================================================

fn open_map() -> MapContainer<i32> {
    let mut map = MapContainer::new();
    map.open().unwrap();
    map
}

fn assert_kind<T>(result: slotkv::Result<T>, kind: ErrorKind) {
    match result {
        Ok(_) => panic!("expected {:?} error, got Ok", kind),
        Err(err) => assert_eq!(err.kind(), kind, "unexpected error: {}", err),
    }
}

// =============================================================================
// Basic Operations
// =============================================================================

#[test]
fn test_metadata_size() {
    let mut map = open_map();
    assert_eq!(map.metadata().unwrap().get_int_property("size", -1), 0);

    map.reserve().unwrap();
    map.update(0, 1).unwrap();

    assert_eq!(map.metadata().unwrap().get_int_property("size", -1), 1);
}

#[test]
fn test_reserve() {
    let mut map = open_map();

    assert_eq!(map.reserve().unwrap(), 0);
    assert_eq!(map.reserve().unwrap(), 1);
    assert_eq!(map.reserve().unwrap(), 2);
    assert_eq!(map.len(), 3);
}

#[test]
fn test_get_unupdated_key_is_absent() {
    let mut map = open_map();
    map.reserve().unwrap();
    map.reserve().unwrap();

    assert_eq!(map.get_optional(0).unwrap(), None);
    assert_eq!(map.get(1).unwrap(), 0); // absent reads as default through the trait

    map.update(0, 1).unwrap();
    assert_eq!(map.get_optional(0).unwrap(), Some(1));
    assert_eq!(map.get(0).unwrap(), 1);
}

#[test]
fn test_absent_is_distinct_from_default_value() {
    let mut map = open_map();
    map.reserve().unwrap();
    map.reserve().unwrap();

    map.update(1, 0).unwrap();

    assert_eq!(map.get_optional(0).unwrap(), None);
    assert_eq!(map.get_optional(1).unwrap(), Some(0));
}

#[test]
fn test_update() {
    let mut map = open_map();
    for _ in 0..3 {
        map.reserve().unwrap();
    }

    map.update(0, 1).unwrap();
    map.update(1, 2).unwrap();
    map.update(2, 3).unwrap();

    assert_eq!(map.get(0).unwrap(), 1);
    assert_eq!(map.get(1).unwrap(), 2);
    assert_eq!(map.get(2).unwrap(), 3);
}

#[test]
fn test_remove() {
    let mut map = open_map();
    map.reserve().unwrap();
    map.reserve().unwrap();
    map.update(0, 1).unwrap();

    map.remove(0).unwrap();

    assert_eq!(map.len(), 1);
    assert_kind(map.get(0), ErrorKind::NotFound);
    assert_kind(map.remove(0), ErrorKind::NotFound);
    assert_kind(map.update(0, 5), ErrorKind::NotFound);
}

#[test]
fn test_unreserved_keys_not_found() {
    let mut map = open_map();

    assert_kind(map.get(0), ErrorKind::NotFound);
    assert_kind(map.update(0, 1), ErrorKind::NotFound);
    assert_kind(map.remove(0), ErrorKind::NotFound);
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_closed_map_rejects_operations() {
    let mut map: MapContainer<i32> = MapContainer::new();

    assert!(!map.is_open());
    assert_kind(map.reserve(), ErrorKind::IllegalState);
    assert_kind(map.get(0), ErrorKind::IllegalState);
    assert_kind(map.metadata(), ErrorKind::IllegalState);
    assert_kind(map.close(), ErrorKind::IllegalState);
}

#[test]
fn test_double_open_fails() {
    let mut map = open_map();

    assert_kind(map.open(), ErrorKind::IllegalState);
}

#[test]
fn test_close_discards_entries() {
    let mut map = open_map();
    map.reserve().unwrap();
    map.update(0, 9).unwrap();

    map.close().unwrap();
    map.open().unwrap();

    assert!(map.is_empty());
    assert_kind(map.get(0), ErrorKind::NotFound);
    assert_eq!(map.reserve().unwrap(), 0);
}

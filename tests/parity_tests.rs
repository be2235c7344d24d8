//! Behavioral parity between SlotFileContainer and MapContainer
//!
//! Both containers run the same scripts through the `Container` trait. Where
//! they are expected to diverge (removal followed by reserve), the tests pin
//! down each side's behavior explicitly.

use slotkv::{Container, ErrorKind, LongSerializer, MapContainer, SlotFileContainer};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn file_store(temp_dir: &TempDir) -> SlotFileContainer<i64, LongSerializer> {
    let mut store = SlotFileContainer::with_prefix(temp_dir.path(), "parity", LongSerializer).unwrap();
    store.open().unwrap();
    store
}

fn map_store() -> MapContainer<i64> {
    let mut map = MapContainer::new();
    map.open().unwrap();
    map
}

/// Reserve/update/get/remove script without removal-then-reserve
fn run_script(container: &mut dyn Container<i64>) -> Vec<String> {
    let mut log = Vec::new();

    for i in 0..5i64 {
        let key = container.reserve().unwrap();
        log.push(format!("reserve {}", key));
        container.update(key, i * i - 3).unwrap();
    }

    for key in 0..6 {
        match container.get(key) {
            Ok(v) => log.push(format!("get {} = {}", key, v)),
            Err(e) => log.push(format!("get {} -> {:?}", key, e.kind())),
        }
    }

    container.remove(3).unwrap();
    log.push(format!("get 3 -> {:?}", container.get(3).unwrap_err().kind()));
    log.push(format!("remove 3 -> {:?}", container.remove(3).unwrap_err().kind()));
    log.push(format!("update 3 -> {:?}", container.update(3, 1).unwrap_err().kind()));
    log.push(format!("get 4 = {}", container.get(4).unwrap()));

    log
}

// =============================================================================
// Parity Tests
// =============================================================================

#[test]
fn test_same_script_same_observations() {
    let temp_dir = TempDir::new().unwrap();
    let mut file = file_store(&temp_dir);
    let mut map = map_store();

    let file_log = run_script(&mut file);
    let map_log = run_script(&mut map);

    assert_eq!(file_log, map_log);
    assert_eq!(file_log[5], "get 0 = -3");
    assert_eq!(file_log[10], "get 5 -> NotFound");
}

#[test]
fn test_unupdated_key_divergence() {
    let temp_dir = TempDir::new().unwrap();
    let mut file = file_store(&temp_dir);
    let mut map = map_store();

    let fk = file.reserve().unwrap();
    let mk = map.reserve().unwrap();

    // File store decodes the zeroed payload, map reports an absent value
    assert_eq!(file.get(fk).unwrap(), 0);
    assert_eq!(map.get_optional(mk).unwrap(), None);
}

#[test]
fn test_reserve_after_remove_diverges() {
    let temp_dir = TempDir::new().unwrap();
    let mut file = file_store(&temp_dir);
    let mut map = map_store();

    for container in [&mut file as &mut dyn Container<i64>, &mut map] {
        assert_eq!(container.reserve().unwrap(), 0);
        container.remove(0).unwrap();
    }

    // File store never reuses a key; the map counts by size and hands out 0 again
    assert_eq!(file.reserve().unwrap(), 1);
    assert_eq!(map.reserve().unwrap(), 0);

    assert_eq!(file.get(0).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(map.get_optional(0).unwrap(), None);
}

#[test]
fn test_map_key_collision_after_remove() {
    let mut map = map_store();

    map.reserve().unwrap();
    map.reserve().unwrap();
    map.update(1, 11).unwrap();
    map.remove(0).unwrap();

    // Size is 1, so the next key is 1 and overwrites the live entry
    assert_eq!(map.reserve().unwrap(), 1);
    assert_eq!(map.get_optional(1).unwrap(), None);
}

//! Benchmarks for SlotKV container operations

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use slotkv::{Container, FixedStringSerializer, LongSerializer, SlotFileContainer};
use tempfile::TempDir;

fn storage_benchmarks(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();

    // Reserve throughput (file grows by one slot per call)
    let mut reserve_store: SlotFileContainer<i64, _> =
        SlotFileContainer::with_prefix(temp_dir.path(), "reserve", LongSerializer).unwrap();
    reserve_store.open().unwrap();
    c.bench_function("reserve", |b| {
        b.iter(|| black_box(reserve_store.reserve().unwrap()))
    });

    // Update/get on a fixed key range
    let mut store: SlotFileContainer<String, _> =
        SlotFileContainer::with_prefix(temp_dir.path(), "rw", FixedStringSerializer::new(64))
            .unwrap();
    store.open().unwrap();
    let keys: Vec<u64> = (0..1024).map(|_| store.reserve().unwrap()).collect();
    let value = "x".repeat(48);

    let mut i = 0usize;
    c.bench_function("update", |b| {
        b.iter(|| {
            let key = keys[i % keys.len()];
            i += 1;
            store.update(key, value.clone()).unwrap();
        })
    });

    let mut j = 0usize;
    c.bench_function("get", |b| {
        b.iter(|| {
            let key = keys[j % keys.len()];
            j += 1;
            black_box(store.get(key).unwrap())
        })
    });

    store.close().unwrap();
    reserve_store.close().unwrap();
}

criterion_group!(benches, storage_benchmarks);
criterion_main!(benches);

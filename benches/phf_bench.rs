use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use perfect_kv::{BloomFilter, PhfTable};
use std::collections::HashMap;

fn create_test_data(size: usize) -> HashMap<String, String> {
    let mut data = HashMap::new();
    for i in 0..size {
        data.insert(
            format!("key-{:04x}-{:04x}", i / 256, i % 256),
            format!("value_{}", i),
        );
    }
    data
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for size in [100usize, 1_000, 10_000] {
        let data = create_test_data(size);
        group.bench_with_input(BenchmarkId::new("build", size), &size, |b, _| {
            b.iter(|| PhfTable::from_map(black_box(data.clone())).unwrap())
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [1_000usize, 100_000] {
        let data = create_test_data(size);
        let keys: Vec<String> = data.keys().cloned().collect();
        let table = PhfTable::from_map(data).unwrap();

        group.bench_with_input(BenchmarkId::new("get", size), &size, |b, _| {
            let mut key_idx: usize = 0;
            b.iter(|| {
                let key = &keys[key_idx % keys.len()];
                key_idx = key_idx.wrapping_add(1);
                black_box(table.get(black_box(key)).unwrap())
            })
        });
    }

    group.finish();
}

fn bench_bloom(c: &mut Criterion) {
    let mut group = c.benchmark_group("bloom");

    let keys: Vec<String> = (0..10_000).map(|i| format!("bloom-key-{i}")).collect();
    let mut filter = BloomFilter::new(keys.len(), 0.0001);
    for key in &keys {
        filter.add(key);
    }

    group.bench_function("contains_hit", |b| {
        let mut key_idx: usize = 0;
        b.iter(|| {
            let key = &keys[key_idx % keys.len()];
            key_idx = key_idx.wrapping_add(1);
            black_box(filter.contains(black_box(key)))
        })
    });

    group.bench_function("contains_miss", |b| {
        b.iter(|| black_box(filter.contains(black_box("definitely-absent-key"))))
    });

    group.finish();
}

criterion_group!(benches, bench_construction, bench_lookup, bench_bloom);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use red_black_map::red_black_tree::RedBlackMap;
use std::collections::BTreeMap;

const NUM_OF_OPERATIONS: usize = 1000;

fn random_pairs() -> Vec<(u32, u32)> {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    (0..NUM_OF_OPERATIONS)
        .map(|_| (rng.next_u32(), rng.next_u32()))
        .collect()
}

fn bench_btreemap_insert(c: &mut Criterion) {
    c.bench_function("bench btreemap insert", |b| {
        let pairs = random_pairs();
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &(key, val) in &pairs {
                map.insert(key, val);
            }
        })
    });
}

fn bench_red_black_map_insert(c: &mut Criterion) {
    c.bench_function("bench red_black_map insert", |b| {
        let pairs = random_pairs();
        b.iter(|| {
            let mut map = RedBlackMap::new();
            for &(key, val) in &pairs {
                map.insert(key, val);
            }
        })
    });
}

fn bench_btreemap_get(c: &mut Criterion) {
    let pairs = random_pairs();
    let map: BTreeMap<u32, u32> = pairs.iter().cloned().collect();

    c.bench_function("bench btreemap get", move |b| {
        b.iter(|| {
            for (key, _) in &pairs {
                black_box(map.get(key));
            }
        })
    });
}

fn bench_red_black_map_get(c: &mut Criterion) {
    let pairs = random_pairs();
    let map: RedBlackMap<u32, u32> = pairs.iter().cloned().collect();

    c.bench_function("bench red_black_map get", move |b| {
        b.iter(|| {
            for (key, _) in &pairs {
                black_box(map.get(key));
            }
        })
    });
}

fn bench_red_black_map_remove(c: &mut Criterion) {
    let pairs = random_pairs();

    c.bench_function("bench red_black_map remove", move |b| {
        b.iter(|| {
            let mut map: RedBlackMap<u32, u32> = pairs.iter().cloned().collect();
            for (key, _) in &pairs {
                black_box(map.remove(key));
            }
        })
    });
}

fn bench_red_black_map_bulk_load(c: &mut Criterion) {
    let mut pairs = random_pairs();
    pairs.sort();
    pairs.dedup_by_key(|pair| pair.0);

    c.bench_function("bench red_black_map bulk load", move |b| {
        b.iter(|| black_box(RedBlackMap::from_pairs(pairs.clone(), true)))
    });
}

fn bench_red_black_map_sorted_insert(c: &mut Criterion) {
    let mut pairs = random_pairs();
    pairs.sort();
    pairs.dedup_by_key(|pair| pair.0);

    c.bench_function("bench red_black_map sorted insert", move |b| {
        b.iter(|| black_box(RedBlackMap::from_pairs(pairs.clone(), false)))
    });
}

criterion_group!(
    benches,
    bench_btreemap_insert,
    bench_red_black_map_insert,
    bench_btreemap_get,
    bench_red_black_map_get,
    bench_red_black_map_remove,
    bench_red_black_map_bulk_load,
    bench_red_black_map_sorted_insert,
);
criterion_main!(benches);

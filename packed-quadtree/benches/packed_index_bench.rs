//! Packed quadtree benchmarks

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use packed_quadtree::{Envelope, MemoryQuadTree, OffsetBuffer, PackedIndex, PackedIndexBuilder};
use std::hint::black_box;
use std::io;

fn grid_tree(size: u32) -> MemoryQuadTree {
    let mut tree = MemoryQuadTree::new(Envelope::new(0.0, 0.0, 128.0, 128.0), 8);
    for i in 0..size {
        let x = f64::from(i % 100);
        let y = f64::from(i / 100);
        tree.insert(i, Envelope::new(x, y, x + 1.0, y + 1.0));
    }
    tree
}

fn grid_index(size: u32) -> PackedIndex {
    PackedIndexBuilder::new()
        .build(grid_tree(size).into_root(), |id: u32| -> io::Result<i64> {
            Ok(i64::from(id) * 100)
        })
        .unwrap()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("PackedIndex Build");

    for size in [100u32, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter_with_setup(
                || grid_tree(size),
                |tree| {
                    let index = PackedIndexBuilder::new()
                        .build(tree.into_root(), |id: u32| -> io::Result<i64> {
                            Ok(i64::from(id) * 100)
                        })
                        .unwrap();
                    black_box(index.len())
                },
            );
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("PackedIndex Search");
    let index = grid_index(10000);

    group.bench_function("small_window_10k", |b| {
        b.iter(|| {
            let query = Envelope::new(40.0, 40.0, 42.0, 42.0);
            black_box(index.search_offsets(&query).unwrap())
        });
    });

    group.bench_function("large_window_10k", |b| {
        b.iter(|| {
            let query = Envelope::new(25.0, 25.0, 75.0, 75.0);
            black_box(index.search_offsets(&query).unwrap())
        });
    });

    group.bench_function("reused_buffer_10k", |b| {
        let mut hits = OffsetBuffer::new();
        b.iter(|| {
            let query = Envelope::new(25.0, 25.0, 75.0, 75.0);
            index.search_into(&query, &mut hits).unwrap();
            black_box(hits.size())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_search);
criterion_main!(benches);

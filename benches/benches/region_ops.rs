// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_region::{Aabb2D, Region};

fn gen_grid_rects(n: usize, cell: i64, gap: i64) -> Vec<Aabb2D<i64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as i64 * (cell + gap);
            let y0 = y as i64 * (cell + gap);
            out.push(Aabb2D::from_xywh(x0, y0, cell, cell));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn below(&mut self, n: i64) -> i64 {
        (self.next_u64() % n as u64) as i64
    }
}

/// Damage-like input: many small rects scattered over a screen.
fn gen_random_rects(count: usize, screen: i64, max_side: i64, seed: u64) -> Vec<Aabb2D<i64>> {
    let mut rng = Rng::new(seed);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let x0 = rng.below(screen);
        let y0 = rng.below(screen);
        let w = 1 + rng.below(max_side);
        let h = 1 + rng.below(max_side);
        out.push(Aabb2D::from_xywh(x0, y0, w, h));
    }
    out
}

fn bench_add_rect(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_rect");
    for &n in &[16usize, 32, 64] {
        let rects = gen_grid_rects(n, 10, 2);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("disjoint_grid_n{}", n), |b| {
            b.iter(|| {
                let region: Region<i64> = rects.iter().copied().collect();
                black_box(region.band_count());
            });
        });
        let touching = gen_grid_rects(n, 10, 0);
        group.bench_function(format!("touching_grid_n{}", n), |b| {
            b.iter(|| {
                let region: Region<i64> = touching.iter().copied().collect();
                black_box(region.band_count());
            });
        });
    }
    for &count in &[256usize, 1024] {
        let rects = gen_random_rects(count, 2000, 120, 0xCAFE_F00D_DEAD_BEEF);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("random_damage_{}", count), |b| {
            b.iter(|| {
                let region: Region<i64> = rects.iter().copied().collect();
                black_box(region.area());
            });
        });
    }
    group.finish();
}

fn bench_algebra(c: &mut Criterion) {
    let mut group = c.benchmark_group("algebra");
    let a: Region<i64> = gen_random_rects(512, 2000, 120, 0xBADC_F00D_1234_5678)
        .into_iter()
        .collect();
    let b: Region<i64> = gen_random_rects(512, 2000, 120, 0xC1A5_7E55_9999_ABCD)
        .into_iter()
        .collect();
    group.bench_function("combine", |bench| {
        bench.iter_batched(
            || a.clone(),
            |mut r| {
                r.combine(&b);
                black_box(r);
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("subtract", |bench| {
        bench.iter_batched(
            || a.clone(),
            |mut r| {
                r.subtract(&b);
                black_box(r);
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("intersect", |bench| {
        bench.iter_batched(
            || a.clone(),
            |mut r| {
                r.intersect(&b);
                black_box(r);
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("subtract_with_overlap", |bench| {
        bench.iter_batched(
            || (a.clone(), Region::new()),
            |(mut r, mut overlap)| {
                r.subtract_with_overlap(&b, &mut overlap);
                black_box((r, overlap));
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let region: Region<i64> = gen_random_rects(1024, 2000, 120, 0xFACE_FEED_CAFE_BABE)
        .into_iter()
        .collect();
    let probes = gen_random_rects(256, 2000, 60, 0x1234_5678_9ABC_DEF0);
    group.throughput(Throughput::Elements(probes.len() as u64));
    group.bench_function("contains_point", |b| {
        b.iter(|| {
            let hits = probes
                .iter()
                .filter(|r| region.contains_point(r.min_x, r.min_y))
                .count();
            black_box(hits);
        });
    });
    group.bench_function("contains_rect", |b| {
        b.iter(|| {
            let hits = probes.iter().filter(|r| region.contains_rect(**r)).count();
            black_box(hits);
        });
    });
    group.bench_function("intersects_rect", |b| {
        b.iter(|| {
            let hits = probes.iter().filter(|r| region.intersects_rect(**r)).count();
            black_box(hits);
        });
    });
    group.bench_function("iterate_rects", |b| {
        b.iter(|| black_box(region.rects().count()));
    });
    group.finish();
}

criterion_group!(benches, bench_add_rect, bench_algebra, bench_queries);
criterion_main!(benches);

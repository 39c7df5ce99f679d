// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::num::NonZeroUsize;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Affine, Rect, Size, Vec2};
use understory_popup::{
    Feature, FeatureSnapshot, FlatOccupancy, GridOccupancy, LngLat, MercatorView, Occupancy,
    PopupManager, PopupOptions,
};

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
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// `count` ranked features scattered over a `width` x `height` plane.
fn gen_plane_features(count: usize, width: f64, height: f64) -> Vec<Feature<()>> {
    let mut rng = Rng::new(0x9E37_79B9_7F4A_7C15);
    (0..count)
        .map(|i| {
            let at = LngLat::new(rng.next_f64() * width, rng.next_f64() * height);
            let rank = 1.0 + (rng.next_f64() * 100.0).floor();
            Feature::new(i as u64, at, ()).with_rank(rank)
        })
        .collect()
}

/// `count` ranked features around Western Europe.
fn gen_geo_features(count: usize) -> Vec<Feature<()>> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    (0..count)
        .map(|i| {
            let at = LngLat::new(rng.next_f64() * 20.0 - 5.0, rng.next_f64() * 15.0 + 40.0);
            let rank = 1.0 + (rng.next_f64() * 100.0).floor();
            Feature::new(i as u64, at, ()).with_rank(rank)
        })
        .collect()
}

fn plane_snapshot(features: &[Feature<()>]) -> FeatureSnapshot<(), Affine> {
    let mut snapshot = FeatureSnapshot::new(Affine::IDENTITY);
    for f in features {
        snapshot.push("places", f.clone());
    }
    snapshot
}

fn bench_update_backends(c: &mut Criterion) {
    let options = PopupOptions {
        popup_size: Size::new(60.0, 20.0),
        max: NonZeroUsize::new(2000),
        ..PopupOptions::default()
    };

    let mut group = c.benchmark_group("popup_update_backends");
    for &n in &[100usize, 1_000, 5_000] {
        let features = gen_plane_features(n, 1920.0, 1080.0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(BenchmarkId::new("Flat", n), |b| {
            let mut m = PopupManager::new(plane_snapshot(&features), options.clone()).unwrap();
            b.iter(|| black_box(m.update()))
        });
        group.bench_function(BenchmarkId::new("Grid", n), |b| {
            let mut m =
                PopupManager::with_grid(plane_snapshot(&features), options.clone()).unwrap();
            b.iter(|| black_box(m.update()))
        });
    }
    group.finish();
}

fn bench_panning_session(c: &mut Criterion) {
    let features = gen_geo_features(3_000);
    let view = MercatorView::new(LngLat::new(5.0, 47.0), 6.0, Size::new(1280.0, 800.0));
    let mut snapshot = FeatureSnapshot::with_view(view);
    for f in &features {
        snapshot.push("cities", f.clone());
    }

    let mut group = c.benchmark_group("popup_panning");
    group.bench_function("Mercator/pan_and_update", |b| {
        let mut m = PopupManager::new(snapshot.clone(), PopupOptions::default()).unwrap();
        let mut step = 0_u32;
        b.iter(|| {
            step = step.wrapping_add(1);
            let dx = if step % 40 < 20 { 25.0 } else { -25.0 };
            m.source_mut()
                .projection_mut()
                .pan_by_view(Vec2::new(dx, 0.0));
            black_box(m.update())
        })
    });
    group.finish();
}

fn bench_occupancy_probe(c: &mut Criterion) {
    fn fill<O: Occupancy>(occupancy: &mut O, rects: &[Rect]) {
        occupancy.clear();
        for r in rects {
            if !occupancy.collides(r) {
                occupancy.insert(*r);
            }
        }
    }

    let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
    let rects: Vec<Rect> = (0..4_000)
        .map(|_| {
            let x = rng.next_f64() * 4000.0;
            let y = rng.next_f64() * 4000.0;
            Rect::new(x, y, x + 50.0, y + 20.0)
        })
        .collect();

    let mut group = c.benchmark_group("occupancy_greedy_fill");
    group.throughput(Throughput::Elements(rects.len() as u64));
    group.bench_function("Flat", |b| {
        let mut occupancy = FlatOccupancy::new();
        b.iter(|| {
            fill(&mut occupancy, &rects);
            black_box(occupancy.len())
        })
    });
    group.bench_function("Grid(50.)", |b| {
        let mut occupancy = GridOccupancy::new(50.0);
        b.iter(|| {
            fill(&mut occupancy, &rects);
            black_box(occupancy.len())
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_update_backends,
    bench_panning_session,
    bench_occupancy_probe
);
criterion_main!(benches);

//! Postcode resolution and loss stream benchmarks
//!
//! Measures:
//! - Quadtree point location over a subdivided grid
//! - Full postcode resolution (quadtree + polygon containment)
//! - Grouped stream encoding throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use geo_types::polygon;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rfoasis::{
    stream::write_body, LossRecord, PostcodeResolver, QuadTreeConfig,
};

/// Resolver whose root cells are split `depth` times, one square postcode per leaf
fn build_resolver(depth: u32) -> PostcodeResolver {
    let grid = QuadTreeConfig::default();
    let tree = grid.build().expect("default grid");
    let mut resolver = PostcodeResolver::new(tree);

    let splits = 1usize << depth;
    let half = grid.base_size / splits as f64;
    let mut postcode = 1000u32;

    for i in 0..grid.lat_dim {
        for j in 0..grid.lon_dim {
            let root_lat = grid.min_lat + 2.0 * i as f64 * grid.base_size;
            let root_lon = grid.min_lon + 2.0 * j as f64 * grid.base_size;
            for a in 0..splits {
                for b in 0..splits {
                    let lat = root_lat - grid.base_size + (2 * a + 1) as f64 * half;
                    let lon = root_lon - grid.base_size + (2 * b + 1) as f64 * half;
                    let cell_id = format!("c{postcode}");
                    resolver.load_cell(&cell_id, lat, lon, half);
                    resolver.add_candidate(&cell_id, postcode);
                    resolver.add_boundary(
                        postcode,
                        polygon![
                            (x: lon - half, y: lat - half),
                            (x: lon + half, y: lat - half),
                            (x: lon + half, y: lat + half),
                            (x: lon - half, y: lat + half),
                            (x: lon - half, y: lat - half),
                        ],
                    );
                    postcode += 1;
                }
            }
        }
    }
    resolver
}

fn random_points(count: usize) -> Vec<(f64, f64)> {
    let grid = QuadTreeConfig::default();
    let mut rng = StdRng::seed_from_u64(42);
    let extent_lat = 2.0 * grid.base_size * grid.lat_dim as f64;
    let extent_lon = 2.0 * grid.base_size * grid.lon_dim as f64;
    (0..count)
        .map(|_| {
            let lat = grid.min_lat - grid.base_size + rng.gen::<f64>() * extent_lat;
            let lon = grid.min_lon - grid.base_size + rng.gen::<f64>() * extent_lon;
            (lat, lon)
        })
        .collect()
}

fn bench_quadtree_lookup(c: &mut Criterion) {
    let points = random_points(10_000);
    let mut group = c.benchmark_group("quadtree_lookup");
    group.throughput(Throughput::Elements(points.len() as u64));

    for depth in [1u32, 3, 5] {
        let resolver = build_resolver(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &points, |b, points| {
            b.iter(|| {
                points
                    .iter()
                    .filter(|(lat, lon)| resolver.tree().lookup(*lat, *lon).is_some())
                    .count()
            })
        });
    }
    group.finish();
}

fn bench_postcode_resolution(c: &mut Criterion) {
    let points = random_points(10_000);
    let resolver = build_resolver(3);

    let mut group = c.benchmark_group("postcode_resolution");
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("depth_3", |b| {
        b.iter(|| {
            points
                .iter()
                .filter_map(|&(lat, lon)| resolver.postcode_at(black_box(lon), black_box(lat)))
                .count()
        })
    });
    group.finish();
}

fn bench_stream_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_encode");

    for samples in [10i32, 100] {
        let records: Vec<LossRecord> = (1..=1_000u32)
            .flat_map(|event| {
                (1..=10u32).flat_map(move |item| {
                    (-2..=samples)
                        .filter(|&sidx| sidx != 0)
                        .map(move |sidx| LossRecord::new(event, item, sidx, sidx as f32 * 1.5))
                })
            })
            .collect();

        group.throughput(Throughput::Bytes((records.len() * 8) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(samples), &records, |b, records| {
            let mut out = Vec::with_capacity(records.len() * 16);
            b.iter(|| {
                out.clear();
                write_body(&mut out, records, false).expect("write to Vec");
                black_box(out.len())
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_quadtree_lookup,
    bench_postcode_resolution,
    bench_stream_encode
);
criterion_main!(benches);

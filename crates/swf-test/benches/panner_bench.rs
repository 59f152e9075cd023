//! Benchmarks for direction interpolation and the pan service

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use swf_core::{ModelConfig, Point3, SphericalCoord};
use swf_mesh::{BaseMesh, BasePreset};
use swf_panner::{InterpolationEngine, PanService, PanServiceConfig, Payload, PositionPayload};
use swf_wavelet::Model;

fn engine() -> InterpolationEngine {
    let model = Model::build(
        &BaseMesh::Preset(BasePreset::Octahedron),
        &ModelConfig::default().with_depth(3),
    )
    .unwrap();
    InterpolationEngine::from_model(&model)
}

fn bench_single_direction(c: &mut Criterion) {
    let engine = engine();
    let direction = SphericalCoord::from_degrees(30.0, 70.0).to_cartesian();

    c.bench_function("weights_single", |b| {
        b.iter(|| engine.weights(black_box(&direction)).unwrap())
    });
}

fn bench_batch(c: &mut Criterion) {
    let engine = engine();
    let mut rng = StdRng::seed_from_u64(7);
    let directions: Vec<Point3> = (0..512)
        .map(|_| {
            SphericalCoord::from_degrees(rng.gen_range(-180.0..180.0), rng.gen_range(0.0..180.0))
                .to_cartesian()
        })
        .collect();

    c.bench_function("interpolate_batch_512", |b| {
        b.iter(|| engine.interpolate(black_box(&directions), 1).unwrap())
    });

    c.bench_function("interpolate_batch_512_hop8", |b| {
        b.iter(|| engine.interpolate(black_box(&directions), 8).unwrap())
    });
}

fn bench_handle(c: &mut Criterion) {
    let config = PanServiceConfig {
        model: ModelConfig::default().with_depth(3),
        ..PanServiceConfig::default()
    };
    let mut service = PanService::new(config).unwrap();
    let request = Payload::Position(PositionPayload::new(-60.0, 45.0)).encode();

    c.bench_function("service_handle", |b| {
        b.iter(|| {
            let reply = service.handle(black_box(&request)).unwrap();
            black_box(reply)
        })
    });
}

criterion_group!(benches, bench_single_direction, bench_batch, bench_handle);
criterion_main!(benches);

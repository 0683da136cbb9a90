//! Engine micro-benchmark.
//!
//! Measures throughput of the per-frame operations:
//! - compute_impact() on a sweeping voltage pair
//! - sample() of a Lissajous preset
//! - a full 2 s / 30 fps sequence
//! - beam_path() at display density

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use crt::params::SystemParameters;
use crt_engine::path::beam_path;
use crt_engine::{VoltageTriple, apply_preset, compute_impact, sample, sequence};

const P: SystemParameters = SystemParameters::STANDARD;
const DT: f64 = 1.0 / 30.0; // 30 fps

fn bench_compute_impact(c: &mut Criterion) {
    let mut frame = 0u64;

    c.bench_function("compute_impact", |b| {
        b.iter(|| {
            frame += 1;
            let t = frame as f64 * DT;
            let voltages = VoltageTriple::new(2000.0, 150.0 * t.sin(), 150.0 * t.cos());
            compute_impact(&P, black_box(&voltages))
        });
    });
}

fn bench_sample(c: &mut Criterion) {
    let Ok(config) = apply_preset("mariposa") else {
        return;
    };
    let mut frame = 0u64;

    c.bench_function("lissajous_sample", |b| {
        b.iter(|| {
            frame += 1;
            sample(&P, black_box(frame as f64 * DT), &config)
        });
    });
}

fn bench_sequence(c: &mut Criterion) {
    let Ok(config) = apply_preset("trebol") else {
        return;
    };

    c.bench_function("sequence_2s_30fps", |b| {
        b.iter(|| {
            sequence(&P, black_box(&config), 2.0, 30)
                .map(|frames| frames.map(|f| f.sample.vertical_voltage).sum::<f64>())
        });
    });
}

fn bench_beam_path(c: &mut Criterion) {
    let voltages = VoltageTriple::new(1500.0, 120.0, -80.0);

    c.bench_function("beam_path_32", |b| {
        b.iter(|| beam_path(&P, black_box(&voltages), 32));
    });
}

criterion_group!(
    benches,
    bench_compute_impact,
    bench_sample,
    bench_sequence,
    bench_beam_path,
);
criterion_main!(benches);

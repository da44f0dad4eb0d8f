mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use loop_track::curve::{compute_frames, ClosedCurve, FrameMode};
use loop_track::ribbon::{extrude_frames, RibbonConfig, RibbonProfile};

const SEGMENTS: [usize; 4] = [100, 300, 1000, 3000];

fn ellipse(n: usize) -> Vec<Vec3> {
    (0..n)
        .map(|i| {
            let a = i as f32 / n as f32 * std::f32::consts::TAU;
            Vec3::new(a.cos() * 300.0, (a * 3.0).sin() * 20.0, a.sin() * 200.0)
        })
        .collect()
}

fn curve_frames_benches(c: &mut Criterion) {
    let curve = ClosedCurve::new(ellipse(32)).expect("curve");

    for (label, mode) in [
        ("transported", FrameMode::Transported),
        ("frenet", FrameMode::Frenet),
        ("up", FrameMode::Up(Vec3::Y)),
    ] {
        let mut group = c.benchmark_group(format!("curve/frames/{label}"));
        for &segments in &SEGMENTS {
            group.throughput(common::rings_throughput(segments));
            group.bench_with_input(BenchmarkId::from_parameter(segments), &segments, |b, &s| {
                b.iter(|| {
                    let frames = compute_frames(&curve, s, mode);
                    black_box(frames.len());
                });
            });
        }
        group.finish();
    }
}

fn ribbon_extrude_benches(c: &mut Criterion) {
    let curve = ClosedCurve::new(ellipse(32)).expect("curve");

    for (label, profile) in [
        ("slab", RibbonProfile::Slab),
        (
            "shouldered",
            RibbonProfile::Shouldered {
                shoulder_width: 2.0,
            },
        ),
    ] {
        let mut group = c.benchmark_group(format!("ribbon/extrude/{label}"));
        for &segments in &SEGMENTS {
            let config = RibbonConfig::new(segments, 12.0, 1.0).with_profile(profile);
            let frames = compute_frames(&curve, segments, config.frame_mode);
            group.throughput(common::elements_throughput(
                config.vertex_count().unwrap_or(0),
            ));
            group.bench_with_input(BenchmarkId::from_parameter(segments), &segments, |b, _| {
                b.iter(|| {
                    let mesh = extrude_frames(&frames, &config).expect("mesh");
                    black_box(mesh.indices.len());
                });
            });
        }
        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = curve_frames_benches, ribbon_extrude_benches
}
criterion_main!(benches);

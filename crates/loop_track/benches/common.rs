use std::time::Duration;

use criterion::{Criterion, Throughput};

/// Mesh and path benches are slow per iteration; keep sampling short.
pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_millis(500);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(3);
pub const NOISE_THRESHOLD: f64 = 0.03;

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
        .noise_threshold(NOISE_THRESHOLD)
}

/// Throughput in generated items (points, frames or vertices).
pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Throughput in sample rings: a loop of `segments` has `segments + 1` of them.
pub fn rings_throughput(segments: usize) -> Throughput {
    elements_throughput(segments + 1)
}

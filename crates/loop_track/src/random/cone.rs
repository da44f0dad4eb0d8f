//! Uniform direction sampling inside a cone.
use std::f32::consts::TAU;

use glam::Vec3;
use rand::RngCore;

use crate::random::{rand01, rotation_between};

/// Draw a unit vector uniformly (by solid angle) within `max_angle_deg` of `forward`.
///
/// `cos θ` is interpolated linearly between `cos(max_angle)` and 1, the azimuth is
/// uniform, and the local sample is rotated from +Z onto `forward`. Exactly two values
/// are drawn from `rng`. A zero `forward` is treated as +Z.
pub fn sample_cone(forward: Vec3, max_angle_deg: f32, rng: &mut dyn RngCore) -> Vec3 {
    let forward = forward.normalize_or(Vec3::Z);
    let cos_max = max_angle_deg.to_radians().cos();
    let cos_theta = cos_max + (1.0 - cos_max) * rand01(rng);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = rand01(rng) * TAU;

    let local = Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta);
    let dir = rotation_between(Vec3::Z, forward) * local;
    dir.normalize_or(forward)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::random::angle_between;
    use crate::random::seed::SeededRng;

    #[test]
    fn zero_angle_returns_forward() {
        let mut rng = StdRng::seed_from_u64(3);
        let forward = Vec3::new(0.3, -0.2, 0.9).normalize();
        for _ in 0..64 {
            let dir = sample_cone(forward, 0.0, &mut rng);
            assert!((dir - forward).length() < 1e-5, "{dir:?} != {forward:?}");
        }
    }

    #[test]
    fn samples_stay_inside_cone_and_are_unit() {
        let mut rng = SeededRng::from_seed_str("cone");
        let forward = Vec3::new(1.0, 1.0, 0.0).normalize();
        for _ in 0..500 {
            let dir = sample_cone(forward, 35.0, &mut rng);
            assert!((dir.length() - 1.0).abs() < 1e-5);
            assert!(angle_between(forward, dir).to_degrees() <= 35.0 + 1e-3);
        }
    }

    #[test]
    fn antiparallel_forward_does_not_produce_nan() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let dir = sample_cone(-Vec3::Z, 20.0, &mut rng);
            assert!(dir.is_finite());
            assert!(angle_between(-Vec3::Z, dir).to_degrees() <= 20.0 + 1e-3);
        }
    }

    #[test]
    fn zero_forward_falls_back_to_z() {
        let mut rng = StdRng::seed_from_u64(5);
        let dir = sample_cone(Vec3::ZERO, 0.0, &mut rng);
        assert!((dir - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn cos_theta_is_uniform_over_cap() {
        // Solid-angle uniformity: half of the samples lie below the mid cosine.
        let mut rng = StdRng::seed_from_u64(99);
        let max = 60.0_f32;
        let mid_cos = (1.0 + max.to_radians().cos()) * 0.5;
        let n = 4_000;
        let inside = (0..n)
            .filter(|_| sample_cone(Vec3::Z, max, &mut rng).z >= mid_cos)
            .count();
        let ratio = inside as f32 / n as f32;
        assert!((ratio - 0.5).abs() < 0.05, "ratio {ratio}");
    }

    #[test]
    fn consumes_two_draws() {
        let mut a = SeededRng::new(1);
        let mut b = SeededRng::new(1);
        sample_cone(Vec3::X, 45.0, &mut a);
        b.next_u32();
        b.next_u32();
        assert_eq!(a, b);
    }
}

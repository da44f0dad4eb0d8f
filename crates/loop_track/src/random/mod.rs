//! Deterministic randomness for track generation.
//!
//! Every generator in this crate draws from a `&mut dyn RngCore`, so any [rand] source works.
//! Reproducible tracks use [`SeededRng`], a small 32-bit stream keyed by a string seed.
use glam::{Quat, Vec3};
use rand::RngCore;

pub mod cone;
pub mod seed;

pub use cone::sample_cone;
pub use seed::{hash_seed, SeededRng};

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    let value = (rng.next_u32() as f64 / 4_294_967_296.0) as f32;
    // Rounding to f32 can reach 1.0 for draws close to u32::MAX.
    value.min(next_down(1.0))
}

/// Uniform float in `[min, max)`.
#[inline]
pub(crate) fn rand_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + rand01(rng) * (max - min)
}

/// Compute the next smaller representable float value.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if val.is_nan() {
        return f32::NAN;
    }

    if val == f32::NEG_INFINITY {
        return f32::NEG_INFINITY;
    }

    if val == f32::INFINITY {
        return f32::MAX;
    }

    if val == 0.0 {
        return -f32::MIN_POSITIVE;
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f32::from_bits(bits.saturating_sub(1))
    } else {
        f32::from_bits(bits.saturating_add(1))
    }
}

/// Minimal rotation taking unit vector `from` onto unit vector `to`.
///
/// Antiparallel inputs rotate half a turn about an axis orthogonal to `from`, so the
/// result never contains NaN.
pub fn rotation_between(from: Vec3, to: Vec3) -> Quat {
    let from = from.normalize_or(Vec3::Z);
    let to = to.normalize_or(Vec3::Z);
    let dot = from.dot(to);
    if dot < -1.0 + 1e-6 {
        let axis = from.any_orthonormal_vector();
        return Quat::from_axis_angle(axis, std::f32::consts::PI);
    }
    Quat::from_rotation_arc(from, to)
}

/// Angle between two vectors in radians, `0` when either is degenerate.
#[inline]
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    let denom = (a.length_squared() * b.length_squared()).sqrt();
    if denom <= f32::EPSILON {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}

/// Signed angle in radians rotating `from` onto `to`, seen around `axis`.
///
/// Positive angles are counter-clockwise when looking down `-axis`.
#[inline]
pub fn signed_angle_between(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    axis.dot(from.cross(to)).atan2(from.dot(to))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) struct FixedRng {
        pub(crate) value: u32,
    }

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            self.value
        }

        fn next_u64(&mut self) -> u64 {
            self.value as u64
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 4];
            }
        }
    }

    #[test]
    fn rand01_returns_zero_for_zero_input() {
        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand01(&mut rng), 0.0);
    }

    #[test]
    fn rand01_stays_below_one_for_max_input() {
        let mut rng = FixedRng { value: u32::MAX };
        let result = rand01(&mut rng);
        assert!(result < 1.0);
        assert!(result > 0.999);
    }

    #[test]
    fn rand_range_maps_midpoint() {
        let mut rng = FixedRng {
            value: u32::MAX / 2,
        };
        let v = rand_range(&mut rng, -10.0, 10.0);
        assert!(v.abs() < 0.01);
    }

    #[test]
    fn next_down_handles_edge_cases() {
        assert!(next_down(1.0) < 1.0);
        assert_eq!(next_down(0.0), -f32::MIN_POSITIVE);
        assert!(next_down(-1.0) < -1.0);
        assert_eq!(next_down(f32::INFINITY), f32::MAX);
        assert!(next_down(f32::NAN).is_nan());
    }

    #[test]
    fn rotation_between_handles_antiparallel_vectors() {
        let q = rotation_between(Vec3::Z, -Vec3::Z);
        let rotated = q * Vec3::Z;
        assert!(rotated.is_finite());
        assert!((rotated + Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn rotation_between_maps_axis() {
        let target = Vec3::new(1.0, 2.0, -0.5).normalize();
        let rotated = rotation_between(Vec3::Z, target) * Vec3::Z;
        assert!((rotated - target).length() < 1e-5);
    }

    #[test]
    fn angle_between_is_zero_for_degenerate_input() {
        assert_eq!(angle_between(Vec3::ZERO, Vec3::X), 0.0);
        let right = angle_between(Vec3::X, Vec3::Y);
        assert!((right - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn signed_angle_follows_axis_orientation() {
        let quarter = std::f32::consts::FRAC_PI_2;
        assert!((signed_angle_between(Vec3::X, Vec3::Y, Vec3::Z) - quarter).abs() < 1e-6);
        assert!((signed_angle_between(Vec3::X, Vec3::Y, -Vec3::Z) + quarter).abs() < 1e-6);
        assert_eq!(signed_angle_between(Vec3::X, Vec3::X, Vec3::Z), 0.0);
    }
}

//! Wander path: an accumulating heading/pitch walk closed by a steered return path.
use glam::Vec3;
use rand::RngCore;
use tracing::debug;

use crate::error::{Error, Result};
use crate::path::{ensure_angle, ensure_positive, Closure, GeneratedPath, PathGenerator};
use crate::random::{rand_range, sample_cone};

/// Default step budget for the closing path.
pub const DEFAULT_MAX_CLOSING_STEPS: usize = 1_000;

/// Minimum blend toward the start while closing.
const CLOSING_BIAS_MIN: f32 = 0.1;
/// Extra blend gained as the closing path nears the start.
const CLOSING_BIAS_GAIN: f32 = 0.5;

/// Wander path configuration.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct WanderPath {
    /// Points of the open walk, including the start at the origin.
    pub num_points: usize,
    /// Maximum heading and pitch change per step, in degrees.
    pub max_angle_deg: f32,
    /// Distance between consecutive points.
    pub distance_step: f32,
    /// Step budget for the closing path.
    pub max_closing_steps: usize,
}

impl Default for WanderPath {
    fn default() -> Self {
        Self {
            num_points: 50,
            max_angle_deg: 60.0,
            distance_step: 10.0,
            max_closing_steps: DEFAULT_MAX_CLOSING_STEPS,
        }
    }
}

impl WanderPath {
    pub fn new(num_points: usize, max_angle_deg: f32, distance_step: f32) -> Self {
        Self {
            num_points,
            max_angle_deg,
            distance_step,
            ..Default::default()
        }
    }

    pub fn with_max_closing_steps(mut self, max_closing_steps: usize) -> Self {
        self.max_closing_steps = max_closing_steps;
        self
    }

    fn open_walk(&self, rng: &mut dyn RngCore) -> Vec<Vec3> {
        let mut points = Vec::with_capacity(self.num_points);
        points.push(Vec3::ZERO);
        let mut heading = 0.0_f32;
        let mut pitch = 0.0_f32;
        let max = self.max_angle_deg;

        for _ in 1..self.num_points {
            heading += rand_range(rng, -max, max);
            pitch += rand_range(rng, -max, max);
            let (h, p) = (heading.to_radians(), pitch.to_radians());
            let last = points[points.len() - 1];
            points.push(last + Vec3::new(h.cos(), h.sin(), p.sin()) * self.distance_step);
        }
        points
    }

    /// Walk from the end of `points` back to its first point.
    ///
    /// Returns the appended points and whether the start was reached.
    fn closing_path(&self, points: &[Vec3], rng: &mut dyn RngCore) -> (Vec<Vec3>, bool) {
        let step = self.distance_step;
        let target = points[0];
        let last = points[points.len() - 1];
        let penultimate = points[points.len() - 2];
        let open_direction = (points[1] - points[0]).normalize_or(Vec3::Z);

        let mut path = Vec::new();
        let mut current = last;
        let mut forward = (last - penultimate).normalize_or(open_direction);
        let initial_distance = current.distance(target).max(f32::EPSILON);

        for _ in 0..self.max_closing_steps {
            let d = current.distance(target);
            if d <= step {
                return (path, true);
            }
            let progress = 1.0 - (d / initial_distance).min(1.0);
            let bias = CLOSING_BIAS_MIN + CLOSING_BIAS_GAIN * progress;
            let to_target = (target - current).normalize_or(forward);
            forward = forward.lerp(to_target, bias).normalize_or(to_target);

            let candidate = current + sample_cone(forward, self.max_angle_deg, rng) * step;
            if candidate.distance(target) < step {
                let back = sample_cone(-open_direction, self.max_angle_deg, rng);
                path.push(target + back * step);
                return (path, true);
            }
            current = candidate;
            path.push(current);
        }

        let reached = current.distance(target) <= step;
        (path, reached)
    }
}

impl PathGenerator for WanderPath {
    fn name(&self) -> &'static str {
        "wander"
    }

    fn validate(&self) -> Result<()> {
        if self.num_points < 4 {
            return Err(Error::InvalidConfig(format!(
                "num_points must be >= 4 (got {})",
                self.num_points
            )));
        }
        ensure_angle("max_angle_deg", self.max_angle_deg)?;
        ensure_positive("distance_step", self.distance_step)?;
        if self.max_closing_steps == 0 {
            return Err(Error::InvalidConfig(
                "max_closing_steps must be >= 1".into(),
            ));
        }
        Ok(())
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Result<GeneratedPath> {
        self.validate()?;

        let mut points = self.open_walk(rng);
        let (closing, reached) = self.closing_path(&points, rng);
        if !reached {
            return Err(Error::ClosureFailed {
                attempts: self.max_closing_steps,
            });
        }
        let closing_len = closing.len();
        points.extend(closing);
        points.push(points[0]);

        debug!(
            "Wander path of {} points closed with {} extra points.",
            points.len(),
            closing_len
        );
        Ok(GeneratedPath::new(points, Closure::RepeatedStart).with_attempts(closing_len))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::random::SeededRng;

    #[test]
    fn hanna_reference_loop_closes_on_start() {
        let wander = WanderPath::new(50, 60.0, 10.0);
        let mut rng = SeededRng::from_seed_str("hanna");
        let path = wander.generate(&mut rng).expect("closes");

        let first = path.points[0];
        let last = *path.points.last().unwrap();
        assert!(first.distance(last) < 1e-5);
        assert!(path.points.len() > 50);
        assert!(path.points.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn open_walk_moves_by_distance_step_horizontally() {
        let wander = WanderPath::new(20, 30.0, 4.0);
        let mut rng = StdRng::seed_from_u64(3);
        let walk = wander.open_walk(&mut rng);
        assert_eq!(walk.len(), 20);
        for w in walk.windows(2) {
            let d = w[1] - w[0];
            let horizontal = (d.x * d.x + d.y * d.y).sqrt();
            assert!((horizontal - 4.0).abs() < 1e-3);
        }
    }

    #[test]
    fn closing_points_stay_one_step_apart() {
        let wander = WanderPath::new(30, 45.0, 5.0);
        let mut rng = StdRng::seed_from_u64(21);
        let path = wander.generate(&mut rng).expect("closes");
        // Closing steps (after the open walk, before the final pair) are exactly one step long.
        let n = path.points.len();
        for i in 30..n.saturating_sub(2) {
            let d = path.points[i].distance(path.points[i - 1]);
            assert!((d - 5.0).abs() < 1e-3, "closing step {i} is {d}");
        }
        // The last generated point sits within one step of the start.
        assert!(path.points[n - 2].distance(path.points[0]) <= 5.0 + 1e-3);
    }

    #[test]
    fn tiny_budget_reports_closure_failure() {
        let wander = WanderPath::new(40, 10.0, 10.0).with_max_closing_steps(1);
        let mut rng = StdRng::seed_from_u64(9);
        match wander.generate(&mut rng) {
            Err(Error::ClosureFailed { attempts }) => assert_eq!(attempts, 1),
            Ok(path) => {
                // Only possible when the walk already ends next to the start.
                assert!(path.points.len() <= 42);
            }
            Err(other) => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(WanderPath::new(3, 60.0, 10.0).validate().is_err());
        assert!(WanderPath::new(10, 60.0, 0.0).validate().is_err());
        assert!(WanderPath::new(10, f32::NAN, 1.0).validate().is_err());
        assert!(WanderPath::default().validate().is_ok());
    }
}

//! Growth path: a steered random walk with self-proximity rejection.
use glam::{Quat, Vec3};
use rand::RngCore;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::path::{
    collides, ensure_angle, ensure_positive, Anchors, Closure, GeneratedPath, PathGenerator,
};
use crate::random::{rand01, rand_range, sample_cone};

/// Default number of candidates drawn per point before the proximity fallback applies.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;
/// Default length of the straight approach appended before the loop closes.
pub const DEFAULT_APPROACH_LENGTH: f32 = 5.0;

/// Share of the previous direction kept when steering back toward the target.
const STEER_KEEP: f32 = 0.8;
/// Share of the direction toward the target when steering.
const STEER_PULL: f32 = 0.2;
/// Inertia applied by [`TurnModel::Planar`] toward the previous direction.
const PLANAR_INERTIA: f32 = 0.3;
/// Pitch range of [`TurnModel::Planar`] relative to its yaw range.
const PLANAR_PITCH_SCALE: f32 = 0.25;

/// How a new direction deviates from the previous one.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TurnModel {
    /// Solid-angle uniform deviation inside a cone.
    #[default]
    Cone,
    /// Yaw about +Y up to the angle, pitch up to a quarter of it, blended with the
    /// previous direction. Keeps tracks mostly flat.
    Planar,
}

impl TurnModel {
    fn turn(self, dir: Vec3, prev: Vec3, max_angle_deg: f32, rng: &mut dyn RngCore) -> Vec3 {
        match self {
            TurnModel::Cone => sample_cone(dir, max_angle_deg, rng),
            TurnModel::Planar => {
                let max = max_angle_deg.to_radians();
                let yaw = (rand01(rng) * 2.0 - 1.0) * max;
                let pitch = (rand01(rng) * 2.0 - 1.0) * max * PLANAR_PITCH_SCALE;
                let side = Vec3::new(-dir.z, 0.0, dir.x).normalize_or(Vec3::X);
                let yawed = Quat::from_rotation_y(yaw) * dir;
                let turned = Quat::from_axis_angle(side, pitch) * yawed;
                turned
                    .normalize_or(dir)
                    .lerp(prev, PLANAR_INERTIA)
                    .normalize_or(dir)
            }
        }
    }
}

/// What happens when no candidate clears the proximity threshold within the attempt cap.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProximityPolicy {
    /// Accept the last candidate and record its index in
    /// [`GeneratedPath::forced_indices`].
    #[default]
    AcceptLast,
    /// Fail with [`Error::ProximityExhausted`].
    Fail,
}

/// Growth path configuration.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthPath {
    /// Points before the approach segment, including the start anchor.
    pub num_points: usize,
    /// Maximum turn per step during the free first half, in degrees.
    pub max_angle_deg: f32,
    /// Maximum turn per step while steering back, in degrees.
    pub bias_angle_deg: f32,
    /// Shortest step length.
    pub min_step: f32,
    /// Longest step length.
    pub max_step: f32,
    /// Road width used for the proximity threshold.
    pub road_width: f32,
    /// Extra clearance added to the road width.
    pub buffer: f32,
    /// Start point and optional steering target.
    pub anchors: Anchors,
    /// Candidates drawn per point.
    pub max_attempts: usize,
    /// Length of the straight approach toward the start.
    pub approach_length: f32,
    pub turn_model: TurnModel,
    pub proximity_policy: ProximityPolicy,
}

impl Default for GrowthPath {
    fn default() -> Self {
        Self {
            num_points: 30,
            max_angle_deg: 70.0,
            bias_angle_deg: 40.0,
            min_step: 30.0,
            max_step: 60.0,
            road_width: 12.0,
            buffer: 5.0,
            anchors: Anchors::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            approach_length: DEFAULT_APPROACH_LENGTH,
            turn_model: TurnModel::Cone,
            proximity_policy: ProximityPolicy::AcceptLast,
        }
    }
}

impl GrowthPath {
    /// Create a growth path with `num_points` points and default shape parameters.
    pub fn new(num_points: usize) -> Self {
        Self {
            num_points,
            ..Default::default()
        }
    }

    /// Sets the free and steering turn angles in degrees.
    pub fn with_angles(mut self, max_angle_deg: f32, bias_angle_deg: f32) -> Self {
        self.max_angle_deg = max_angle_deg;
        self.bias_angle_deg = bias_angle_deg;
        self
    }

    /// Sets the step length range.
    pub fn with_steps(mut self, min_step: f32, max_step: f32) -> Self {
        self.min_step = min_step;
        self.max_step = max_step;
        self
    }

    /// Sets the road width and clearance buffer.
    pub fn with_clearance(mut self, road_width: f32, buffer: f32) -> Self {
        self.road_width = road_width;
        self.buffer = buffer;
        self
    }

    pub fn with_anchors(mut self, anchors: Anchors) -> Self {
        self.anchors = anchors;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_approach_length(mut self, approach_length: f32) -> Self {
        self.approach_length = approach_length;
        self
    }

    pub fn with_turn_model(mut self, turn_model: TurnModel) -> Self {
        self.turn_model = turn_model;
        self
    }

    pub fn with_proximity_policy(mut self, policy: ProximityPolicy) -> Self {
        self.proximity_policy = policy;
        self
    }

    /// Minimum distance between non-adjacent points.
    pub fn clearance(&self) -> f32 {
        self.road_width + self.buffer
    }
}

impl PathGenerator for GrowthPath {
    fn name(&self) -> &'static str {
        "growth"
    }

    fn validate(&self) -> Result<()> {
        if self.num_points < 4 {
            return Err(Error::InvalidConfig(format!(
                "num_points must be >= 4 (got {})",
                self.num_points
            )));
        }
        ensure_angle("max_angle_deg", self.max_angle_deg)?;
        ensure_angle("bias_angle_deg", self.bias_angle_deg)?;
        ensure_positive("min_step", self.min_step)?;
        ensure_positive("max_step", self.max_step)?;
        if self.min_step > self.max_step {
            return Err(Error::InvalidConfig(format!(
                "min_step ({}) must not exceed max_step ({})",
                self.min_step, self.max_step
            )));
        }
        ensure_positive("road_width", self.road_width)?;
        if !self.buffer.is_finite() || self.buffer < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "buffer must be finite and >= 0 (got {})",
                self.buffer
            )));
        }
        ensure_positive("approach_length", self.approach_length)?;
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("max_attempts must be >= 1".into()));
        }
        if !self.anchors.start.is_finite() || !self.anchors.steer_target().is_finite() {
            return Err(Error::InvalidConfig("anchors must be finite".into()));
        }
        Ok(())
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Result<GeneratedPath> {
        self.validate()?;

        let start = self.anchors.start;
        let target = self.anchors.steer_target();
        let threshold = self.clearance();
        let final_count = self.num_points - 1;

        let mut points = Vec::with_capacity(self.num_points + 1);
        points.push(start);
        let mut current = start;
        let mut direction = self.anchors.initial_direction();
        let mut forced = Vec::new();
        let mut total_attempts = 0usize;

        for i in 1..final_count {
            let steering = 2 * i >= final_count;
            let mut candidate = current;
            let mut accepted = false;

            for _ in 0..self.max_attempts {
                total_attempts += 1;
                let new_dir = if steering {
                    let to_target = (target - current).normalize_or(direction);
                    let blended = (direction * STEER_KEEP + to_target * STEER_PULL)
                        .normalize_or(direction);
                    self.turn_model
                        .turn(blended, direction, self.bias_angle_deg, rng)
                } else {
                    self.turn_model
                        .turn(direction, direction, self.max_angle_deg, rng)
                };
                let step = rand_range(rng, self.min_step, self.max_step);
                candidate = current + new_dir * step;
                if !collides(candidate, &points, threshold) {
                    accepted = true;
                    break;
                }
            }

            if !accepted {
                match self.proximity_policy {
                    ProximityPolicy::AcceptLast => {
                        warn!(
                            "Point {} accepted within clearance {} after {} attempts.",
                            i, threshold, self.max_attempts
                        );
                        forced.push(i);
                    }
                    ProximityPolicy::Fail => {
                        return Err(Error::ProximityExhausted {
                            index: i,
                            attempts: self.max_attempts,
                        });
                    }
                }
            }

            direction = (candidate - current).normalize_or(direction);
            current = candidate;
            points.push(current);
        }

        let approach_dir = (start - current).normalize_or(direction);
        points.push(current + approach_dir * self.approach_length);
        points.push(start);

        debug!(
            "Grew {} points ({} forced, {} attempts).",
            points.len(),
            forced.len(),
            total_attempts
        );

        Ok(GeneratedPath::new(points, Closure::RepeatedStart)
            .with_forced_indices(forced)
            .with_attempts(total_attempts))
    }
}

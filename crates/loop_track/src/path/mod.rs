//! Path generators producing closed polylines.
//!
//! This module defines the [`PathGenerator`] trait and the generators the track pipeline
//! can be configured with:
//! - [`GrowthPath`]: biased random walk with self-proximity rejection and a closing approach.
//! - [`ClosedChain`]: equal-length steps whose vector sum is zero, by full-chain rejection.
//! - [`WanderPath`]: heading/pitch walk followed by a steered closing path.
use glam::Vec3;
use mint::Vector3;
use rand::RngCore;

use crate::error::Result;

pub mod chain;
pub mod growth;
pub mod wander;

pub use chain::{generate_closed_chain, ClosedChain, MAX_CHAIN_ATTEMPTS};
pub use growth::{GrowthPath, ProximityPolicy, TurnModel};
pub use wander::WanderPath;

/// Trait for closed path generation.
pub trait PathGenerator: Send + Sync {
    /// Short identifier used in logs and events.
    fn name(&self) -> &'static str;

    /// Validate parameters without drawing any randomness.
    fn validate(&self) -> Result<()>;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<GeneratedPath>;
}

/// How the loop closes topologically.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Closure {
    /// The last point repeats the first.
    RepeatedStart,
    /// The last point connects back to the first; no coordinate is repeated.
    Implied,
}

/// Fixed points the growth walk starts from and steers toward.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchors {
    /// First point of the path and the point the loop closes on.
    pub start: Vec3,
    /// Point the second half of the walk steers toward. Defaults to `start`.
    pub target: Option<Vec3>,
}

impl Default for Anchors {
    fn default() -> Self {
        Self {
            start: Vec3::ZERO,
            target: None,
        }
    }
}

impl Anchors {
    pub fn at(start: Vec3) -> Self {
        Self {
            start,
            target: None,
        }
    }

    pub fn between(start: Vec3, target: Vec3) -> Self {
        Self {
            start,
            target: Some(target),
        }
    }

    /// Point the walk steers toward.
    pub fn steer_target(&self) -> Vec3 {
        self.target.unwrap_or(self.start)
    }

    /// Initial walking direction: toward a distinct target, otherwise +X.
    pub fn initial_direction(&self) -> Vec3 {
        (self.steer_target() - self.start).normalize_or(Vec3::X)
    }
}

/// Polyline produced by a [`PathGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPath {
    /// Ordered points; the first is the start anchor.
    pub points: Vec<Vec3>,
    /// Indices of points accepted after the proximity attempt cap was exhausted.
    pub forced_indices: Vec<usize>,
    /// How the loop closes.
    pub closure: Closure,
    /// Rejection attempts spent producing this path.
    pub attempts: usize,
}

impl GeneratedPath {
    pub fn new(points: Vec<Vec3>, closure: Closure) -> Self {
        Self {
            points,
            forced_indices: Vec::new(),
            closure,
            attempts: 0,
        }
    }

    pub fn with_forced_indices(mut self, forced_indices: Vec<usize>) -> Self {
        self.forced_indices = forced_indices;
        self
    }

    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points as `mint` vectors for interop with other math libraries.
    pub fn to_mint(&self) -> Vec<Vector3<f32>> {
        self.points.iter().copied().map(Into::into).collect()
    }

    /// Distinct points of the loop, without a repeated start.
    pub fn loop_points(&self) -> &[Vec3] {
        match self.closure {
            Closure::RepeatedStart if self.points.len() > 1 => {
                &self.points[..self.points.len() - 1]
            }
            _ => &self.points,
        }
    }

    /// Edge vectors around the loop, including the closing edge.
    pub fn steps(&self) -> Vec<Vec3> {
        let pts = self.loop_points();
        let n = pts.len();
        if n < 2 {
            return Vec::new();
        }
        (0..n).map(|i| pts[(i + 1) % n] - pts[i]).collect()
    }

    /// Total length of the closed polyline.
    pub fn length(&self) -> f32 {
        self.steps().iter().map(|s| s.length()).sum()
    }
}

/// Returns `true` if `candidate` is closer than `threshold` to any point except the last.
pub(crate) fn collides(candidate: Vec3, points: &[Vec3], threshold: f32) -> bool {
    let threshold_sq = threshold * threshold;
    let Some((_, earlier)) = points.split_last() else {
        return false;
    };
    earlier
        .iter()
        .any(|p| candidate.distance_squared(*p) < threshold_sq)
}

/// Validate that a value is finite and strictly positive.
pub(crate) fn ensure_positive(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(crate::error::Error::InvalidConfig(format!(
            "{name} must be finite and > 0 (got {value})"
        )));
    }
    Ok(())
}

/// Validate that an angle in degrees is finite and within `[0, 180]`.
pub(crate) fn ensure_angle(name: &str, degrees: f32) -> Result<()> {
    if !degrees.is_finite() || !(0.0..=180.0).contains(&degrees) {
        return Err(crate::error::Error::InvalidConfig(format!(
            "{name} must be within [0, 180] degrees (got {degrees})"
        )));
    }
    Ok(())
}

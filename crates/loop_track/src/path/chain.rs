//! Closed chain solver: equal-length steps whose vector sum is zero.
//!
//! Steps are cone-sampled one after another and the closing step is forced to the
//! negated sum. Forcing closure after the fact would break the turn-angle bound, so a
//! chain whose closing step is too long, too short, or turns too sharply is discarded
//! and the whole chain is drawn again.
use glam::Vec3;
use rand::RngCore;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::path::{ensure_angle, ensure_positive, Closure, GeneratedPath, PathGenerator};
use crate::random::{angle_between, sample_cone};

/// Full-chain attempts before the solver gives up.
pub const MAX_CHAIN_ATTEMPTS: usize = 10_000;

/// Generate `count` points of a closed chain of `step_distance` long edges.
///
/// Returns `None` when no chain satisfied the closing constraints within
/// [`MAX_CHAIN_ATTEMPTS`]. Points start at the origin; the closing edge runs from the
/// last point back to the first and is not repeated.
pub fn generate_closed_chain(
    count: usize,
    step_distance: f32,
    max_angle_deg: f32,
    tolerance: f32,
    rng: &mut dyn RngCore,
) -> Option<Vec<Vec3>> {
    ClosedChain::new(count, step_distance, max_angle_deg, tolerance)
        .solve(rng)
        .positions
}

/// Result of one solver round.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainOutcome {
    /// Chain positions, or `None` if every attempt was rejected.
    pub positions: Option<Vec<Vec3>>,
    /// Attempts spent, including the accepted one.
    pub attempts: usize,
}

/// Closed chain configuration.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedChain {
    /// Number of points (and edges) in the loop.
    pub count: usize,
    /// Length of every edge.
    pub step_distance: f32,
    /// Maximum turn between consecutive edges, in degrees.
    pub max_angle_deg: f32,
    /// Accepted deviation of the closing edge length from `step_distance`.
    pub tolerance: f32,
    /// Attempts per round.
    pub max_attempts: usize,
    /// Rounds tried by [`PathGenerator::generate`] before reporting a closure failure.
    pub restarts: usize,
}

impl Default for ClosedChain {
    fn default() -> Self {
        Self {
            count: 15,
            step_distance: 100.0,
            max_angle_deg: 100.0,
            tolerance: 0.1,
            max_attempts: MAX_CHAIN_ATTEMPTS,
            restarts: 1,
        }
    }
}

impl ClosedChain {
    pub fn new(count: usize, step_distance: f32, max_angle_deg: f32, tolerance: f32) -> Self {
        Self {
            count,
            step_distance,
            max_angle_deg,
            tolerance,
            ..Default::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Run one round of at most `max_attempts` full-chain attempts.
    pub fn solve(&self, rng: &mut dyn RngCore) -> ChainOutcome {
        if self.count < 3 {
            return ChainOutcome {
                positions: None,
                attempts: 0,
            };
        }

        let max_angle = self.max_angle_deg.to_radians();
        let mut steps: Vec<Vec3> = Vec::with_capacity(self.count);

        for attempt in 1..=self.max_attempts {
            steps.clear();
            steps.push(Vec3::X * self.step_distance);
            for i in 1..self.count - 1 {
                let prev_dir = steps[i - 1].normalize_or(Vec3::X);
                steps.push(sample_cone(prev_dir, self.max_angle_deg, rng) * self.step_distance);
            }

            let sum: Vec3 = steps.iter().copied().sum();
            let closing = -sum;
            if (closing.length() - self.step_distance).abs() > self.tolerance {
                continue;
            }
            if angle_between(steps[self.count - 2], closing) > max_angle {
                continue;
            }
            steps.push(closing.normalize_or(Vec3::X) * self.step_distance);

            let mut positions = Vec::with_capacity(self.count + 1);
            let mut pos = Vec3::ZERO;
            positions.push(pos);
            for step in &steps {
                pos += *step;
                positions.push(pos);
            }
            if positions[self.count].distance(positions[0]) > self.tolerance {
                continue;
            }
            positions.pop();

            debug!("Closed chain of {} after {} attempts.", self.count, attempt);
            return ChainOutcome {
                positions: Some(positions),
                attempts: attempt,
            };
        }

        ChainOutcome {
            positions: None,
            attempts: self.max_attempts,
        }
    }
}

impl PathGenerator for ClosedChain {
    fn name(&self) -> &'static str {
        "closed_chain"
    }

    fn validate(&self) -> Result<()> {
        if self.count < 4 {
            return Err(Error::InvalidConfig(format!(
                "count must be >= 4 (got {})",
                self.count
            )));
        }
        ensure_positive("step_distance", self.step_distance)?;
        ensure_angle("max_angle_deg", self.max_angle_deg)?;
        ensure_positive("tolerance", self.tolerance)?;
        if self.max_attempts == 0 || self.restarts == 0 {
            return Err(Error::InvalidConfig(
                "max_attempts and restarts must be >= 1".into(),
            ));
        }
        Ok(())
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Result<GeneratedPath> {
        self.validate()?;

        let mut total = 0usize;
        for round in 0..self.restarts {
            let outcome = self.solve(rng);
            total += outcome.attempts;
            if let Some(points) = outcome.positions {
                return Ok(GeneratedPath::new(points, Closure::Implied).with_attempts(total));
            }
            warn!(
                "Closed chain round {} exhausted {} attempts.",
                round + 1,
                outcome.attempts
            );
        }
        Err(Error::ClosureFailed { attempts: total })
    }
}

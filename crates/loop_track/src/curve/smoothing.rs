//! Control point preparation before curve fitting.
use glam::Vec3;

use crate::error::{Error, Result};

/// Distance under which a trailing point counts as a repeat of the first.
pub const CLOSING_EPSILON: f32 = 1e-5;

/// Optional smoothing applied to loop points before fitting the curve.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Smoothing {
    /// Use the points as generated.
    #[default]
    None,
    /// Replace each point by the mean of the `window` points centered on it, wrapping
    /// around the loop. `window` must be odd.
    MovingAverage { window: usize },
}

impl Smoothing {
    pub fn validate(&self) -> Result<()> {
        if let Smoothing::MovingAverage { window } = *self {
            if window == 0 || window % 2 == 0 {
                return Err(Error::InvalidConfig(format!(
                    "smoothing window must be odd and >= 1 (got {window})"
                )));
            }
        }
        Ok(())
    }

    /// Apply the smoothing to a closed loop of points.
    pub fn apply(&self, points: &[Vec3]) -> Vec<Vec3> {
        match *self {
            Smoothing::None => points.to_vec(),
            Smoothing::MovingAverage { window } => moving_average(points, window),
        }
    }
}

fn moving_average(points: &[Vec3], window: usize) -> Vec<Vec3> {
    let n = points.len();
    let radius = window / 2;
    if n == 0 || radius == 0 {
        return points.to_vec();
    }
    // A window wider than the loop would count points twice.
    let radius = radius.min((n - 1) / 2);
    let count = (2 * radius + 1) as f32;

    (0..n)
        .map(|i| {
            let sum: Vec3 = (0..=2 * radius)
                .map(|k| points[(i + n + k - radius) % n])
                .sum();
            sum / count
        })
        .collect()
}

/// Drop a trailing point that repeats the first; the curve is periodic.
pub fn strip_closing_duplicate(points: &[Vec3]) -> &[Vec3] {
    match points {
        [first, rest @ .., last] if !rest.is_empty() => {
            if first.distance(*last) <= CLOSING_EPSILON {
                &points[..points.len() - 1]
            } else {
                points
            }
        }
        _ => points,
    }
}

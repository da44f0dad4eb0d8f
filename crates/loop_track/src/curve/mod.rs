//! Closed curves through generated control points.
//!
//! [`ClosedCurve`] is a periodic centripetal Catmull-Rom spline. It keeps a cumulative
//! arc-length table so callers can sample it at equal distances with
//! [`ClosedCurve::point_at`]. [`smoothing`] prepares control points and [`frames`] builds
//! the orientation frames the ribbon extruder sweeps along the curve.
use glam::Vec3;

use crate::error::{Error, Result};

pub mod frames;
pub mod smoothing;

pub use frames::{compute_frames, Frame, FrameMode, FrameSet};
pub use smoothing::Smoothing;

/// Default number of chords in the arc-length table.
pub const DEFAULT_ARC_DIVISIONS: usize = 200;
/// A closed curve needs at least this many control points.
pub const MIN_CONTROL_POINTS: usize = 4;

/// Knot spacing exponent applied to squared distances (`|Δ|^0.5`).
const CENTRIPETAL_POW: f32 = 0.25;
/// Knot intervals below this are replaced to avoid division by zero.
const KNOT_EPSILON: f32 = 1e-4;
/// Offset used for finite differences in curve parameter space.
const DIFF_DELTA: f32 = 1e-4;

/// Cubic `c0 + c1 t + c2 t^2 + c3 t^3` on one span.
#[derive(Clone, Copy, Debug)]
struct Cubic {
    c0: Vec3,
    c1: Vec3,
    c2: Vec3,
    c3: Vec3,
}

impl Cubic {
    /// Hermite form with end points `x0`, `x1` and tangents `t0`, `t1`.
    fn hermite(x0: Vec3, x1: Vec3, t0: Vec3, t1: Vec3) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    /// Non-uniform Catmull-Rom span from `p1` to `p2` with knot intervals `dt0..dt2`.
    fn catmull_rom(p: [Vec3; 4], dt: [f32; 3]) -> Self {
        let [p0, p1, p2, p3] = p;
        let [dt0, dt1, dt2] = dt;
        let t1 = (p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1;
        let t2 = (p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2;
        Self::hermite(p1, p2, t1 * dt1, t2 * dt1)
    }

    fn value(&self, t: f32) -> Vec3 {
        self.c0 + t * (self.c1 + t * (self.c2 + t * self.c3))
    }

    fn derivative(&self, t: f32) -> Vec3 {
        self.c1 + t * (2.0 * self.c2 + 3.0 * t * self.c3)
    }

    fn second_derivative(&self, t: f32) -> Vec3 {
        2.0 * self.c2 + 6.0 * t * self.c3
    }
}

/// Periodic centripetal Catmull-Rom spline.
///
/// The parameter `t` runs over `[0, 1]` with `point(0) == point(1)`; values outside wrap.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedCurve {
    points: Vec<Vec3>,
    lengths: Vec<f32>,
}

impl ClosedCurve {
    /// Build a curve with [`DEFAULT_ARC_DIVISIONS`] arc-length chords.
    pub fn new(points: Vec<Vec3>) -> Result<Self> {
        Self::with_divisions(points, DEFAULT_ARC_DIVISIONS)
    }

    /// Build a curve whose arc-length table has `divisions` chords.
    pub fn with_divisions(points: Vec<Vec3>, divisions: usize) -> Result<Self> {
        if points.len() < MIN_CONTROL_POINTS {
            return Err(Error::TooFewControlPoints {
                found: points.len(),
                required: MIN_CONTROL_POINTS,
            });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "control point {index} is not finite"
            )));
        }
        if divisions == 0 {
            return Err(Error::InvalidConfig("curve divisions must be >= 1".into()));
        }

        let mut curve = Self {
            points,
            lengths: Vec::new(),
        };
        curve.lengths = curve.arc_lengths(divisions);
        Ok(curve)
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    /// Number of chords in the arc-length table.
    pub fn divisions(&self) -> usize {
        self.lengths.len() - 1
    }

    /// Cumulative chord lengths at `t = i / divisions`.
    pub fn lengths(&self) -> &[f32] {
        &self.lengths
    }

    /// Approximate total length of the loop.
    pub fn length(&self) -> f32 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Point at curve parameter `t`.
    pub fn point(&self, t: f32) -> Vec3 {
        let (span, local) = self.span(t);
        span.value(local)
    }

    /// First derivative with respect to `t`.
    pub fn derivative(&self, t: f32) -> Vec3 {
        let (span, local) = self.span(t);
        span.derivative(local) * self.points.len() as f32
    }

    /// Second derivative with respect to `t`.
    pub fn second_derivative(&self, t: f32) -> Vec3 {
        let (span, local) = self.span(t);
        let n = self.points.len() as f32;
        span.second_derivative(local) * n * n
    }

    /// Unit tangent at `t`, or `None` where the curve is stationary.
    ///
    /// Falls back to a central difference when the analytic derivative vanishes.
    pub fn tangent(&self, t: f32) -> Option<Vec3> {
        let d = self.derivative(t);
        if d.length_squared() > f32::EPSILON {
            return Some(d.normalize());
        }
        let diff = self.point(t + DIFF_DELTA) - self.point(t - DIFF_DELTA);
        diff.try_normalize()
    }

    /// Curve parameter at arc-length fraction `u ∈ [0, 1]`.
    pub fn t_at(&self, u: f32) -> f32 {
        let u = u.clamp(0.0, 1.0);
        let last = self.lengths.len() - 1;
        let target = u * self.length();

        // Last index whose cumulative length is below the target.
        let i = self.lengths.partition_point(|&l| l < target).saturating_sub(1);
        if self.lengths[i] == target || i >= last {
            return i as f32 / last as f32;
        }
        let before = self.lengths[i];
        let segment = self.lengths[i + 1] - before;
        let fraction = if segment > 0.0 {
            (target - before) / segment
        } else {
            0.0
        };
        (i as f32 + fraction) / last as f32
    }

    /// Point at arc-length fraction `u`.
    pub fn point_at(&self, u: f32) -> Vec3 {
        self.point(self.t_at(u))
    }

    /// Unit tangent at arc-length fraction `u`.
    pub fn tangent_at(&self, u: f32) -> Option<Vec3> {
        self.tangent(self.t_at(u))
    }

    /// `segments + 1` points at equal arc-length spacing; the last equals the first.
    pub fn spaced_points(&self, segments: usize) -> Vec<Vec3> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f32 / segments as f32))
            .collect()
    }

    fn span(&self, t: f32) -> (Cubic, f32) {
        let n = self.points.len();
        let p = n as f32 * t;
        let base = p.floor();
        let local = p - base;
        let i = (base as i64).rem_euclid(n as i64) as usize;

        let p0 = self.points[(i + n - 1) % n];
        let p1 = self.points[i];
        let p2 = self.points[(i + 1) % n];
        let p3 = self.points[(i + 2) % n];

        let mut dt0 = p0.distance_squared(p1).powf(CENTRIPETAL_POW);
        let mut dt1 = p1.distance_squared(p2).powf(CENTRIPETAL_POW);
        let mut dt2 = p2.distance_squared(p3).powf(CENTRIPETAL_POW);
        if dt1 < KNOT_EPSILON {
            dt1 = 1.0;
        }
        if dt0 < KNOT_EPSILON {
            dt0 = dt1;
        }
        if dt2 < KNOT_EPSILON {
            dt2 = dt1;
        }

        (Cubic::catmull_rom([p0, p1, p2, p3], [dt0, dt1, dt2]), local)
    }

    fn arc_lengths(&self, divisions: usize) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(divisions + 1);
        let mut last = self.point(0.0);
        let mut sum = 0.0;
        lengths.push(0.0);
        for i in 1..=divisions {
            let current = self.point(i as f32 / divisions as f32);
            sum += current.distance(last);
            lengths.push(sum);
            last = current;
        }
        lengths
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::TAU;

    use super::*;

    fn square(size: f32) -> Vec<Vec3> {
        vec![
            Vec3::ZERO,
            Vec3::new(size, 0.0, 0.0),
            Vec3::new(size, 0.0, size),
            Vec3::new(0.0, 0.0, size),
        ]
    }

    fn circle(n: usize, radius: f32) -> Vec<Vec3> {
        (0..n)
            .map(|i| {
                let a = i as f32 / n as f32 * TAU;
                Vec3::new(radius * a.cos(), 0.0, radius * a.sin())
            })
            .collect()
    }

    #[test]
    fn rejects_too_few_points() {
        let err = ClosedCurve::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y]).unwrap_err();
        assert!(matches!(
            err,
            Error::TooFewControlPoints {
                found: 3,
                required: 4
            }
        ));
    }

    #[test]
    fn rejects_non_finite_points_and_zero_divisions() {
        let mut pts = square(1.0);
        pts[2].x = f32::NAN;
        assert!(ClosedCurve::new(pts).is_err());
        assert!(ClosedCurve::with_divisions(square(1.0), 0).is_err());
    }

    #[test]
    fn interpolates_control_points_and_closes() {
        let pts = square(10.0);
        let curve = ClosedCurve::new(pts.clone()).unwrap();
        for (i, p) in pts.iter().enumerate() {
            let t = i as f32 / pts.len() as f32;
            assert!(curve.point(t).distance(*p) < 1e-4);
        }
        assert!(curve.point(0.0).distance(curve.point(1.0)) < 1e-5);
        assert!(curve.point(-0.25).distance(curve.point(0.75)) < 1e-4);
    }

    #[test]
    fn circle_length_is_close_to_circumference() {
        let curve = ClosedCurve::new(circle(16, 50.0)).unwrap();
        let expected = TAU * 50.0;
        assert!((curve.length() - expected).abs() / expected < 0.01);
        assert_eq!(curve.divisions(), DEFAULT_ARC_DIVISIONS);
        assert_eq!(curve.lengths().len(), DEFAULT_ARC_DIVISIONS + 1);
    }

    #[test]
    fn arc_length_mapping_is_monotonic_and_spans_unit_interval() {
        let curve = ClosedCurve::new(vec![
            Vec3::ZERO,
            Vec3::new(100.0, 0.0, 0.0),
            Vec3::new(110.0, 0.0, 5.0),
            Vec3::new(20.0, 0.0, 40.0),
        ])
        .unwrap();
        assert_eq!(curve.t_at(0.0), 0.0);
        assert!((curve.t_at(1.0) - 1.0).abs() < 1e-6);
        let mut prev = -1.0;
        for i in 0..=100 {
            let t = curve.t_at(i as f32 / 100.0);
            assert!(t >= prev);
            prev = t;
        }
    }

    #[test]
    fn spaced_points_are_roughly_equidistant() {
        let curve = ClosedCurve::new(circle(8, 30.0)).unwrap();
        let pts = curve.spaced_points(40);
        assert_eq!(pts.len(), 41);
        assert!(pts[0].distance(pts[40]) < 1e-4);
        let gaps: Vec<f32> = pts.windows(2).map(|w| w[0].distance(w[1])).collect();
        let mean = gaps.iter().sum::<f32>() / gaps.len() as f32;
        for g in gaps {
            assert!((g - mean).abs() / mean < 0.05, "gap {g} mean {mean}");
        }
    }

    #[test]
    fn tangent_follows_circle_direction() {
        let curve = ClosedCurve::new(circle(12, 20.0)).unwrap();
        let t = curve.tangent(0.0).unwrap();
        // Counter-clockwise in XZ starting at +X heads toward +Z.
        assert!(t.z > 0.99, "{t:?}");
        let second = curve.second_derivative(0.0);
        // Curvature points toward the center.
        assert!(second.x < 0.0);
    }

    #[test]
    fn duplicate_control_points_do_not_produce_nan() {
        let pts = vec![
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 10.0),
            Vec3::new(0.0, 0.0, 10.0),
        ];
        let curve = ClosedCurve::new(pts).unwrap();
        for p in curve.spaced_points(50) {
            assert!(p.is_finite());
        }
        assert!(curve.length().is_finite());
    }
}

//! Orientation frames sampled along a closed curve.
//!
//! A [`Frame`] holds the unit tangent, the surface normal (the ribbon's "up") and the
//! binormal `tangent × normal` (the ribbon's lateral axis). Frames never contain NaN:
//! where a sample is degenerate the previous frame is carried forward and the sample
//! index is reported in [`FrameSet::degenerate`].
use glam::{Quat, Vec3};

use crate::curve::ClosedCurve;
use crate::random::{rotation_between, signed_angle_between};

/// Relative threshold under which a projected direction counts as vanishing.
pub const FRAME_EPSILON: f32 = 1e-4;

/// Curvature (inverse length) under which a Frenet normal is not trusted.
pub const MIN_CURVATURE: f32 = 1e-5;

/// How frame normals are chosen.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum FrameMode {
    /// Parallel transport from a world-up start, with the closing twist spread evenly.
    #[default]
    Transported,
    /// Normal perpendicular to the osculating plane. Flips at inflections.
    Frenet,
    /// Fixed up direction projected off the tangent.
    Up(Vec3),
}

/// Orthonormal frame at one curve sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub position: Vec3,
    pub tangent: Vec3,
    pub normal: Vec3,
    pub binormal: Vec3,
}

impl Frame {
    /// Frame from a unit tangent and a hint that is projected off the tangent.
    ///
    /// Falls back to [`initial_normal`] when the hint is parallel to the tangent.
    pub fn orthonormal(position: Vec3, tangent: Vec3, normal_hint: Vec3) -> Self {
        let normal = project_off(normal_hint, tangent).unwrap_or_else(|| initial_normal(tangent));
        Self {
            position,
            tangent,
            normal,
            binormal: tangent.cross(normal),
        }
    }

    /// Rotate normal and binormal by `angle` radians about the tangent.
    pub fn rotated(&self, angle: f32) -> Self {
        let q = Quat::from_axis_angle(self.tangent, angle);
        Self {
            normal: (q * self.normal).normalize_or(self.normal),
            binormal: (q * self.binormal).normalize_or(self.binormal),
            ..*self
        }
    }

    /// Keep this frame's orientation at a new sample.
    fn carried(&self, position: Vec3, tangent: Option<Vec3>) -> Self {
        Self::orthonormal(position, tangent.unwrap_or(self.tangent), self.normal)
    }
}

/// Frames for `segments + 1` samples; the last repeats the first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameSet {
    pub frames: Vec<Frame>,
    /// Sample indices whose frame was carried forward.
    pub degenerate: Vec<usize>,
}

impl FrameSet {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn tangents(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.frames.iter().map(|f| f.tangent)
    }
}

/// World up projected off `tangent`; the axis least aligned with the tangent otherwise.
pub fn initial_normal(tangent: Vec3) -> Vec3 {
    if let Some(n) = project_off(Vec3::Y, tangent) {
        return n;
    }
    let a = tangent.abs();
    let axis = if a.x <= a.y && a.x <= a.z {
        Vec3::X
    } else if a.y <= a.z {
        Vec3::Y
    } else {
        Vec3::Z
    };
    project_off(axis, tangent).unwrap_or_else(|| tangent.any_orthonormal_vector())
}

/// Component of `v` orthogonal to unit `axis`, normalized; `None` when it vanishes.
fn project_off(v: Vec3, axis: Vec3) -> Option<Vec3> {
    let p = v - axis * v.dot(axis);
    if p.length() <= FRAME_EPSILON * v.length().max(f32::MIN_POSITIVE) {
        return None;
    }
    p.try_normalize()
}

struct Sample {
    t: f32,
    position: Vec3,
    tangent: Option<Vec3>,
}

/// Compute frames at `segments + 1` equal arc-length samples of `curve`.
pub fn compute_frames(curve: &ClosedCurve, segments: usize, mode: FrameMode) -> FrameSet {
    let segments = segments.max(1);
    let samples: Vec<Sample> = (0..segments)
        .map(|i| {
            let t = curve.t_at(i as f32 / segments as f32);
            Sample {
                t,
                position: curve.point(t),
                tangent: curve.tangent(t),
            }
        })
        .collect();

    let mut set = match mode {
        FrameMode::Transported => transported(&samples),
        FrameMode::Frenet => frenet(curve, &samples),
        FrameMode::Up(up) => fixed_up(&samples, up.try_normalize().unwrap_or(Vec3::Y)),
    };
    let seam = set.frames[0];
    set.frames.push(seam);
    set
}

fn first_frame(samples: &[Sample], degenerate: &mut Vec<usize>) -> Frame {
    let first = &samples[0];
    let tangent = first.tangent.unwrap_or_else(|| {
        degenerate.push(0);
        samples
            .iter()
            .find_map(|s| s.tangent)
            .unwrap_or(Vec3::X)
    });
    Frame::orthonormal(first.position, tangent, initial_normal(tangent))
}

fn transported(samples: &[Sample]) -> FrameSet {
    let mut degenerate = Vec::new();
    let mut frames = Vec::with_capacity(samples.len() + 1);
    frames.push(first_frame(samples, &mut degenerate));

    for (i, sample) in samples.iter().enumerate().skip(1) {
        let prev = frames[i - 1];
        let frame = match sample.tangent {
            Some(tangent) => {
                let normal = rotation_between(prev.tangent, tangent) * prev.normal;
                Frame::orthonormal(sample.position, tangent, normal)
            }
            None => {
                degenerate.push(i);
                prev.carried(sample.position, None)
            }
        };
        frames.push(frame);
    }

    // Transport once more across the seam and spread the residual twist.
    let n = frames.len();
    let (first, last) = (frames[0], frames[n - 1]);
    let closing = rotation_between(last.tangent, first.tangent) * last.normal;
    let twist = signed_angle_between(closing, first.normal, first.tangent);
    if twist.abs() > f32::EPSILON {
        for (i, frame) in frames.iter_mut().enumerate().skip(1) {
            *frame = frame.rotated(twist * i as f32 / n as f32);
        }
    }

    FrameSet { frames, degenerate }
}

fn frenet(curve: &ClosedCurve, samples: &[Sample]) -> FrameSet {
    let mut degenerate = Vec::new();
    let mut frames: Vec<Frame> = Vec::with_capacity(samples.len() + 1);

    for (i, sample) in samples.iter().enumerate() {
        let up = sample
            .tangent
            .and_then(|tangent| curvature_up(curve, sample.t, tangent));
        let frame = match (sample.tangent, up, frames.last()) {
            (Some(tangent), Some(up), _) => Frame::orthonormal(sample.position, tangent, up),
            (tangent, _, Some(prev)) => {
                degenerate.push(i);
                prev.carried(sample.position, tangent)
            }
            (_, _, None) => {
                degenerate.push(i);
                first_frame(samples, &mut Vec::new())
            }
        };
        frames.push(frame);
    }

    FrameSet { frames, degenerate }
}

/// Frenet "up" (`tangent × curvature`), `None` where `κ = |r''⊥| / |r'|²` is below
/// [`MIN_CURVATURE`].
fn curvature_up(curve: &ClosedCurve, t: f32, tangent: Vec3) -> Option<Vec3> {
    let speed_sq = curve.derivative(t).length_squared();
    if speed_sq <= f32::MIN_POSITIVE {
        return None;
    }
    let second = curve.second_derivative(t);
    let perpendicular = second - tangent * second.dot(tangent);
    if perpendicular.length() / speed_sq < MIN_CURVATURE {
        return None;
    }
    tangent.cross(perpendicular).try_normalize()
}

fn fixed_up(samples: &[Sample], up: Vec3) -> FrameSet {
    let mut degenerate = Vec::new();
    let mut frames: Vec<Frame> = Vec::with_capacity(samples.len() + 1);

    for (i, sample) in samples.iter().enumerate() {
        let normal = sample.tangent.and_then(|tangent| project_off(up, tangent));
        let frame = match (sample.tangent, normal, frames.last()) {
            (Some(tangent), Some(normal), _) => {
                Frame::orthonormal(sample.position, tangent, normal)
            }
            (tangent, _, Some(prev)) => {
                degenerate.push(i);
                prev.carried(sample.position, tangent)
            }
            (_, _, None) => {
                degenerate.push(i);
                first_frame(samples, &mut Vec::new())
            }
        };
        frames.push(frame);
    }

    FrameSet { frames, degenerate }
}

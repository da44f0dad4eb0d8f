//! Ribbon extrusion: a banked, UV-mapped road mesh swept along a closed curve.
//!
//! [`extrude_ribbon`] samples the curve at `segments + 1` equal arc-length positions,
//! builds a frame per sample, tilts it by the bank angle and places the profile vertices
//! of a [`RibbonProfile`]. Each strip of the profile becomes a run of quads between
//! consecutive rings, recorded as an [`IndexGroup`].
use glam::Vec3;

use crate::curve::{compute_frames, ClosedCurve, FrameMode, FrameSet};
use crate::error::{Error, Result};
use crate::path::ensure_positive;

pub mod banking;
pub mod mesh;

pub use banking::{bank_angles, signed_turn_deg, turn_angle_deg};
pub use mesh::{IndexGroup, RibbonMesh, StripKind};

/// Default distance covered by one texture repeat.
pub const DEFAULT_TEXTURE_REPEAT_UNITS: f32 = 10.0;
/// Default length of the tinted region before the seam.
pub const DEFAULT_FINISH_REGION_LENGTH: f32 = 5.0;
/// Vertex color multiplier of the finish region; saturates to white.
pub const DEFAULT_FINISH_TINT: [f32; 3] = [1000.0; 3];

/// Cross-section swept along the curve.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum RibbonProfile {
    /// Road top, bottom and two walls: `[TL, TR, BL, BR]` per sample.
    #[default]
    Slab,
    /// Road with a shoulder strip on either side:
    /// `[SL_out, SL_in, RL, RR, SR_in, SR_out, BL, BR]` per sample.
    Shouldered { shoulder_width: f32 },
}

/// Texture `u` along the ribbon.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UvMode {
    /// Distance along the centerline over the repeat length.
    #[default]
    ArcLength,
    /// Sample index over the segment count, in `[0, 1]`.
    Parametric,
}

/// Quad layout of one strip between rings `i` and `i + 1`, by profile slot.
#[derive(Clone, Copy, Debug)]
enum Strip {
    /// Upward facing surface from the left slot to the right slot.
    Top(usize, usize),
    /// Downward facing surface from the left slot to the right slot.
    Bottom(usize, usize),
    /// Outward facing wall on the left, from the top slot to the bottom slot.
    LeftWall(usize, usize),
    /// Outward facing wall on the right, from the top slot to the bottom slot.
    RightWall(usize, usize),
}

impl Strip {
    /// Quad corners for the segment between ring bases `i` and `j`.
    fn quad(self, i: u32, j: u32) -> [u32; 4] {
        match self {
            Strip::Top(l, r) => {
                let (l, r) = (l as u32, r as u32);
                [i + l, i + r, j + r, j + l]
            }
            Strip::Bottom(l, r) => {
                let (l, r) = (l as u32, r as u32);
                [i + l, j + l, j + r, i + r]
            }
            Strip::LeftWall(t, b) => {
                let (t, b) = (t as u32, b as u32);
                [i + t, j + t, j + b, i + b]
            }
            Strip::RightWall(t, b) => {
                let (t, b) = (t as u32, b as u32);
                [i + t, i + b, j + b, j + t]
            }
        }
    }
}

/// Placement of one profile vertex in the banked frame.
#[derive(Clone, Copy, Debug)]
struct Slot {
    /// Offset along the binormal (positive is right).
    lateral: f32,
    /// Offset against the normal (positive is down).
    drop: f32,
    v: f32,
}

impl RibbonProfile {
    pub fn vertices_per_sample(&self) -> usize {
        match self {
            RibbonProfile::Slab => 4,
            RibbonProfile::Shouldered { .. } => 8,
        }
    }

    fn slots(&self, width: f32, thickness: f32) -> Vec<Slot> {
        let half = width * 0.5;
        let slot = |lateral, drop, v| Slot { lateral, drop, v };
        match *self {
            RibbonProfile::Slab => vec![
                slot(-half, 0.0, 0.0),
                slot(half, 0.0, 1.0),
                slot(-half, thickness, 0.0),
                slot(half, thickness, 1.0),
            ],
            RibbonProfile::Shouldered { shoulder_width } => {
                let outer = half + shoulder_width;
                vec![
                    slot(-outer, 0.0, 0.0),
                    slot(-half, 0.0, 1.0),
                    slot(-half, 0.0, 0.0),
                    slot(half, 0.0, 1.0),
                    slot(half, 0.0, 0.0),
                    slot(outer, 0.0, 1.0),
                    slot(-outer, thickness, 0.0),
                    slot(outer, thickness, 1.0),
                ]
            }
        }
    }

    fn strips(&self) -> &'static [(StripKind, Strip)] {
        match self {
            RibbonProfile::Slab => &[
                (StripKind::Road, Strip::Top(0, 1)),
                (StripKind::Bottom, Strip::Bottom(2, 3)),
                (StripKind::LeftWall, Strip::LeftWall(0, 2)),
                (StripKind::RightWall, Strip::RightWall(1, 3)),
            ],
            RibbonProfile::Shouldered { .. } => &[
                (StripKind::Road, Strip::Top(2, 3)),
                (StripKind::LeftShoulder, Strip::Top(0, 1)),
                (StripKind::RightShoulder, Strip::Top(4, 5)),
                (StripKind::Bottom, Strip::Bottom(6, 7)),
                (StripKind::LeftWall, Strip::LeftWall(0, 6)),
                (StripKind::RightWall, Strip::RightWall(5, 7)),
            ],
        }
    }
}

/// Ribbon extrusion settings.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RibbonConfig {
    /// Number of segments around the loop.
    pub segments: usize,
    /// Road width.
    pub width: f32,
    /// Distance from the road surface to the bottom face.
    pub thickness: f32,
    /// Bank per degree of turn between samples.
    pub banking_factor: f32,
    /// Bank limit in degrees.
    pub max_banking_deg: f32,
    pub texture_repeat_units: f32,
    pub finish_region_length: f32,
    pub finish_tint: [f32; 3],
    pub base_tint: [f32; 3],
    pub profile: RibbonProfile,
    pub uv_mode: UvMode,
    pub frame_mode: FrameMode,
}

impl Default for RibbonConfig {
    fn default() -> Self {
        Self {
            segments: 300,
            width: 12.0,
            thickness: 1.0,
            banking_factor: 0.4,
            max_banking_deg: 25.0,
            texture_repeat_units: DEFAULT_TEXTURE_REPEAT_UNITS,
            finish_region_length: DEFAULT_FINISH_REGION_LENGTH,
            finish_tint: DEFAULT_FINISH_TINT,
            base_tint: [1.0; 3],
            profile: RibbonProfile::Slab,
            uv_mode: UvMode::ArcLength,
            frame_mode: FrameMode::Transported,
        }
    }
}

impl RibbonConfig {
    /// Creates a config with the given segment count, width and thickness.
    pub fn new(segments: usize, width: f32, thickness: f32) -> Self {
        Self {
            segments,
            width,
            thickness,
            ..Default::default()
        }
    }

    /// Sets the banking factor and limit in degrees.
    pub fn with_banking(mut self, factor: f32, max_banking_deg: f32) -> Self {
        self.banking_factor = factor;
        self.max_banking_deg = max_banking_deg;
        self
    }

    pub fn with_texture_repeat_units(mut self, units: f32) -> Self {
        self.texture_repeat_units = units;
        self
    }

    /// Sets the finish region length and its tint.
    pub fn with_finish_region(mut self, length: f32, tint: [f32; 3]) -> Self {
        self.finish_region_length = length;
        self.finish_tint = tint;
        self
    }

    pub fn with_base_tint(mut self, tint: [f32; 3]) -> Self {
        self.base_tint = tint;
        self
    }

    pub fn with_profile(mut self, profile: RibbonProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_uv_mode(mut self, uv_mode: UvMode) -> Self {
        self.uv_mode = uv_mode;
        self
    }

    pub fn with_frame_mode(mut self, frame_mode: FrameMode) -> Self {
        self.frame_mode = frame_mode;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.segments < 3 {
            return Err(Error::InvalidConfig(format!(
                "segments must be >= 3 (got {})",
                self.segments
            )));
        }
        ensure_positive("width", self.width)?;
        ensure_positive("thickness", self.thickness)?;
        ensure_positive("texture_repeat_units", self.texture_repeat_units)?;
        if !self.banking_factor.is_finite() {
            return Err(Error::InvalidConfig("banking_factor must be finite".into()));
        }
        if !self.max_banking_deg.is_finite() || !(0.0..=90.0).contains(&self.max_banking_deg) {
            return Err(Error::InvalidConfig(format!(
                "max_banking_deg must be within [0, 90] (got {})",
                self.max_banking_deg
            )));
        }
        if !self.finish_region_length.is_finite() || self.finish_region_length < 0.0 {
            return Err(Error::InvalidConfig(
                "finish_region_length must be finite and >= 0".into(),
            ));
        }
        let mut tints = self.finish_tint.iter().chain(&self.base_tint);
        if tints.any(|c| !c.is_finite()) {
            return Err(Error::InvalidConfig("tints must be finite".into()));
        }
        if let RibbonProfile::Shouldered { shoulder_width } = self.profile {
            ensure_positive("shoulder_width", shoulder_width)?;
        }
        if let FrameMode::Up(up) = self.frame_mode {
            if !up.is_finite() || up.length_squared() <= f32::EPSILON {
                return Err(Error::InvalidConfig(
                    "frame up vector must be finite and non-zero".into(),
                ));
            }
        }
        Ok(())
    }

    /// Vertex count of the extruded mesh, or [`Error::IndexOverflow`] when `u32` indices
    /// cannot address it.
    pub fn vertex_count(&self) -> Result<usize> {
        let vertices = self
            .profile
            .vertices_per_sample()
            .checked_mul(self.segments.saturating_add(1))
            .ok_or(Error::IndexOverflow {
                vertices: usize::MAX,
            })?;
        if vertices > u32::MAX as usize {
            return Err(Error::IndexOverflow { vertices });
        }
        Ok(vertices)
    }
}

/// Extrude a ribbon mesh along `curve`.
pub fn extrude_ribbon(curve: &ClosedCurve, config: &RibbonConfig) -> Result<RibbonMesh> {
    config.validate()?;
    config.vertex_count()?;
    let frames = compute_frames(curve, config.segments, config.frame_mode);
    extrude_frames(&frames, config)
}

/// Extrude a ribbon mesh along precomputed frames.
///
/// `frames` must hold `config.segments + 1` frames whose last entry is the seam copy of
/// the first, as produced by [`compute_frames`].
pub fn extrude_frames(frames: &FrameSet, config: &RibbonConfig) -> Result<RibbonMesh> {
    config.validate()?;
    let vertex_count = config.vertex_count()?;
    let segments = config.segments;
    if frames.len() != segments + 1 {
        return Err(Error::InvalidConfig(format!(
            "expected {} frames for {} segments, got {}",
            segments + 1,
            segments,
            frames.len()
        )));
    }

    let vps = config.profile.vertices_per_sample();
    let slots = config.profile.slots(config.width, config.thickness);
    let banking = bank_angles(&frames.frames, config.banking_factor, config.max_banking_deg);

    let mut distances = Vec::with_capacity(segments + 1);
    let mut travelled = 0.0;
    distances.push(0.0);
    for w in frames.frames.windows(2) {
        travelled += w[0].position.distance(w[1].position);
        distances.push(travelled);
    }
    let total = travelled;
    let finish_start = total - config.finish_region_length;

    let mut positions = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);
    let mut colors = Vec::with_capacity(vertex_count);

    for (i, frame) in frames.frames.iter().enumerate().take(segments) {
        let banked = frame.rotated(banking[i]);
        let u = match config.uv_mode {
            UvMode::ArcLength => distances[i] / config.texture_repeat_units,
            UvMode::Parametric => i as f32 / segments as f32,
        };
        let tint = if distances[i] >= finish_start {
            config.finish_tint
        } else {
            config.base_tint
        };
        for slot in &slots {
            let p: Vec3 =
                banked.position + banked.binormal * slot.lateral - banked.normal * slot.drop;
            positions.push(p.to_array());
            uvs.push([u, slot.v]);
            colors.push(tint);
        }
    }

    // Seam ring: ring 0 again, with `u` continuing past the last sample.
    let seam_u = match config.uv_mode {
        UvMode::ArcLength => total / config.texture_repeat_units,
        UvMode::Parametric => 1.0,
    };
    positions.extend_from_within(0..vps);
    colors.extend_from_within(0..vps);
    for k in 0..vps {
        let v = uvs[k][1];
        uvs.push([seam_u, v]);
    }

    let strips = config.profile.strips();
    let mut indices = Vec::with_capacity(strips.len() * segments * 6);
    let mut groups = Vec::with_capacity(strips.len());
    let ring = vps as u32;
    for &(kind, strip) in strips {
        let start = indices.len();
        for s in 0..segments as u32 {
            let [a, b, c, d] = strip.quad(s * ring, (s + 1) * ring);
            indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
        groups.push(IndexGroup {
            kind,
            start,
            count: indices.len() - start,
        });
    }

    let normals = mesh::vertex_normals(&positions, &indices, vps, segments);

    Ok(RibbonMesh {
        positions,
        normals,
        uvs,
        colors,
        indices,
        groups,
        banking,
        distances,
        vertices_per_sample: vps,
        segments,
    })
}

//! Mesh buffers produced by the ribbon extruder.
use std::ops::Range;

use glam::Vec3;

/// Surface a run of triangles belongs to. Renderers can map each to a material.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StripKind {
    Road,
    LeftShoulder,
    RightShoulder,
    Bottom,
    LeftWall,
    RightWall,
}

/// Contiguous range of [`RibbonMesh::indices`] belonging to one strip.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexGroup {
    pub kind: StripKind,
    /// First index in [`RibbonMesh::indices`].
    pub start: usize,
    /// Number of indices (a multiple of three).
    pub count: usize,
}

impl IndexGroup {
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.count
    }
}

/// Closed strip mesh swept along a curve.
///
/// Vertices are stored ring by ring: ring `i` holds the `vertices_per_sample` profile
/// vertices of sample `i`. Ring `segments` is the seam copy of ring 0 and differs from it
/// only in the texture `u` coordinate.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RibbonMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub colors: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub groups: Vec<IndexGroup>,
    /// Bank angle per sample, in radians.
    pub banking: Vec<f32>,
    /// Cumulative distance along the centerline per sample.
    pub distances: Vec<f32>,
    pub vertices_per_sample: usize,
    pub segments: usize,
}

impl RibbonMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex index range of ring `sample`.
    pub fn ring(&self, sample: usize) -> Range<usize> {
        let start = sample * self.vertices_per_sample;
        start..start + self.vertices_per_sample
    }

    /// Centerline length, including the closing segment.
    pub fn total_length(&self) -> f32 {
        self.distances.last().copied().unwrap_or(0.0)
    }

    pub fn group(&self, kind: StripKind) -> Option<&IndexGroup> {
        self.groups.iter().find(|g| g.kind == kind)
    }

    /// Indices of one strip kind; empty when the profile has no such strip.
    pub fn indices_of(&self, kind: StripKind) -> &[u32] {
        self.group(kind)
            .map(|g| &self.indices[g.range()])
            .unwrap_or(&[])
    }

    /// Axis-aligned bounds of all positions, `None` for an empty mesh.
    pub fn aabb(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.positions.iter().map(|p| Vec3::from_array(*p));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

/// Area-weighted vertex normals; seam ring normals are shared with ring 0.
pub(crate) fn vertex_normals(
    positions: &[[f32; 3]],
    indices: &[u32],
    vertices_per_sample: usize,
    segments: usize,
) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
        let pa = Vec3::from_array(positions[a]);
        let pb = Vec3::from_array(positions[b]);
        let pc = Vec3::from_array(positions[c]);
        // Cross product length is twice the area, which weights the sum.
        let face = (pb - pa).cross(pc - pa);
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }

    let seam = segments * vertices_per_sample;
    for k in 0..vertices_per_sample {
        if seam + k < acc.len() {
            let shared = acc[k] + acc[seam + k];
            acc[k] = shared;
            acc[seam + k] = shared;
        }
    }

    acc.into_iter()
        .map(|n| n.normalize_or(Vec3::Y).to_array())
        .collect()
}

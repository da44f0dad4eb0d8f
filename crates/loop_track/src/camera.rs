//! Camera placement that keeps a generated track in view.
//!
//! [`fit_camera`] is a pure function of a [`BoundingSphere`] and a vertical field of view.
//! The renderer calls it after every regeneration and owns the actual camera.
use glam::{Mat4, Vec3};

use crate::error::{Error, Result};
use crate::path::ensure_positive;
use crate::ribbon::RibbonMesh;

/// Smallest eye-to-target distance [`fit_camera`] returns.
pub const MIN_CAMERA_DISTANCE: f32 = 1e-3;

/// Sphere enclosing a mesh.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    /// Sphere through the corners of an axis-aligned box.
    pub fn from_aabb(min: Vec3, max: Vec3) -> Self {
        Self {
            center: (min + max) * 0.5,
            radius: (max - min).length() * 0.5,
        }
    }

    /// Sphere around the bounding box of `points`, `None` when empty.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self::from_aabb(min, max))
    }

    pub fn from_mesh(mesh: &RibbonMesh) -> Option<Self> {
        mesh.aabb().map(|(min, max)| Self::from_aabb(min, max))
    }
}

/// Camera fit settings.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFitConfig {
    /// Multiplier on the radius so the track does not touch the frame edges.
    pub margin: f32,
    /// Far plane as a multiple of the camera distance.
    pub far_factor: f32,
    /// Lower bound of the far plane.
    pub min_far: f32,
    pub near: f32,
    /// Direction from the sphere center toward the camera.
    pub view_direction: Vec3,
}

impl Default for CameraFitConfig {
    fn default() -> Self {
        Self {
            margin: 1.2,
            far_factor: 3.0,
            min_far: 1500.0,
            near: 0.1,
            view_direction: Vec3::new(0.0, 0.5, 2.0),
        }
    }
}

impl CameraFitConfig {
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the far plane factor and lower bound.
    pub fn with_far(mut self, far_factor: f32, min_far: f32) -> Self {
        self.far_factor = far_factor;
        self.min_far = min_far;
        self
    }

    pub fn with_near(mut self, near: f32) -> Self {
        self.near = near;
        self
    }

    pub fn with_view_direction(mut self, view_direction: Vec3) -> Self {
        self.view_direction = view_direction;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("margin", self.margin)?;
        ensure_positive("far_factor", self.far_factor)?;
        ensure_positive("min_far", self.min_far)?;
        ensure_positive("near", self.near)?;
        if !self.view_direction.is_finite() || self.view_direction.length_squared() == 0.0 {
            return Err(Error::InvalidConfig(
                "view_direction must be finite and non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Suggested camera placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFit {
    /// Distance from the sphere center to the camera.
    pub distance: f32,
    pub near: f32,
    pub far: f32,
    pub fov_y_deg: f32,
    pub eye: Vec3,
    pub target: Vec3,
}

impl CameraFit {
    /// Right-handed view matrix with +Y up.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), aspect, self.near, self.far)
    }
}

/// Place a camera so `sphere` fits a vertical field of view of `fov_y_deg`.
///
/// `distance = radius * margin / sin(fov / 2)` and
/// `far = max(distance * far_factor, min_far)`. The field of view is clamped to
/// `(0, 180)` degrees. The distance never drops below the near plane (or
/// [`MIN_CAMERA_DISTANCE`]), so the eye stays apart from the target even for a point.
pub fn fit_camera(
    sphere: &BoundingSphere,
    fov_y_deg: f32,
    config: &CameraFitConfig,
) -> CameraFit {
    let fov_y_deg = fov_y_deg.clamp(0.1, 179.9);
    let half = (fov_y_deg * 0.5).to_radians();
    let radius = sphere.radius.max(0.0);
    let floor = config.near.max(MIN_CAMERA_DISTANCE);
    let distance = (radius * config.margin / half.sin()).max(floor);
    let far = (distance * config.far_factor).max(config.min_far);
    let direction = config.view_direction.normalize_or(Vec3::Z);

    CameraFit {
        distance,
        near: config.near,
        far,
        fov_y_deg,
        eye: sphere.center + direction * distance,
        target: sphere.center,
    }
}

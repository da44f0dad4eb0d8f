//! Track pipeline: plans, generated tracks, runner and events.
//!
//! A [`TrackPlan`] is an immutable description of one generation: seed, path generator,
//! smoothing, curve resolution and ribbon settings. [`runner::generate`] turns it into a
//! [`Track`], rebuilding everything from scratch on every call.
use glam::Vec3;

use crate::camera::{fit_camera, BoundingSphere, CameraFit, CameraFitConfig};
use crate::curve::{ClosedCurve, Smoothing, DEFAULT_ARC_DIVISIONS};
use crate::error::{Error, Result};
use crate::path::{GeneratedPath, GrowthPath, PathGenerator};
use crate::ribbon::{RibbonConfig, RibbonMesh};

pub mod events;
pub mod runner;

/// Flat parameter record as exposed to a UI: one growth path plus ribbon dimensions.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TrackParams {
    pub num_points: usize,
    /// Maximum turn per step, in degrees.
    pub max_angle: f32,
    pub min_step: f32,
    pub max_step: f32,
    pub road_width: f32,
    pub thickness: f32,
    pub banking_factor: f32,
    /// Bank limit, in degrees.
    pub max_banking_angle: f32,
    pub seed: String,
}

impl Default for TrackParams {
    fn default() -> Self {
        let growth = GrowthPath::default();
        let ribbon = RibbonConfig::default();
        Self {
            num_points: growth.num_points,
            max_angle: growth.max_angle_deg,
            min_step: growth.min_step,
            max_step: growth.max_step,
            road_width: growth.road_width,
            thickness: ribbon.thickness,
            banking_factor: ribbon.banking_factor,
            max_banking_angle: ribbon.max_banking_deg,
            seed: "track".into(),
        }
    }
}

/// Immutable configuration of one track generation.
pub struct TrackPlan {
    /// String seed; the same seed and settings reproduce the same track.
    pub seed: String,
    pub path: Box<dyn PathGenerator>,
    pub smoothing: Smoothing,
    /// Chords in the curve's arc-length table.
    pub curve_divisions: usize,
    pub ribbon: RibbonConfig,
}

impl TrackPlan {
    /// Create a plan with default smoothing, curve resolution and ribbon.
    pub fn new(seed: impl Into<String>, path: Box<dyn PathGenerator>) -> Self {
        Self {
            seed: seed.into(),
            path,
            smoothing: Smoothing::None,
            curve_divisions: DEFAULT_ARC_DIVISIONS,
            ribbon: RibbonConfig::default(),
        }
    }

    /// Create a plan from a concrete path generator.
    pub fn new_with<P: PathGenerator + 'static>(seed: impl Into<String>, path: P) -> Self {
        Self::new(seed, Box::new(path))
    }

    /// Map a flat parameter record onto a growth-path plan.
    ///
    /// The road width drives both the proximity clearance and the ribbon width.
    pub fn from_params(params: &TrackParams) -> Self {
        let growth = GrowthPath::new(params.num_points)
            .with_angles(params.max_angle, GrowthPath::default().bias_angle_deg)
            .with_steps(params.min_step, params.max_step)
            .with_clearance(params.road_width, GrowthPath::default().buffer);
        let ribbon = RibbonConfig {
            width: params.road_width,
            thickness: params.thickness,
            ..Default::default()
        }
        .with_banking(params.banking_factor, params.max_banking_angle);
        Self::new_with(params.seed.clone(), growth).with_ribbon(ribbon)
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = seed.into();
        self
    }

    pub fn with_smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_curve_divisions(mut self, divisions: usize) -> Self {
        self.curve_divisions = divisions;
        self
    }

    pub fn with_ribbon(mut self, ribbon: RibbonConfig) -> Self {
        self.ribbon = ribbon;
        self
    }

    /// Validates every stage's settings without generating anything.
    pub fn validate(&self) -> Result<()> {
        self.path.validate()?;
        self.smoothing.validate()?;
        if self.curve_divisions == 0 {
            return Err(Error::InvalidConfig("curve_divisions must be >= 1".into()));
        }
        self.ribbon.validate()?;
        self.ribbon.vertex_count()?;
        Ok(())
    }
}

/// A generated track.
#[derive(Debug, Clone)]
pub struct Track {
    /// Words derived from the plan's seed.
    pub seed_words: [u32; 4],
    /// Polyline produced by the path generator.
    pub path: GeneratedPath,
    /// Points the curve was fitted through, after smoothing.
    pub control_points: Vec<Vec3>,
    pub curve: ClosedCurve,
    pub mesh: RibbonMesh,
    /// Sphere enclosing the mesh.
    pub bounds: BoundingSphere,
}

impl Track {
    /// Camera placement for viewing the whole track.
    pub fn fit_camera(&self, fov_y_deg: f32, config: &CameraFitConfig) -> CameraFit {
        fit_camera(&self.bounds, fov_y_deg, config)
    }

    /// Indices of path points accepted after the proximity attempt cap.
    pub fn forced_points(&self) -> &[usize] {
        &self.path.forced_indices
    }
}

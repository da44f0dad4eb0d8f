#![forbid(unsafe_code)]
//! loop_track: Seeded procedural generation of closed 3D track loops and ribbon meshes.
//!
//! Modules:
//! - random: string seed hashing, deterministic generator, cone sampling
//! - path: closed polyline generators (growth walk, closed chain, wander)
//! - curve: closed centripetal Catmull-Rom curve, smoothing, moving frames
//! - ribbon: banked, UV-mapped, tinted ribbon mesh extrusion
//! - camera: bounding sphere and camera fit
//! - track: plans, runner, events
//!
//! For examples and docs, see README.
pub mod camera;
pub mod curve;
pub mod error;
pub mod path;
pub mod random;
pub mod ribbon;
pub mod track;

/// Convenient re-exports for common types. Import with `use loop_track::prelude::*;`.
pub mod prelude {
    pub use crate::camera::{
        fit_camera, BoundingSphere, CameraFit, CameraFitConfig, MIN_CAMERA_DISTANCE,
    };
    pub use crate::curve::{
        compute_frames, ClosedCurve, Frame, FrameMode, FrameSet, Smoothing,
    };
    pub use crate::error::{Error, Result};
    pub use crate::path::{
        generate_closed_chain, Anchors, ClosedChain, Closure, GeneratedPath, GrowthPath,
        PathGenerator, ProximityPolicy, TurnModel, WanderPath,
    };
    pub use crate::random::{hash_seed, sample_cone, SeededRng};
    pub use crate::ribbon::{
        extrude_frames, extrude_ribbon, IndexGroup, RibbonConfig, RibbonMesh, RibbonProfile,
        StripKind, UvMode,
    };
    pub use crate::track::events::{
        AsEventSink, EventSink, FnSink, MultiSink, TrackEvent, TrackEventKind, VecSink,
    };
    pub use crate::track::runner::{generate, generate_with_events, generate_with_rng, TrackRunner};
    pub use crate::track::{Track, TrackParams, TrackPlan};
}

//! High-level runner turning a [`TrackPlan`] into a [`Track`].
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::camera::BoundingSphere;
use crate::curve::smoothing::strip_closing_duplicate;
use crate::curve::{compute_frames, ClosedCurve};
use crate::error::{Error, Result};
use crate::random::{hash_seed, SeededRng};
use crate::ribbon::extrude_frames;
use crate::track::events::{EventSink, TrackEvent, TrackEventKind};
use crate::track::{Track, TrackPlan};

/// Generate a track from `plan`, seeding the random stream from `plan.seed`.
pub fn generate(plan: &TrackPlan) -> Result<Track> {
    generate_with_events(plan, &mut ())
}

/// Like [`generate`], reporting progress to `sink`.
pub fn generate_with_events(plan: &TrackPlan, sink: &mut dyn EventSink) -> Result<Track> {
    let seed_words = hash_seed(&plan.seed);
    let mut rng = SeededRng::new(seed_words[0]);
    run_track(plan, seed_words, &mut rng, sink)
}

/// Generate a track drawing from a caller-supplied random source instead of the seed.
pub fn generate_with_rng(
    plan: &TrackPlan,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> Result<Track> {
    run_track(plan, hash_seed(&plan.seed), rng, sink)
}

pub struct TrackRunner {
    plan: TrackPlan,
}

impl TrackRunner {
    pub fn try_new(plan: TrackPlan) -> Result<Self> {
        plan.validate()?;
        Ok(Self { plan })
    }

    pub fn new(plan: TrackPlan) -> Self {
        Self { plan }
    }

    pub fn plan(&self) -> &TrackPlan {
        &self.plan
    }

    pub fn into_plan(self) -> TrackPlan {
        self.plan
    }

    /// Generates the plan's track.
    pub fn run(&self) -> Result<Track> {
        generate(&self.plan)
    }

    pub fn run_with_events(&self, sink: &mut dyn EventSink) -> Result<Track> {
        generate_with_events(&self.plan, sink)
    }

    /// Generates the plan's track under another seed.
    pub fn run_seed(&self, seed: &str, sink: &mut dyn EventSink) -> Result<Track> {
        let seed_words = hash_seed(seed);
        let mut rng = SeededRng::new(seed_words[0]);
        run_track(&self.plan, seed_words, &mut rng, sink)
    }
}

fn run_track(
    plan: &TrackPlan,
    seed_words: [u32; 4],
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> Result<Track> {
    plan.validate()?;
    let generator = plan.path.name();

    if sink.wants(TrackEventKind::GenerationStarted) {
        sink.send(TrackEvent::GenerationStarted {
            seed: plan.seed.clone(),
            seed_words,
            generator,
        });
    }

    let path = match plan.path.generate(rng) {
        Ok(path) => path,
        Err(e) => {
            warn!("Path generator '{}' failed: {}.", generator, e);
            if sink.wants(TrackEventKind::Warning) {
                sink.send(TrackEvent::Warning {
                    context: format!("path:{generator}"),
                    message: e.to_string(),
                });
            }
            return Err(e);
        }
    };

    if !path.forced_indices.is_empty() {
        warn!(
            "Path generator '{}' forced {} point(s) past the proximity limit: {:?}.",
            generator,
            path.forced_indices.len(),
            path.forced_indices
        );
        if sink.wants(TrackEventKind::ProximityFallback) {
            for &index in &path.forced_indices {
                sink.send(TrackEvent::ProximityFallback { index });
            }
        }
    }
    if sink.wants(TrackEventKind::PathGenerated) {
        sink.send(TrackEvent::PathGenerated {
            points: path.len(),
            attempts: path.attempts,
            closure: path.closure,
        });
    }

    let control_points = plan.smoothing.apply(strip_closing_duplicate(&path.points));
    let curve = ClosedCurve::with_divisions(control_points.clone(), plan.curve_divisions)?;
    debug!(
        "Curve through {} control points, length {:.2}.",
        control_points.len(),
        curve.length()
    );
    if sink.wants(TrackEventKind::CurveBuilt) {
        sink.send(TrackEvent::CurveBuilt {
            control_points: control_points.len(),
            length: curve.length(),
        });
    }

    let frames = compute_frames(&curve, plan.ribbon.segments, plan.ribbon.frame_mode);
    if !frames.degenerate.is_empty() {
        warn!(
            "{} of {} frames were degenerate and carried forward.",
            frames.degenerate.len(),
            plan.ribbon.segments
        );
        if sink.wants(TrackEventKind::DegenerateFrames) {
            sink.send(TrackEvent::DegenerateFrames {
                indices: frames.degenerate.clone(),
            });
        }
    }

    let mesh = extrude_frames(&frames, &plan.ribbon)?;
    if sink.wants(TrackEventKind::MeshBuilt) {
        sink.send(TrackEvent::MeshBuilt {
            vertices: mesh.vertex_count(),
            triangles: mesh.triangle_count(),
            length: mesh.total_length(),
        });
    }

    let bounds = BoundingSphere::from_mesh(&mesh)
        .ok_or_else(|| Error::Other("ribbon mesh has no vertices".into()))?;

    info!(
        "Track '{}' | generator: {} | points: {} | vertices: {} | triangles: {}.",
        plan.seed,
        generator,
        path.len(),
        mesh.vertex_count(),
        mesh.triangle_count(),
    );
    if sink.wants(TrackEventKind::GenerationFinished) {
        sink.send(TrackEvent::GenerationFinished {
            radius: bounds.radius,
        });
    }

    Ok(Track {
        seed_words,
        path,
        control_points,
        curve,
        mesh,
        bounds,
    })
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::curve::Smoothing;
    use crate::path::{ClosedChain, Closure, GrowthPath, ProximityPolicy, WanderPath};
    use crate::ribbon::RibbonConfig;
    use crate::track::events::VecSink;
    use crate::track::TrackParams;

    fn small_ribbon() -> RibbonConfig {
        RibbonConfig::new(120, 4.0, 0.5)
    }

    #[test]
    fn same_seed_same_track() {
        let plan = TrackPlan::from_params(&TrackParams::default()).with_ribbon(small_ribbon());
        let a = generate(&plan).unwrap();
        let b = generate(&plan).unwrap();
        assert_eq!(a.path, b.path);
        assert_eq!(a.mesh, b.mesh);
        assert_eq!(a.seed_words, hash_seed("track"));
    }

    #[test]
    fn different_seeds_give_different_paths() {
        let runner = TrackRunner::new(
            TrackPlan::new_with("one", GrowthPath::new(20)).with_ribbon(small_ribbon()),
        );
        let a = runner.run().unwrap();
        let b = runner.run_seed("two", &mut ()).unwrap();
        assert_ne!(a.path.points, b.path.points);
    }

    #[test]
    fn growth_track_has_closed_mesh() {
        let plan = TrackPlan::new_with("hanna", GrowthPath::new(25)).with_ribbon(small_ribbon());
        let track = generate(&plan).unwrap();
        assert_eq!(track.path.closure, Closure::RepeatedStart);
        assert_eq!(track.control_points.len(), track.path.len() - 1);
        assert_eq!(track.mesh.vertex_count(), 4 * 121);
        assert_eq!(track.mesh.positions[0], track.mesh.positions[4 * 120]);
        assert!(track.bounds.radius > 0.0);
        assert!(track.mesh.positions.iter().flatten().all(|c| c.is_finite()));
    }

    #[test]
    fn events_describe_each_stage() {
        let plan = TrackPlan::new_with("events", ClosedChain::new(8, 10.0, 90.0, 2.0))
            .with_smoothing(Smoothing::MovingAverage { window: 3 })
            .with_ribbon(small_ribbon());
        let mut sink = VecSink::new();
        let track = generate_with_events(&plan, &mut sink).unwrap();
        let kinds: Vec<TrackEventKind> = sink.as_slice().iter().map(|e| e.kind()).collect();

        assert_eq!(kinds.first(), Some(&TrackEventKind::GenerationStarted));
        assert_eq!(kinds.last(), Some(&TrackEventKind::GenerationFinished));
        for expected in [
            TrackEventKind::PathGenerated,
            TrackEventKind::CurveBuilt,
            TrackEventKind::MeshBuilt,
        ] {
            assert!(kinds.contains(&expected), "missing {expected:?}");
        }
        let mesh_event = sink
            .as_slice()
            .iter()
            .find_map(|e| match e {
                TrackEvent::MeshBuilt { vertices, .. } => Some(*vertices),
                _ => None,
            })
            .expect("mesh event");
        assert_eq!(mesh_event, track.mesh.vertex_count());
        assert_eq!(track.path.closure, Closure::Implied);
        assert_eq!(track.control_points.len(), 8);
    }

    #[test]
    fn forced_points_are_reported() {
        // A tight walk with a large clearance cannot avoid itself.
        let growth = GrowthPath::new(40)
            .with_steps(2.0, 3.0)
            .with_clearance(20.0, 5.0)
            .with_max_attempts(2);
        let plan = TrackPlan::new_with("crowded", growth).with_ribbon(small_ribbon());
        let mut sink = VecSink::with_kinds([TrackEventKind::ProximityFallback]);
        let track = generate_with_events(&plan, &mut sink).unwrap();

        assert!(!track.forced_points().is_empty());
        let reported: Vec<usize> = sink
            .into_inner()
            .into_iter()
            .filter_map(|e| match e {
                TrackEvent::ProximityFallback { index } => Some(index),
                _ => None,
            })
            .collect();
        assert_eq!(reported, track.forced_points());
    }

    #[test]
    fn strict_policy_surfaces_error_and_warning() {
        let growth = GrowthPath::new(40)
            .with_steps(2.0, 3.0)
            .with_clearance(20.0, 5.0)
            .with_max_attempts(2)
            .with_proximity_policy(ProximityPolicy::Fail);
        let plan = TrackPlan::new_with("crowded", growth).with_ribbon(small_ribbon());
        let mut sink = VecSink::new();
        let err = generate_with_events(&plan, &mut sink).unwrap_err();
        assert!(matches!(err, Error::ProximityExhausted { .. }));
        assert!(sink
            .as_slice()
            .iter()
            .any(|e| e.kind() == TrackEventKind::Warning));
    }

    #[test]
    fn invalid_plan_fails_before_generation() {
        let plan = TrackPlan::new_with("x", WanderPath::new(2, 60.0, 10.0));
        let mut sink = VecSink::new();
        assert!(matches!(
            generate_with_events(&plan, &mut sink),
            Err(Error::InvalidConfig(_))
        ));
        assert!(sink.is_empty());
        assert!(TrackRunner::try_new(TrackPlan::new_with("x", WanderPath::new(2, 60.0, 10.0)))
            .is_err());
    }

    #[test]
    fn wander_track_generates_with_std_rng() {
        let plan = TrackPlan::new_with("w", WanderPath::new(40, 45.0, 8.0))
            .with_ribbon(small_ribbon());
        let mut rng = StdRng::seed_from_u64(17);
        match generate_with_rng(&plan, &mut rng, &mut ()) {
            Ok(track) => {
                assert!(track.path.points[0].distance(*track.path.points.last().unwrap()) < 1e-5);
                assert_eq!(track.mesh.segments, 120);
            }
            Err(e) => assert!(e.is_recoverable(), "{e}"),
        }
    }
}

//! Event types and sinks for observing track generation.
//!
//! This module defines [`TrackEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while executing a [`crate::track::TrackPlan`]
//! via [`crate::track::runner::TrackRunner`] or
//! [`crate::track::runner::generate_with_events`].
use crate::path::Closure;

/// Describes events emitted during track generation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum TrackEvent {
    /// Emitted before the path generator runs.
    GenerationStarted {
        /// The plan's seed string.
        seed: String,
        /// Words derived from the seed; the first keys the random stream.
        seed_words: [u32; 4],
        /// Name of the path generator.
        generator: &'static str,
    },

    /// Emitted once the path generator produced a polyline.
    PathGenerated {
        /// Number of points, including a repeated start.
        points: usize,
        /// Rejection attempts spent.
        attempts: usize,
        closure: Closure,
    },

    /// Emitted for each point accepted after the proximity attempt cap.
    ProximityFallback {
        /// Index of the forced point in the path.
        index: usize,
    },

    /// Emitted after fitting the closed curve.
    CurveBuilt {
        /// Control points after smoothing.
        control_points: usize,
        /// Approximate loop length.
        length: f32,
    },

    /// Emitted when some frames had to be carried forward.
    DegenerateFrames {
        /// Sample indices of the carried frames.
        indices: Vec<usize>,
    },

    /// Emitted after the ribbon mesh was built.
    MeshBuilt {
        vertices: usize,
        triangles: usize,
        /// Centerline length covered by the mesh.
        length: f32,
    },

    /// Emitted when generation completed.
    GenerationFinished {
        /// Radius of the mesh's bounding sphere.
        radius: f32,
    },

    /// Non-fatal warning generated during generation.
    Warning {
        /// Context string (e.g. stage or generator name).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`TrackEvent`], used by sinks to opt out of events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackEventKind {
    GenerationStarted,
    PathGenerated,
    ProximityFallback,
    CurveBuilt,
    DegenerateFrames,
    MeshBuilt,
    GenerationFinished,
    Warning,
}

impl TrackEvent {
    pub fn kind(&self) -> TrackEventKind {
        match self {
            TrackEvent::GenerationStarted { .. } => TrackEventKind::GenerationStarted,
            TrackEvent::PathGenerated { .. } => TrackEventKind::PathGenerated,
            TrackEvent::ProximityFallback { .. } => TrackEventKind::ProximityFallback,
            TrackEvent::CurveBuilt { .. } => TrackEventKind::CurveBuilt,
            TrackEvent::DegenerateFrames { .. } => TrackEventKind::DegenerateFrames,
            TrackEvent::MeshBuilt { .. } => TrackEventKind::MeshBuilt,
            TrackEvent::GenerationFinished { .. } => TrackEventKind::GenerationFinished,
            TrackEvent::Warning { .. } => TrackEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`TrackEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: TrackEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&self, _kind: TrackEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = TrackEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: TrackEvent) {}

    #[inline]
    fn wants(&self, _kind: TrackEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(TrackEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(TrackEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(TrackEvent),
{
    #[inline]
    fn send(&mut self, event: TrackEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally only some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<TrackEvent>,
    kinds: Option<Vec<TrackEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            kinds: None,
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
            kinds: None,
        }
    }

    /// Collect only events of the given kinds.
    pub fn with_kinds(kinds: impl IntoIterator<Item = TrackEventKind>) -> Self {
        Self {
            events: Vec::new(),
            kinds: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<TrackEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[TrackEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: TrackEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: TrackEventKind) -> bool {
        self.kinds.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: TrackEvent) {
        let kind = event.kind();
        let Some(last_idx) = self.sinks.iter().rposition(|s| s.wants(kind)) else {
            return;
        };
        for i in 0..last_idx {
            if self.sinks[i].wants(kind) {
                self.sinks[i].send(event.clone());
            }
        }
        self.sinks[last_idx].send(event);
    }

    fn wants(&self, kind: TrackEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}

/// Minimal adapter trait for types that can expose an [`EventSink`].
pub trait AsEventSink {
    fn as_event_sink(&mut self) -> &mut dyn EventSink;
}

impl AsEventSink for VecSink {
    fn as_event_sink(&mut self) -> &mut dyn EventSink {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(context: &str) -> TrackEvent {
        TrackEvent::Warning {
            context: context.into(),
            message: "msg".into(),
        }
    }

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::with_capacity(2);
        assert!(sink.is_empty());
        sink.send(warning("a"));
        sink.send(warning("b"));
        assert_eq!(sink.len(), 2);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn vec_sink_filters_kinds() {
        let mut sink = VecSink::with_kinds([TrackEventKind::ProximityFallback]);
        assert!(!sink.wants(TrackEventKind::Warning));
        sink.send(warning("a"));
        sink.send(TrackEvent::ProximityFallback { index: 3 });
        assert_eq!(
            sink.as_slice(),
            &[TrackEvent::ProximityFallback { index: 3 }]
        );
    }

    #[test]
    fn unit_sink_wants_nothing() {
        assert!(!().wants(TrackEventKind::Warning));
    }

    #[test]
    fn multi_sink_fans_out_events() {
        let mut multi = MultiSink::with_sinks(vec![VecSink::new(), VecSink::new()]);
        multi.send(warning("ctx"));
        assert_eq!(multi.len(), 2);
        assert_eq!(multi.sinks[0].len(), 1);
        assert_eq!(multi.sinks[1].len(), 1);
        matches!(multi.sinks[0].as_slice()[0], TrackEvent::Warning { .. })
            .then_some(())
            .expect("event captured");
    }

    #[test]
    fn multi_sink_skips_sinks_that_opt_out() {
        let mut multi = MultiSink::with_sinks(vec![
            VecSink::new(),
            VecSink::with_kinds([TrackEventKind::MeshBuilt]),
        ]);
        multi.send(warning("ctx"));
        assert_eq!(multi.sinks[0].len(), 1);
        assert!(multi.sinks[1].is_empty());
        assert!(!MultiSink::<VecSink>::new().wants(TrackEventKind::Warning));
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(warning("ctx"));
        assert_eq!(count, 1);
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(warning("x").kind(), TrackEventKind::Warning);
        assert_eq!(
            TrackEvent::DegenerateFrames { indices: vec![1] }.kind(),
            TrackEventKind::DegenerateFrames
        );
    }

    #[test]
    fn as_event_sink_exposes_dyn_sink() {
        let mut sink = VecSink::new();
        sink.as_event_sink().send(warning("dyn"));
        assert_eq!(sink.len(), 1);
    }
}

use loop_track::prelude::*;
use loop_track_examples::{init_tracing, render_track_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let seed = std::env::args().nth(1).unwrap_or_else(|| "hanna".into());
    let plan = TrackPlan::new_with(seed.clone(), WanderPath::new(50, 60.0, 10.0))
        .with_ribbon(RibbonConfig::new(400, 4.0, 0.5));

    let mut sink =
        VecSink::with_kinds([TrackEventKind::GenerationStarted, TrackEventKind::Warning]);
    let track = generate_with_events(&plan, &mut sink)?;
    for event in sink.into_inner() {
        println!("{event:?}");
    }

    println!(
        "seed '{}' -> {:08x?}, {} path points",
        seed,
        track.seed_words,
        track.path.len()
    );
    let out = format!("tracks-wander-{seed}.png");
    let config = RenderConfig::new((1000, 1000)).with_path([30, 90, 200], 2);
    render_track_to_png(&track, &config, out)?;
    Ok(())
}

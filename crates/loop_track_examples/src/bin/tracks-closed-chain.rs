use loop_track::prelude::*;
use loop_track_examples::{init_tracing, render_track_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Fifteen 100 unit edges that sum to zero. Tight tolerances may need a few rounds.
    let chain = ClosedChain::new(15, 100.0, 100.0, 0.1).with_restarts(5);
    let plan = TrackPlan::new_with("hanna", chain)
        .with_smoothing(Smoothing::MovingAverage { window: 3 })
        .with_ribbon(RibbonConfig::new(600, 24.0, 2.0));

    let track = match generate(&plan) {
        Ok(track) => track,
        Err(e) if e.is_recoverable() => {
            println!("no closed chain found ({e}); retrying with a looser tolerance");
            let chain = ClosedChain::new(15, 100.0, 100.0, 10.0).with_restarts(5);
            generate(&TrackPlan::new_with("hanna", chain).with_ribbon(plan.ribbon.clone()))?
        }
        Err(e) => return Err(e.into()),
    };

    println!(
        "chain of {} points, loop length {:.1}",
        track.path.loop_points().len(),
        track.mesh.total_length()
    );
    render_track_to_png(&track, &RenderConfig::new((1000, 1000)), "tracks-closed-chain.png")?;
    Ok(())
}

use loop_track::prelude::*;
use loop_track_examples::{init_tracing, render_track_to_png, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Same plan, random streams from `StdRng` instead of the string seed.
    let plan = TrackPlan::from_params(&TrackParams::default())
        .with_ribbon(RibbonConfig::new(200, 12.0, 1.0));

    let mut longest: Option<Track> = None;
    for stream in 0..8u64 {
        let mut rng = StdRng::seed_from_u64(stream);
        let track = match generate_with_rng(&plan, &mut rng, &mut ()) {
            Ok(track) => track,
            Err(e) if e.is_recoverable() => {
                println!("stream {stream}: {e}");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        println!(
            "stream {stream}: length {:.1}, forced {}, radius {:.1}",
            track.mesh.total_length(),
            track.forced_points().len(),
            track.bounds.radius
        );
        if longest
            .as_ref()
            .is_none_or(|best| track.mesh.total_length() > best.mesh.total_length())
        {
            longest = Some(track);
        }
    }

    let track = longest.ok_or_else(|| anyhow::anyhow!("no stream produced a track"))?;
    render_track_to_png(&track, &RenderConfig::new((1000, 1000)), "tracks-std-rng-batch.png")?;
    Ok(())
}

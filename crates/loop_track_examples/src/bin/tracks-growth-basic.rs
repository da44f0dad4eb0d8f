use loop_track::prelude::*;
use loop_track_examples::{init_tracing, render_track_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Default UI parameters: 30 points, 70° turns, 30..60 steps, 12 wide road.
    let params = TrackParams {
        seed: "hanna".into(),
        ..Default::default()
    };
    let runner = TrackRunner::try_new(TrackPlan::from_params(&params))?;

    let mut sink = VecSink::new();
    let track = runner.run_with_events(&mut sink)?;
    for event in sink.as_slice() {
        println!("{event:?}");
    }

    let camera = track.fit_camera(60.0, &CameraFitConfig::default());
    println!(
        "camera at {:?} looking at {:?} (near {}, far {})",
        camera.eye, camera.target, camera.near, camera.far
    );

    render_track_to_png(&track, &RenderConfig::new((1000, 1000)), "tracks-growth-basic.png")?;
    Ok(())
}

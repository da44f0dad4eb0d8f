use loop_track::prelude::*;
use loop_track_examples::{init_tracing, write_obj};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let ribbon = RibbonConfig::new(300, 12.0, 1.0)
        .with_profile(RibbonProfile::Shouldered {
            shoulder_width: 2.0,
        })
        .with_frame_mode(FrameMode::Transported);
    let plan = TrackPlan::from_params(&TrackParams::default()).with_ribbon(ribbon);
    let track = TrackRunner::try_new(plan)?.run()?;

    for group in &track.mesh.groups {
        println!("{:?}: {} triangles", group.kind, group.count / 3);
    }
    write_obj(&track.mesh, "ribbon-export.obj")?;
    Ok(())
}

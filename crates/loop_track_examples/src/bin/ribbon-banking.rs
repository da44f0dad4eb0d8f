use std::f32::consts::TAU;

use glam::Vec3;
use loop_track::prelude::*;
use loop_track_examples::{init_tracing, render_track_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // An ellipse with a bump: bank angles peak at the tight ends.
    let points: Vec<Vec3> = (0..16)
        .map(|i| {
            let a = i as f32 / 16.0 * TAU;
            Vec3::new(a.cos() * 200.0, (a * 2.0).sin() * 10.0, a.sin() * 80.0)
        })
        .collect();
    let curve = ClosedCurve::new(points)?;

    for (factor, max_deg) in [(0.0, 25.0), (0.4, 25.0), (2.0, 10.0)] {
        let config = RibbonConfig::new(200, 12.0, 1.0).with_banking(factor, max_deg);
        let mesh = extrude_ribbon(&curve, &config)?;
        let peak = mesh
            .banking
            .iter()
            .fold(0.0f32, |acc, b| acc.max(b.abs()))
            .to_degrees();
        println!("factor {factor:.1}, limit {max_deg:>4.1}° -> peak bank {peak:.2}°");
    }

    let plan = TrackPlan::new_with("banked", GrowthPath::new(24))
        .with_ribbon(RibbonConfig::new(300, 12.0, 1.0).with_banking(0.4, 25.0));
    let track = generate(&plan)?;
    render_track_to_png(&track, &RenderConfig::new((1000, 1000)), "ribbon-banking.png")?;
    Ok(())
}

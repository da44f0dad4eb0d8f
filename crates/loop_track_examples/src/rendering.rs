use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use glam::{Vec2, Vec3};
use image::{Rgb, RgbImage};
use loop_track::prelude::*;

/// Install a `fmt` subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

/// Top-down (XZ plane) rendering settings.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    pub background: [u8; 3],
    /// Road color, scaled by the mesh's vertex tint.
    pub road_color: [u8; 3],
    /// Color of the alternating texture repeats.
    pub stripe_color: [u8; 3],
    pub path_color: [u8; 3],
    /// Dot radius in pixels for path points; 0 disables them.
    pub path_radius: i32,
    /// Fraction of the image kept free around the track.
    pub padding: f32,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32)) -> Self {
        Self {
            image_size,
            background: [230, 230, 230],
            road_color: [70, 70, 80],
            stripe_color: [95, 95, 110],
            path_color: [220, 40, 40],
            path_radius: 3,
            padding: 0.05,
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_path(mut self, color: [u8; 3], radius: i32) -> Self {
        self.path_color = color;
        self.path_radius = radius;
        self
    }
}

/// Maps world XZ coordinates into image pixels, preserving aspect ratio.
struct Projection {
    min: Vec2,
    scale: f32,
    offset: Vec2,
}

impl Projection {
    fn fit(min: Vec3, max: Vec3, config: &RenderConfig) -> Self {
        let (w, h) = (config.image_size.0 as f32, config.image_size.1 as f32);
        let usable = Vec2::new(w, h) * (1.0 - 2.0 * config.padding);
        let extent = Vec2::new(max.x - min.x, max.z - min.z).max(Vec2::splat(1e-3));
        let scale = (usable.x / extent.x).min(usable.y / extent.y);
        let offset = (Vec2::new(w, h) - extent * scale) * 0.5;
        Self {
            min: Vec2::new(min.x, min.z),
            scale,
            offset,
        }
    }

    fn apply(&self, p: Vec3) -> Vec2 {
        (Vec2::new(p.x, p.z) - self.min) * self.scale + self.offset
    }
}

/// Render the road surface and the generated path of `track` to a PNG at `out`.
pub fn render_track_to_png(
    track: &Track,
    config: &RenderConfig,
    out: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (min, max) = track
        .mesh
        .aabb()
        .ok_or_else(|| anyhow::anyhow!("track mesh is empty"))?;
    let projection = Projection::fit(min, max, config);
    let mut img = RgbImage::from_pixel(
        config.image_size.0,
        config.image_size.1,
        Rgb(config.background),
    );

    let mesh = &track.mesh;
    for tri in mesh.indices_of(StripKind::Road).chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
        let corners = [a, b, c].map(|i| projection.apply(Vec3::from_array(mesh.positions[i])));
        // Alternate colors per texture repeat; the triangle's first vertex decides.
        let repeat = mesh.uvs[a][0].floor() as i64;
        let base = if repeat.rem_euclid(2) == 0 {
            config.road_color
        } else {
            config.stripe_color
        };
        let color = tinted(base, mesh.colors[a]);
        fill_triangle(&mut img, corners, color);
    }

    if config.path_radius > 0 {
        for p in &track.path.points {
            let c = projection.apply(*p);
            fill_disc(&mut img, c, config.path_radius, config.path_color);
        }
    }

    img.save(out.as_ref())?;
    tracing::info!("Wrote {}.", out.as_ref().display());
    Ok(())
}

fn tinted(base: [u8; 3], tint: [f32; 3]) -> [u8; 3] {
    std::array::from_fn(|k| (base[k] as f32 * tint[k]).clamp(0.0, 255.0) as u8)
}

fn fill_triangle(img: &mut RgbImage, [a, b, c]: [Vec2; 3], color: [u8; 3]) {
    let area = (b - a).perp_dot(c - a);
    if area.abs() < 1e-6 {
        return;
    }
    let lo = a.min(b).min(c).floor().max(Vec2::ZERO);
    let hi = a
        .max(b)
        .max(c)
        .ceil()
        .min(Vec2::new(img.width() as f32 - 1.0, img.height() as f32 - 1.0));
    if lo.x > hi.x || lo.y > hi.y {
        return;
    }
    for y in lo.y as u32..=hi.y as u32 {
        for x in lo.x as u32..=hi.x as u32 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let w0 = (c - b).perp_dot(p - b) / area;
            let w1 = (a - c).perp_dot(p - c) / area;
            let w2 = 1.0 - w0 - w1;
            if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                img.put_pixel(x, y, Rgb(color));
            }
        }
    }
}

fn fill_disc(img: &mut RgbImage, center: Vec2, radius: i32, color: [u8; 3]) {
    let (cx, cy) = (center.x as i32, center.y as i32);
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
                img.put_pixel(x as u32, y as u32, Rgb(color));
            }
        }
    }
}

/// Write `mesh` as a Wavefront OBJ with positions, UVs and normals.
///
/// Vertex colors are appended to `v` lines, a common OBJ extension.
pub fn write_obj(mesh: &RibbonMesh, out: impl AsRef<Path>) -> anyhow::Result<()> {
    let mut w = BufWriter::new(File::create(out.as_ref())?);
    writeln!(w, "# loop_track ribbon, {} vertices", mesh.vertex_count())?;
    for (p, c) in mesh.positions.iter().zip(&mesh.colors) {
        writeln!(
            w,
            "v {} {} {} {} {} {}",
            p[0], p[1], p[2], c[0], c[1], c[2]
        )?;
    }
    for uv in &mesh.uvs {
        writeln!(w, "vt {} {}", uv[0], uv[1])?;
    }
    for n in &mesh.normals {
        writeln!(w, "vn {} {} {}", n[0], n[1], n[2])?;
    }
    for group in &mesh.groups {
        writeln!(w, "g {:?}", group.kind)?;
        for tri in mesh.indices[group.range()].chunks_exact(3) {
            let [a, b, c] = [tri[0] + 1, tri[1] + 1, tri[2] + 1];
            writeln!(w, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
        }
    }
    w.flush()?;
    tracing::info!("Wrote {}.", out.as_ref().display());
    Ok(())
}

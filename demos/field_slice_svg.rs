//! Renders one z-slice of the nearest-seed field as an SVG, colouring every lattice
//! vertex by the seed that owns it.
//!
//! Usage: `cargo run --example field_slice_svg [density] [point_count]`

use plotters::prelude::*;
use voroblock::{rebuild, Mulberry32Sampler, Params};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let mut args = std::env::args().skip(1);
    let density: f64 = match args.next() {
        Some(v) => v.parse()?,
        None => 32.0,
    };
    let point_count: usize = match args.next() {
        Some(v) => v.parse()?,
        None => 16,
    };

    let params = Params { density, point_count, smoothing: 0, ..Params::default() };
    let d = rebuild(&params, &Mulberry32Sampler)?;
    let grid = &d.grid;
    let h = d.bounds.half_extents();

    let filename = "field_slice.svg";
    let root = SVGBackend::new(filename, (1024, 1024)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(-h[0]..h[0], -h[1]..h[1])?;

    // Slice through the middle of the box.
    let z = grid.vertices[2] / 2;
    let [sx, sy, _] = grid.step;
    for y in 0..grid.vertices[1] {
        for x in 0..grid.vertices[0] {
            let Some(owner) = d.field.seed_at(grid, x, y, z) else {
                continue;
            };
            let [px, py, _] = grid.position(x, y, z);
            let color = Palette99::pick(owner).mix(0.8);
            chart.draw_series(std::iter::once(Rectangle::new(
                [(px - sx / 2.0, py - sy / 2.0), (px + sx / 2.0, py + sy / 2.0)],
                color.filled(),
            )))?;
        }
    }

    // Box outline.
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(-h[0], -h[1]), (h[0], -h[1]), (h[0], h[1]), (-h[0], h[1]), (-h[0], -h[1])],
        BLACK.stroke_width(2),
    )))?;

    // Seeds projected onto the slice.
    chart.draw_series(d.seeds.iter().map(|s| Circle::new((s[0], s[1]), 4, BLACK.filled())))?;

    root.present()?;
    println!("Output saved to {}", filename);
    Ok(())
}

//! Basic sparkline example.
//!
//! Mounts one chart on a small raster, ticks it a few times and prints the
//! result as ASCII art.
//!
//! Run: `cargo run --example basic`

use sparkline_core::{Chart, ChartConfig, PixelSurface, SurfaceRegistry};

fn main() {
    let mut chart = Chart::new(ChartConfig::default()).expect("default config is valid");

    let mut surfaces = SurfaceRegistry::new();
    surfaces.attach(chart.id().as_str(), PixelSurface::new(60, 12));

    for _ in 0..10 {
        chart.tick(&mut surfaces);
    }

    if let Some(surface) = surfaces.get(chart.id().as_str()) {
        println!("{}", surface.to_ascii('█', ' '));
    }

    let (lo, hi) = chart.window().min_max().unwrap_or_default();
    println!(
        "\n{}  {} samples  min {lo:+.3}  max {hi:+.3}",
        chart.id(),
        chart.window().len()
    );

    chart.unmount(&mut surfaces);
}

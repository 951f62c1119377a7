use sparkline_core::{ChartConfig, PixelSurface, SurfaceRegistry};

pub struct SnapshotConfig {
    pub config: ChartConfig,
    pub seed: Option<u64>,
    pub ticks: u64,
    pub width: u32,
    pub height: u32,
    pub json: bool,
}

pub fn run(cfg: SnapshotConfig) {
    let mut chart = super::mount_chart(cfg.config, cfg.seed);
    let mut surfaces = SurfaceRegistry::new();
    surfaces.attach(chart.id().as_str(), PixelSurface::new(cfg.width, cfg.height));

    for _ in 0..cfg.ticks {
        chart.tick(&mut surfaces);
    }
    let painted = chart.draw(&mut surfaces);

    let window = chart.window();
    let (lo, hi) = window.min_max().unwrap_or_default();

    if cfg.json {
        let json = serde_json::json!({
            "id": chart.id().as_str(),
            "config": chart.config(),
            "seed": cfg.seed,
            "ticks": chart.ticks(),
            "cursor": window.cursor(),
            "min": lo,
            "max": hi,
            "samples": window.samples(),
        });
        match serde_json::to_string_pretty(&json) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    } else {
        if painted && let Some(surface) = surfaces.get(chart.id().as_str()) {
            let border = "─".repeat(cfg.width as usize);
            println!("┌{border}┐");
            for row in surface.to_ascii('█', ' ').lines() {
                println!("│{row}│");
            }
            println!("└{border}┘");
        } else {
            println!("(nothing to paint on a {}x{} surface)", cfg.width, cfg.height);
        }
        println!(
            "{}  style={}  capacity={}  speed={}  ticks={}  min={lo:+.3}  max={hi:+.3}",
            chart.id(),
            chart.style(),
            window.capacity(),
            chart.config().speed,
            chart.ticks(),
        );
    }

    chart.unmount(&mut surfaces);
}

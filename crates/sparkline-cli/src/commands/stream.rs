use std::io::Write;
use std::time::{Duration, Instant};

use sparkline_core::{Chart, ChartConfig, DisplayList, SurfaceRegistry};

/// Longest nap between polls.
const MAX_POLL_SLEEP: Duration = Duration::from_millis(10);

pub fn run(config: ChartConfig, seed: Option<u64>, max_ticks: u64, format: &str) {
    let mut chart = super::mount_chart(config, seed);

    // Headless: no surface is ever bound, so every paint is skipped while the
    // window keeps advancing.
    let mut headless: SurfaceRegistry<DisplayList> = SurfaceRegistry::new();

    let token = chart.start(Instant::now());
    let handler_token = token.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        log::warn!("could not install Ctrl-C handler: {e}");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if format == "csv" && writeln!(out, "tick,cursor,latest,min,max").is_err() {
        chart.unmount(&mut headless);
        return;
    }

    let nap = chart.config().interval().min(MAX_POLL_SLEEP);
    while !token.is_cancelled() {
        if chart.poll(Instant::now(), &mut headless) > 0 {
            let line = format_line(&chart, format);
            if writeln!(out, "{line}").is_err() {
                break; // Broken pipe
            }
            let _ = out.flush();

            if max_ticks > 0 && chart.ticks() >= max_ticks {
                break;
            }
        }
        std::thread::sleep(nap);
    }

    chart.unmount(&mut headless);
}

fn format_line(chart: &Chart, format: &str) -> String {
    let window = chart.window();
    match format {
        "csv" => {
            let (lo, hi) = window.min_max().unwrap_or_default();
            format!(
                "{},{},{:.6},{lo:.6},{hi:.6}",
                chart.ticks(),
                window.cursor(),
                window.latest().unwrap_or_default(),
            )
        }
        _ => serde_json::json!({
            "tick": chart.ticks(),
            "cursor": window.cursor(),
            "samples": window.samples(),
        })
        .to_string(),
    }
}

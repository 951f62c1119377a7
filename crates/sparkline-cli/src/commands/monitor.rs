use sparkline_core::ChartConfig;

pub fn run(config: ChartConfig, charts: usize, seed: Option<u64>) {
    let mut app = crate::tui::app::App::new(config, charts, seed);
    if let Err(e) = app.run() {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}

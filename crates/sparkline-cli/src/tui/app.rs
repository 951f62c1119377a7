//! TUI application state and event loop.
//!
//! Design: a grid of independent charts. Each chart owns its noise field,
//! window and tick schedule; the app owns the surfaces and binds one to each
//! chart id. The loop polls every chart once per frame, so ticks run on the
//! UI thread and never overlap.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use sparkline_core::{Chart, ChartConfig, DisplayList, Surface, SurfaceRegistry};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Most charts the grid will hold.
pub const MAX_CHARTS: usize = 9;

/// Fastest tick period reachable with `+`.
const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Slowest tick period reachable with `-`.
const MAX_INTERVAL: Duration = Duration::from_secs(5);

/// How long the loop waits for a key before polling the charts again.
const FRAME_POLL: Duration = Duration::from_millis(20);

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    config: ChartConfig,
    seed: Option<u64>,
    charts: Vec<Chart>,
    surfaces: SurfaceRegistry<DisplayList>,
    /// Surfaces pulled out of the registry with `d`, keyed by chart id.
    parked: HashMap<String, DisplayList>,
    focus: usize,
    running: bool,
    paused: bool,
    mounted_total: u64,
    last_export: Option<PathBuf>,
    status: Option<String>,
}

impl App {
    pub fn new(config: ChartConfig, charts: usize, seed: Option<u64>) -> Self {
        let mut app = Self {
            config,
            seed,
            charts: Vec::new(),
            surfaces: SurfaceRegistry::new(),
            parked: HashMap::new(),
            focus: 0,
            running: true,
            paused: false,
            mounted_total: 0,
            last_export: None,
            status: None,
        };
        for _ in 0..charts.clamp(1, MAX_CHARTS) {
            app.mount_chart();
        }
        app
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook that restores terminal before printing the panic.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        // Tear charts down before the surfaces go away, on every exit path.
        self.unmount_all();

        let _ = std::panic::take_hook(); // remove our hook
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        if let Some(path) = &self.last_export {
            println!("Snapshot saved to {}", path.display());
        }

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        self.start_all(Instant::now());

        while self.running {
            let size = terminal.size()?;
            self.sync_surfaces(Rect::new(0, 0, size.width, size.height));

            terminal.draw(|f| super::ui::draw(f, self))?;

            if event::poll(FRAME_POLL)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key.code);
            }

            self.poll_charts(Instant::now());
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => {
                if !self.charts.is_empty() {
                    self.focus = (self.focus + 1) % self.charts.len();
                }
            }
            KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => {
                if !self.charts.is_empty() {
                    self.focus = (self.focus + self.charts.len() - 1) % self.charts.len();
                }
            }
            KeyCode::Char('p') => self.toggle_pause(Instant::now()),
            KeyCode::Char('r') => self.redraw_all(),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char(']') => {
                let faster = (self.config.interval() / 2).max(MIN_INTERVAL);
                self.set_interval(faster, Instant::now());
            }
            KeyCode::Char('-') | KeyCode::Char('[') => {
                let slower = (self.config.interval() * 2).min(MAX_INTERVAL);
                self.set_interval(slower, Instant::now());
            }
            KeyCode::Char('d') => self.toggle_surface(self.focus),
            KeyCode::Char('a') => {
                if self.charts.len() < MAX_CHARTS {
                    self.mount_chart();
                    if !self.paused
                        && let Some(chart) = self.charts.last_mut()
                    {
                        chart.start(Instant::now());
                    }
                    self.focus = self.charts.len() - 1;
                }
            }
            KeyCode::Char('x') => self.remove_chart(self.focus),
            KeyCode::Char('s') => self.export_snapshot(),
            _ => {}
        }
    }

    // --- Chart lifecycle ---

    fn mount_chart(&mut self) {
        let mounted = match self.seed {
            Some(seed) => Chart::seeded(self.config, seed.wrapping_add(self.mounted_total)),
            None => Chart::new(self.config),
        };
        match mounted {
            Ok(chart) => {
                // Zero-sized until the first layout pass gives it real pixels.
                self.surfaces
                    .attach(chart.id().as_str(), DisplayList::new(0, 0));
                self.charts.push(chart);
                self.mounted_total += 1;
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn remove_chart(&mut self, idx: usize) {
        if self.charts.len() <= 1 || idx >= self.charts.len() {
            return;
        }
        let chart = self.charts.remove(idx);
        self.parked.remove(chart.id().as_str());
        chart.unmount(&mut self.surfaces);
        self.focus = self.focus.min(self.charts.len() - 1);
    }

    fn unmount_all(&mut self) {
        for chart in self.charts.drain(..) {
            chart.unmount(&mut self.surfaces);
        }
        self.parked.clear();
    }

    fn start_all(&mut self, now: Instant) {
        for chart in &mut self.charts {
            chart.start(now);
        }
    }

    fn toggle_pause(&mut self, now: Instant) {
        self.paused = !self.paused;
        if self.paused {
            for chart in &mut self.charts {
                chart.stop();
            }
        } else {
            self.start_all(now);
        }
    }

    fn set_interval(&mut self, interval: Duration, now: Instant) {
        self.config.interval_ms = interval.as_millis() as u64;
        for chart in &mut self.charts {
            chart.set_interval(interval, now);
        }
    }

    /// Run every tick due at `now`. Returns how many ran across all charts.
    pub fn poll_charts(&mut self, now: Instant) -> usize {
        if self.paused {
            return 0;
        }
        self.charts
            .iter_mut()
            .map(|chart| chart.poll(now, &mut self.surfaces))
            .sum()
    }

    fn redraw_all(&mut self) {
        for chart in &self.charts {
            chart.draw(&mut self.surfaces);
        }
    }

    // --- Surfaces ---

    /// Size every surface to its grid cell for a terminal of `area`, and
    /// repaint the charts whose surface changed size.
    pub fn sync_surfaces(&mut self, area: Rect) {
        let rects = super::ui::chart_rects(area, self.charts.len());
        for (chart, rect) in self.charts.iter().zip(rects) {
            let (w, h) = super::ui::surface_size(rect);
            let id = chart.id().as_str();
            if let Some(surface) = self.surfaces.get_mut(id) {
                if surface.width() != w || surface.height() != h {
                    surface.resize(w, h);
                    chart.draw(&mut self.surfaces);
                }
            } else if let Some(surface) = self.parked.get_mut(id) {
                surface.resize(w, h);
            }
        }
    }

    /// Detach the chart's surface, or reattach it and repaint.
    fn toggle_surface(&mut self, idx: usize) {
        let Some(chart) = self.charts.get(idx) else {
            return;
        };
        let id = chart.id().as_str();
        if let Some(surface) = self.surfaces.detach(id) {
            self.parked.insert(id.to_string(), surface);
        } else if let Some(surface) = self.parked.remove(id) {
            self.surfaces.attach(id, surface);
            chart.draw(&mut self.surfaces);
        }
    }

    fn export_snapshot(&mut self) {
        let Some(chart) = self.charts.get(self.focus) else {
            return;
        };
        let window = chart.window();
        let json = serde_json::json!({
            "id": chart.id().as_str(),
            "config": chart.config(),
            "ticks": chart.ticks(),
            "cursor": window.cursor(),
            "samples": window.samples(),
        });

        let epoch = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let path = PathBuf::from(format!("sparkline-snapshot-{epoch}.json"));

        match serde_json::to_string_pretty(&json) {
            Ok(contents) => match std::fs::write(&path, contents) {
                Ok(()) => {
                    self.status = Some(format!("saved {}", path.display()));
                    self.last_export = Some(path);
                }
                Err(e) => self.status = Some(format!("export failed: {e}")),
            },
            Err(e) => self.status = Some(format!("export failed: {e}")),
        }
    }

    // --- Public accessors ---

    pub fn charts(&self) -> &[Chart] {
        &self.charts
    }
    pub fn focus(&self) -> usize {
        self.focus
    }
    pub fn is_paused(&self) -> bool {
        self.paused
    }
    pub fn interval_ms(&self) -> u64 {
        self.config.interval_ms
    }
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
    pub fn surface(&self, chart: &Chart) -> Option<&DisplayList> {
        self.surfaces.get(chart.id().as_str())
    }
    pub fn is_detached(&self, chart: &Chart) -> bool {
        self.parked.contains_key(chart.id().as_str())
    }
    pub fn total_ticks(&self) -> u64 {
        self.charts.iter().map(Chart::ticks).sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

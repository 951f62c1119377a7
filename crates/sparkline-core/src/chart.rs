//! Chart facade: one window, one style, one surface binding, one schedule.
//!
//! Lifecycle:
//! 1. [`Chart::new`] validates the config, mints a fresh id, builds a
//!    [`NoiseField`] and fills the [`SampleWindow`]. An invalid config never
//!    produces a chart, so nothing can be scheduled for it.
//! 2. [`Chart::start`] arms the tick schedule; the host calls [`Chart::poll`]
//!    from its loop, or [`Chart::tick`] / [`Chart::draw`] directly.
//! 3. [`Chart::unmount`] (or drop) cancels the schedule before the surface
//!    binding is released.

use std::time::{Duration, Instant};

use log::{debug, trace, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ChartError, Result};
use crate::noise::NoiseField;
use crate::render::ChartStyle;
use crate::schedule::{CancelToken, Ticker};
use crate::surface::SurfaceHost;
use crate::window::SampleWindow;

// ---------------------------------------------------------------------------
// ChartConfig
// ---------------------------------------------------------------------------

pub const DEFAULT_CAPACITY: usize = 24;
pub const DEFAULT_SPEED: usize = 2;
pub const DEFAULT_INTERVAL_MS: u64 = 250;

/// Host-facing chart settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Samples kept in the rolling window.
    pub capacity: usize,
    /// Samples appended (and evicted) per tick.
    pub speed: usize,
    /// Paint style.
    pub style: ChartStyle,
    /// Tick period in milliseconds.
    pub interval_ms: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            speed: DEFAULT_SPEED,
            style: ChartStyle::default(),
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl ChartConfig {
    /// Reject zero capacity, speed or interval.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(ChartError::invalid("capacity must be positive"));
        }
        if self.speed == 0 {
            return Err(ChartError::invalid("speed must be positive"));
        }
        if self.interval_ms == 0 {
            return Err(ChartError::invalid("interval_ms must be positive"));
        }
        Ok(())
    }

    /// Parse and validate a JSON config document. Missing fields take their
    /// defaults; unknown styles are rejected.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ChartError::invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

// ---------------------------------------------------------------------------
// ChartId
// ---------------------------------------------------------------------------

/// Unique chart identity; also the key its surface is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChartId(String);

impl ChartId {
    /// Fresh `chart-<uuid v4>` id.
    pub fn generate() -> Self {
        Self(format!("chart-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChartId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Chart
// ---------------------------------------------------------------------------

/// A live sparkline.
#[derive(Debug)]
pub struct Chart {
    id: ChartId,
    config: ChartConfig,
    field: NoiseField,
    window: SampleWindow,
    ticker: Option<Ticker>,
    ticks: u64,
}

impl Chart {
    /// Mount a chart seeded from the thread RNG.
    pub fn new(config: ChartConfig) -> Result<Self> {
        Self::with_rng(config, &mut rand::rng())
    }

    /// Mount a chart whose noise field is drawn from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(config: ChartConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_field(config, NoiseField::new(rng)))
    }

    /// Mount a chart whose noise field comes from a fixed seed.
    pub fn seeded(config: ChartConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_field(config, NoiseField::seeded(seed)))
    }

    fn with_field(config: ChartConfig, field: NoiseField) -> Self {
        let window = SampleWindow::initialize(config.capacity, &field);
        let id = ChartId::generate();
        debug!(
            "mounted {id}: capacity={} speed={} style={}",
            config.capacity, config.speed, config.style
        );
        Self {
            id,
            config,
            field,
            window,
            ticker: None,
            ticks: 0,
        }
    }

    pub fn id(&self) -> &ChartId {
        &self.id
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn style(&self) -> ChartStyle {
        self.config.style
    }

    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    pub fn field(&self) -> &NoiseField {
        &self.field
    }

    /// Ticks applied since mount.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance the window by `speed` samples, then repaint.
    ///
    /// The data advances whether or not the surface is reachable. Returns
    /// whether a paint happened.
    pub fn tick<H: SurfaceHost + ?Sized>(&mut self, host: &mut H) -> bool {
        self.advance();
        self.draw(host)
    }

    fn advance(&mut self) {
        self.window.tick(&self.field, self.config.speed);
        self.ticks += 1;
        trace!(
            "{} tick #{} cursor={}",
            self.id,
            self.ticks,
            self.window.cursor()
        );
    }

    /// Repaint the current window without advancing it.
    ///
    /// A missing or zero-sized surface skips the paint. Returns whether a
    /// paint happened.
    pub fn draw<H: SurfaceHost + ?Sized>(&self, host: &mut H) -> bool {
        match self.try_draw(host) {
            Ok(()) => true,
            Err(e) if e.is_transient() => {
                debug!("{}: skipped paint ({e})", self.id);
                false
            }
            Err(e) => {
                warn!("{}: paint failed: {e}", self.id);
                false
            }
        }
    }

    /// Repaint, reporting [`ChartError::SurfaceUnavailable`] instead of
    /// absorbing it.
    pub fn try_draw<H: SurfaceHost + ?Sized>(&self, host: &mut H) -> Result<()> {
        let surface = host
            .surface_mut(self.id.as_str())
            .ok_or_else(|| ChartError::SurfaceUnavailable(format!("no surface for {}", self.id)))?;
        if !surface.is_drawable() {
            return Err(ChartError::SurfaceUnavailable(format!(
                "surface for {} is {}x{}",
                self.id,
                surface.width(),
                surface.height()
            )));
        }
        self.config.style.render(surface, self.window.samples());
        Ok(())
    }

    /// Arm the periodic schedule, replacing (and cancelling) any previous
    /// one. The returned token cancels it from elsewhere.
    pub fn start(&mut self, now: Instant) -> CancelToken {
        self.stop();
        let ticker = Ticker::new(self.config.interval(), now);
        let token = ticker.token();
        self.ticker = Some(ticker);
        token
    }

    /// Run every tick that is due at `now`. Returns how many ran; 0 when not
    /// started or cancelled.
    pub fn poll<H: SurfaceHost + ?Sized>(&mut self, now: Instant, host: &mut H) -> usize {
        let due = match self.ticker.as_mut() {
            Some(ticker) => ticker.due(now),
            None => 0,
        };
        if due == 0 {
            return 0;
        }
        for _ in 0..due {
            self.advance();
        }
        self.draw(host);
        due
    }

    pub fn is_running(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Change the tick period of a running schedule.
    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        self.config.interval_ms = interval.as_millis().max(1) as u64;
        if let Some(ticker) = self.ticker.as_mut() {
            ticker.set_interval(interval, now);
        }
    }

    /// Cancel the schedule. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    /// Tear down: cancel the schedule, then release the surface binding.
    pub fn unmount<H: SurfaceHost + ?Sized>(mut self, host: &mut H) {
        self.stop();
        let released = host.release(self.id.as_str());
        debug!("unmounted {} (surface released: {released})", self.id);
    }
}

impl Drop for Chart {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DisplayList, DrawOp, Surface, SurfaceRegistry};

    fn mounted(config: ChartConfig) -> (Chart, SurfaceRegistry<DisplayList>) {
        let chart = Chart::seeded(config, 42).unwrap();
        let mut reg = SurfaceRegistry::new();
        reg.attach(chart.id().as_str(), DisplayList::new(120, 40));
        (chart, reg)
    }

    #[test]
    fn default_config_matches_host_defaults() {
        let c = ChartConfig::default();
        assert_eq!(c.capacity, 24);
        assert_eq!(c.speed, 2);
        assert_eq!(c.style, ChartStyle::TrendLine);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = ChartConfig {
            capacity: 0,
            ..Default::default()
        };
        let err = Chart::new(config).unwrap_err();
        assert!(matches!(err, ChartError::InvalidConfiguration(_)));
    }

    #[test]
    fn zero_speed_and_interval_are_rejected() {
        for config in [
            ChartConfig {
                speed: 0,
                ..Default::default()
            },
            ChartConfig {
                interval_ms: 0,
                ..Default::default()
            },
        ] {
            assert!(matches!(
                Chart::seeded(config, 1),
                Err(ChartError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn from_json_fills_defaults_and_rejects_unknown_style() {
        let c = ChartConfig::from_json(r#"{"capacity": 10}"#).unwrap();
        assert_eq!(c.capacity, 10);
        assert_eq!(c.speed, DEFAULT_SPEED);

        let err = ChartConfig::from_json(r#"{"style": "pie"}"#).unwrap_err();
        assert!(matches!(err, ChartError::InvalidConfiguration(_)));

        let err = ChartConfig::from_json(r#"{"capacity": 0}"#).unwrap_err();
        assert!(matches!(err, ChartError::InvalidConfiguration(_)));
    }

    #[test]
    fn mounted_chart_has_full_window() {
        let (chart, _) = mounted(ChartConfig::default());
        assert_eq!(chart.window().len(), 24);
        assert_eq!(chart.ticks(), 0);
        assert!(!chart.is_running());
    }

    #[test]
    fn ids_are_unique() {
        let a = Chart::new(ChartConfig::default()).unwrap();
        let b = Chart::new(ChartConfig::default()).unwrap();
        assert_ne!(a.id(), b.id());
        assert!(a.id().as_str().starts_with("chart-"));
    }

    #[test]
    fn draw_paints_bound_surface() {
        let (chart, mut reg) = mounted(ChartConfig::default());
        assert!(chart.draw(&mut reg));
        let dl = reg.get(chart.id().as_str()).unwrap();
        assert_eq!(dl.line_count(), 23);
    }

    #[test]
    fn draw_is_idempotent() {
        let (chart, mut reg) = mounted(ChartConfig::default());
        chart.draw(&mut reg);
        let first = reg.get(chart.id().as_str()).unwrap().clone();
        chart.draw(&mut reg);
        chart.draw(&mut reg);
        assert_eq!(reg.get(chart.id().as_str()).unwrap(), &first);
    }

    #[test]
    fn missing_surface_is_absorbed_but_data_advances() {
        let mut chart = Chart::seeded(ChartConfig::default(), 3).unwrap();
        let mut reg: SurfaceRegistry<DisplayList> = SurfaceRegistry::new();
        let before = chart.window().cursor();

        assert!(!chart.tick(&mut reg));
        assert_eq!(chart.window().cursor(), before + 2);
        assert!(matches!(
            chart.try_draw(&mut reg),
            Err(ChartError::SurfaceUnavailable(_))
        ));

        // Surface comes back: the next draw shows the accumulated window.
        reg.attach(chart.id().as_str(), DisplayList::new(50, 20));
        assert!(chart.draw(&mut reg));
    }

    #[test]
    fn zero_sized_surface_is_unavailable() {
        let chart = Chart::seeded(ChartConfig::default(), 3).unwrap();
        let mut reg = SurfaceRegistry::new();
        reg.attach(chart.id().as_str(), DisplayList::new(0, 20));
        let err = chart.try_draw(&mut reg).unwrap_err();
        assert!(err.is_transient());
    }

    #[test]
    fn tick_advances_window_and_repaints() {
        let (mut chart, mut reg) = mounted(ChartConfig::default());
        let old = chart.window().samples().to_vec();
        assert!(chart.tick(&mut reg));
        assert_eq!(chart.window().samples()[..22], old[2..]);
        assert_eq!(chart.ticks(), 1);
    }

    #[test]
    fn poll_runs_due_ticks_only_while_started() {
        let (mut chart, mut reg) = mounted(ChartConfig {
            interval_ms: 100,
            ..Default::default()
        });
        let t0 = Instant::now();
        assert_eq!(chart.poll(t0 + Duration::from_secs(1), &mut reg), 0);

        chart.start(t0);
        assert!(chart.is_running());
        assert_eq!(chart.poll(t0 + Duration::from_millis(50), &mut reg), 0);
        assert_eq!(chart.poll(t0 + Duration::from_millis(100), &mut reg), 1);
        assert_eq!(chart.ticks(), 1);

        chart.stop();
        assert!(!chart.is_running());
        assert_eq!(chart.poll(t0 + Duration::from_secs(5), &mut reg), 0);
    }

    #[test]
    fn cancel_token_stops_polling() {
        let (mut chart, mut reg) = mounted(ChartConfig::default());
        let t0 = Instant::now();
        let token = chart.start(t0);
        token.cancel();
        assert!(!chart.is_running());
        assert_eq!(chart.poll(t0 + Duration::from_secs(10), &mut reg), 0);
    }

    #[test]
    fn restart_cancels_previous_schedule() {
        let (mut chart, _) = mounted(ChartConfig::default());
        let t0 = Instant::now();
        let first = chart.start(t0);
        let second = chart.start(t0);
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }

    #[test]
    fn unmount_cancels_then_releases() {
        let (mut chart, mut reg) = mounted(ChartConfig::default());
        let token = chart.start(Instant::now());
        let id = chart.id().clone();
        chart.unmount(&mut reg);
        assert!(token.is_cancelled());
        assert!(!reg.contains(id.as_str()));
    }

    #[test]
    fn drop_cancels_schedule() {
        let token = {
            let mut chart = Chart::seeded(ChartConfig::default(), 9).unwrap();
            chart.start(Instant::now())
        };
        assert!(token.is_cancelled());
    }

    #[test]
    fn draw_scales_to_window_extremes() {
        let (chart, mut reg) = mounted(ChartConfig::default());
        chart.draw(&mut reg);
        let dl = reg.get(chart.id().as_str()).unwrap();
        let ys: Vec<f64> = dl
            .ops()
            .iter()
            .flat_map(|op| match op {
                DrawOp::Line(a, b) => vec![a.y, b.y],
                DrawOp::Point(p) => vec![p.y],
            })
            .collect();
        let top = ys.iter().copied().fold(f64::MAX, f64::min);
        let bottom = ys.iter().copied().fold(f64::MIN, f64::max);
        assert!(top.abs() < 1e-9);
        assert!((bottom - dl.height() as f64).abs() < 1e-9);
    }

    #[test]
    fn set_interval_updates_config() {
        let (mut chart, _) = mounted(ChartConfig::default());
        chart.start(Instant::now());
        chart.set_interval(Duration::from_millis(40), Instant::now());
        assert_eq!(chart.config().interval_ms, 40);
    }
}

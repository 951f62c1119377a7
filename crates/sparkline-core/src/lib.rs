//! # sparkline-core
//!
//! **Live noise-driven sparklines.**
//!
//! `sparkline-core` generates a continuous pseudo-random signal from 2D
//! simplex noise, keeps the most recent samples in a fixed-capacity rolling
//! window, and repaints that window as an auto-scaled trend line on whatever
//! surface the host binds to the chart's id.
//!
//! ## Quick Start
//!
//! ```
//! use sparkline_core::{Chart, ChartConfig, DisplayList, SurfaceRegistry};
//!
//! let mut chart = Chart::new(ChartConfig::default()).unwrap();
//! let mut surfaces = SurfaceRegistry::new();
//! surfaces.attach(chart.id().as_str(), DisplayList::new(120, 32));
//!
//! // One tick: 2 new samples in, 2 oldest out, full repaint.
//! assert!(chart.tick(&mut surfaces));
//! assert_eq!(chart.window().len(), 24);
//!
//! chart.unmount(&mut surfaces);
//! assert!(surfaces.is_empty());
//! ```
//!
//! ## Architecture
//!
//! NoiseField → SampleWindow (append, evict prefix) → ChartStyle::render → Surface
//!
//! Every [`Chart`] owns its field, its window and its tick schedule. Surfaces
//! belong to the host and are looked up by id on every draw; a missing surface
//! skips the paint while the data keeps advancing.

pub mod chart;
pub mod error;
pub mod noise;
pub mod raster;
pub mod render;
pub mod schedule;
pub mod surface;
pub mod window;

pub use chart::{
    Chart, ChartConfig, ChartId, DEFAULT_CAPACITY, DEFAULT_INTERVAL_MS, DEFAULT_SPEED,
};
pub use error::{ChartError, Result};
pub use noise::{NoiseField, ScalarField};
pub use raster::PixelSurface;
pub use render::{ChartStyle, trend_points};
pub use schedule::{CancelToken, MAX_CATCH_UP, Ticker};
pub use surface::{DisplayList, DrawOp, Point, Surface, SurfaceHost, SurfaceRegistry};
pub use window::SampleWindow;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

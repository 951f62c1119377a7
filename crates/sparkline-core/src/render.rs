//! Chart styles and the per-style draw routines.
//!
//! Every render is a full repaint: the surface is cleared, then the whole
//! window is drawn again, scaled to the surface's current pixel size and to
//! the window's own min/max.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChartError;
use crate::surface::{Point, Surface};
use crate::window::min_max;

/// How a chart paints its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartStyle {
    /// Consecutive samples joined by straight segments.
    #[default]
    TrendLine,
}

impl ChartStyle {
    /// Every known style.
    pub const ALL: &'static [ChartStyle] = &[ChartStyle::TrendLine];

    /// Canonical config/CLI name.
    pub fn name(self) -> &'static str {
        match self {
            Self::TrendLine => "trend_line",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TrendLine => "Trend line",
        }
    }

    /// Clear `surface` and paint `samples` on it.
    pub fn render(self, surface: &mut dyn Surface, samples: &[f64]) {
        surface.clear();
        match self {
            Self::TrendLine => render_trend_line(surface, samples),
        }
    }
}

impl std::fmt::Display for ChartStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ChartStyle {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trend_line" | "trendline" | "trend-line" => Ok(Self::TrendLine),
            other => Err(ChartError::invalid(format!(
                "unknown chart style '{other}' (expected one of: {})",
                ChartStyle::ALL
                    .iter()
                    .map(|s| s.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// TrendLine
// ---------------------------------------------------------------------------

/// Map samples to pixel space for a `width` × `height` surface.
///
/// The window min lands on `height` (bottom), the max on `0` (top), linear in
/// between. A flat or single-sample series sits at mid-height. A single
/// sample is centered horizontally; otherwise samples spread evenly from
/// `x = 0` to `x = width`.
pub fn trend_points(samples: &[f64], width: u32, height: u32) -> Vec<Point> {
    let Some((lo, hi)) = min_max(samples) else {
        return Vec::new();
    };
    let w = width as f64;
    let h = height as f64;
    let n = samples.len();
    let span = usable_span(lo, hi);

    samples
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let x = if n == 1 {
                w / 2.0
            } else {
                i as f64 * w / (n - 1) as f64
            };
            let y = match span {
                Some(span) => h * (hi - v) / span,
                None => h / 2.0,
            };
            Point::new(x, y)
        })
        .collect()
}

/// `hi - lo` when it can be divided by; `None` for a flat (or non-finite) range.
fn usable_span(lo: f64, hi: f64) -> Option<f64> {
    let span = hi - lo;
    (span > 0.0 && span.is_finite()).then_some(span)
}

fn is_flat(samples: &[f64]) -> bool {
    min_max(samples).is_none_or(|(lo, hi)| usable_span(lo, hi).is_none())
}

fn render_trend_line(surface: &mut dyn Surface, samples: &[f64]) {
    let (width, height) = (surface.width(), surface.height());
    let points = trend_points(samples, width, height);
    match points.as_slice() {
        [] => {}
        [only] => surface.draw_point(*only),
        [first, ..] if is_flat(samples) => {
            surface.draw_line(Point::new(0.0, first.y), Point::new(width as f64, first.y));
        }
        _ => {
            for pair in points.windows(2) {
                surface.draw_line(pair[0], pair[1]);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

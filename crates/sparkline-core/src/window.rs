//! Fixed-capacity rolling window of samples.
//!
//! New values are appended at the back; once the window is over capacity the
//! oldest values are dropped from the front as one contiguous prefix. The
//! window also carries the x coordinate of the next sample, so consecutive
//! ticks walk the noise field forward instead of restarting at zero.

use crate::noise::ScalarField;

/// Row of the field the window walks along.
const SAMPLE_ROW: f64 = 0.0;

/// Rolling window of chronological samples, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleWindow {
    capacity: usize,
    samples: Vec<f64>,
    /// x coordinate the next sample is taken at.
    cursor: u64,
}

impl SampleWindow {
    /// Fill a new window with `field(i, 0)` for `i in 0..capacity`.
    ///
    /// `capacity` must be positive; [`crate::ChartConfig::validate`] enforces
    /// that before a chart builds its window.
    pub fn initialize<F: ScalarField + ?Sized>(capacity: usize, field: &F) -> Self {
        debug_assert!(capacity > 0, "window capacity must be positive");
        let samples = (0..capacity)
            .map(|i| field.sample(i as f64, SAMPLE_ROW))
            .collect();
        Self {
            capacity,
            samples,
            cursor: capacity as u64,
        }
    }

    /// Window over known samples. Only the newest `capacity` are kept and the
    /// cursor starts right after the last one supplied.
    pub fn from_samples(capacity: usize, values: impl IntoIterator<Item = f64>) -> Self {
        let samples: Vec<f64> = values.into_iter().collect();
        let mut window = Self {
            capacity,
            cursor: samples.len() as u64,
            samples,
        };
        window.evict();
        window
    }

    /// Take `speed` new samples at the cursor, append them, then drop the
    /// oldest so the window is back at capacity.
    pub fn tick<F: ScalarField + ?Sized>(&mut self, field: &F, speed: usize) {
        let start = self.cursor;
        let batch: Vec<f64> = (0..speed as u64)
            .map(|k| field.sample((start + k) as f64, SAMPLE_ROW))
            .collect();
        self.cursor = start + speed as u64;
        self.extend(batch);
    }

    /// Append values in order, then evict the front overflow.
    ///
    /// Does not move the cursor: values pushed here did not come from the
    /// field walk.
    pub fn extend(&mut self, values: impl IntoIterator<Item = f64>) {
        self.samples.extend(values);
        self.evict();
    }

    fn evict(&mut self) {
        if self.samples.len() > self.capacity {
            let excess = self.samples.len() - self.capacity;
            self.samples.drain(..excess);
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Current samples, oldest first.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    /// x coordinate the next tick starts sampling at.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Newest sample, if any.
    pub fn latest(&self) -> Option<f64> {
        self.samples.last().copied()
    }

    /// `(min, max)` over the current window, `None` when empty.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        min_max(&self.samples)
    }
}

/// `(min, max)` of a slice, `None` when empty.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

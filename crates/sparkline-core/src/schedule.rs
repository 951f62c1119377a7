//! Cooperative periodic tick schedule.
//!
//! The host polls the ticker from its own loop; nothing runs in the
//! background. Cancellation goes through a [`CancelToken`], which can be
//! cloned out to another context (a Ctrl-C handler, a teardown hook) and
//! turns every later poll into a no-op.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Most ticks a single poll will report after a stall.
pub const MAX_CATCH_UP: usize = 3;

/// Shortest period a ticker accepts.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Periodic schedule polled by the host loop.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    next_due: Instant,
    token: CancelToken,
}

impl Ticker {
    /// Schedule whose first tick falls one `interval` after `now`.
    pub fn new(interval: Duration, now: Instant) -> Self {
        let interval = interval.max(MIN_INTERVAL);
        Self {
            interval,
            next_due: now + interval,
            token: CancelToken::new(),
        }
    }

    /// Number of ticks due at `now`, re-arming for the next period.
    ///
    /// Returns 0 before the deadline and always once cancelled. After a long
    /// stall at most [`MAX_CATCH_UP`] ticks are reported and the schedule is
    /// re-anchored on `now`.
    pub fn due(&mut self, now: Instant) -> usize {
        if self.token.is_cancelled() || now < self.next_due {
            return 0;
        }
        let late = now.duration_since(self.next_due);
        let missed = (late.as_nanos() / self.interval.as_nanos()) as usize;
        let count = missed.saturating_add(1);
        if count > MAX_CATCH_UP {
            self.next_due = now + self.interval;
            return MAX_CATCH_UP;
        }
        self.next_due += self.interval * count as u32;
        count
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the period. The next tick is re-anchored on `now`.
    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        self.interval = interval.max(MIN_INTERVAL);
        self.next_due = now + self.interval;
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Handle that cancels this ticker from elsewhere.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn nothing_due_before_first_period() {
        let t0 = Instant::now();
        let mut t = Ticker::new(100 * MS, t0);
        assert_eq!(t.due(t0), 0);
        assert_eq!(t.due(t0 + 99 * MS), 0);
    }

    #[test]
    fn one_tick_per_elapsed_period() {
        let t0 = Instant::now();
        let mut t = Ticker::new(100 * MS, t0);
        assert_eq!(t.due(t0 + 100 * MS), 1);
        assert_eq!(t.due(t0 + 150 * MS), 0);
        assert_eq!(t.due(t0 + 200 * MS), 1);
    }

    #[test]
    fn catch_up_counts_missed_periods() {
        let t0 = Instant::now();
        let mut t = Ticker::new(100 * MS, t0);
        assert_eq!(t.due(t0 + 250 * MS), 2);
        assert_eq!(t.due(t0 + 299 * MS), 0);
        assert_eq!(t.due(t0 + 300 * MS), 1);
    }

    #[test]
    fn long_stall_is_capped_and_reanchored() {
        let t0 = Instant::now();
        let mut t = Ticker::new(10 * MS, t0);
        let late = t0 + 10_000 * MS;
        assert_eq!(t.due(late), MAX_CATCH_UP);
        assert_eq!(t.due(late + 5 * MS), 0);
        assert_eq!(t.due(late + 10 * MS), 1);
    }

    #[test]
    fn cancelled_ticker_never_fires() {
        let t0 = Instant::now();
        let mut t = Ticker::new(10 * MS, t0);
        let token = t.token();
        token.cancel();
        assert!(t.is_cancelled());
        assert_eq!(t.due(t0 + 1_000 * MS), 0);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let t0 = Instant::now();
        let mut t = Ticker::new(Duration::ZERO, t0);
        assert_eq!(t.interval(), MIN_INTERVAL);
        assert_eq!(t.due(t0 + MS), 1);
    }

    #[test]
    fn set_interval_reanchors() {
        let t0 = Instant::now();
        let mut t = Ticker::new(100 * MS, t0);
        t.set_interval(20 * MS, t0 + 50 * MS);
        assert_eq!(t.due(t0 + 69 * MS), 0);
        assert_eq!(t.due(t0 + 70 * MS), 1);
    }
}

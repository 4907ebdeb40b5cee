//! Logical clocks for match deadlines.
//!
//! Deadlines are compared against a clock that only moves forward. The tick
//! clock stands in for block height; the wall clock reads unix seconds and
//! never reports a value lower than one it already reported.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock: Send + Sync {
    /// Current clock value
    fn now(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

/// Manually advanced tick counter. Clones share the same counter.
#[derive(Clone, Debug, Default)]
pub struct TickClock {
    ticks: Arc<AtomicU64>,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(tick: u64) -> Self {
        Self {
            ticks: Arc::new(AtomicU64::new(tick)),
        }
    }

    /// Advance by `ticks`, saturating at `u64::MAX`. Returns the new value.
    pub fn advance(&self, ticks: u64) -> u64 {
        let mut current = self.ticks.load(Ordering::SeqCst);
        loop {
            let next = current.saturating_add(ticks);
            match self
                .ticks
                .compare_exchange(current, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return next,
                Err(actual) => current = actual,
            }
        }
    }
}

impl Clock for TickClock {
    fn now(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }
}

/// Unix-seconds clock that cannot be rolled back by system time adjustments
#[derive(Debug, Default)]
pub struct WallClock {
    high_water: AtomicU64,
}

impl WallClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for WallClock {
    fn now(&self) -> u64 {
        let observed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let previous = self.high_water.fetch_max(observed, Ordering::SeqCst);
        previous.max(observed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_clock_advances() {
        let clock = TickClock::new();
        assert_eq!(clock.now(), 0);
        assert_eq!(clock.advance(5), 5);
        assert_eq!(clock.now(), 5);
    }

    #[test]
    fn test_tick_clock_clones_share_counter() {
        let clock = TickClock::starting_at(100);
        let handle = clock.clone();
        handle.advance(1);
        assert_eq!(clock.now(), 101);
    }

    #[test]
    fn test_tick_clock_saturates() {
        let clock = TickClock::starting_at(u64::MAX - 1);
        assert_eq!(clock.advance(10), u64::MAX);
    }

    #[test]
    fn test_wall_clock_is_monotonic() {
        let clock = WallClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
        assert!(first > 0);
    }

    #[test]
    fn test_arc_dyn_clock() {
        let clock: Arc<dyn Clock> = Arc::new(TickClock::starting_at(3));
        assert_eq!(clock.now(), 3);
    }
}

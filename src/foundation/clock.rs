use std::cell::Cell;
use std::time::Instant;

/// Monotonic microsecond time source used for step pacing, completion timeouts and phase
/// statistics.
pub trait Clock {
    /// Microseconds since an arbitrary fixed epoch. Never decreases.
    fn now_micros(&self) -> u64;

    /// Microseconds elapsed since `since` (a value previously returned by `now_micros`).
    fn elapsed_since(&self, since: u64) -> u64 {
        self.now_micros().saturating_sub(since)
    }
}

/// Wall-clock time source backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    /// Clock whose epoch is the moment of construction.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_micros(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_micros()).unwrap_or(u64::MAX)
    }
}

/// Simulated time: every reading advances the clock by a fixed tick.
///
/// Spin waits against a `SimClock` terminate after `interval / tick` readings, so transitions
/// run at full speed while still exercising the pacing and timeout paths.
#[derive(Debug)]
pub struct SimClock {
    now: Cell<u64>,
    tick_us: u64,
}

impl SimClock {
    /// Clock at 0 that advances `tick_us` (at least 1) per reading.
    pub fn new(tick_us: u64) -> Self {
        Self {
            now: Cell::new(0),
            tick_us: tick_us.max(1),
        }
    }

    /// Jump forward without a reading.
    pub fn advance(&self, micros: u64) {
        self.now.set(self.now.get().saturating_add(micros));
    }

    /// Current value without advancing.
    pub fn peek(&self) -> u64 {
        self.now.get()
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(1_000)
    }
}

impl Clock for SimClock {
    fn now_micros(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now.saturating_add(self.tick_us));
        now
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_micros(&self) -> u64 {
        (**self).now_micros()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now_micros(&self) -> u64 {
        (**self).now_micros()
    }
}

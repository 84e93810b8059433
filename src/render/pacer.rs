use crate::foundation::clock::Clock;

/// Bounds the step rate of a transition by spinning until a minimum interval has elapsed.
///
/// This is a hard spin-wait: no sleeping or yielding, matching a single-threaded embedded
/// loop where the cadence itself is part of the visual effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FramePacer {
    interval_us: u64,
}

impl FramePacer {
    /// Pacer enforcing `interval_us` between step starts; 0 never waits.
    pub fn new(interval_us: u64) -> Self {
        Self { interval_us }
    }

    /// Minimum step interval.
    pub fn interval_us(self) -> u64 {
        self.interval_us
    }

    /// Spin until at least `interval_us` has elapsed since `step_start`. Returns the elapsed
    /// time observed when the wait ended.
    pub fn wait<C: Clock + ?Sized>(self, clock: &C, step_start: u64) -> u64 {
        loop {
            let elapsed = clock.elapsed_since(step_start);
            if elapsed >= self.interval_us {
                return elapsed;
            }
            std::hint::spin_loop();
        }
    }
}

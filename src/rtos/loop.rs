use core::time::Duration;

use super::{Clock, Instant};

/// Provides a constant-period looping construct.
///
/// Deadlines advance by exactly one period per cycle, so time spent in the
/// loop body does not accumulate as drift.
pub struct Loop {
    delta: Duration,
    next: Instant,
}

impl Loop {
    #[inline]
    /// Creates a new loop object with a given period, starting now.
    pub fn new(clock: &impl Clock, delta: Duration) -> Self {
        Loop {
            delta,
            next: clock.time_since_start() + delta,
        }
    }

    /// The period of the loop.
    pub fn period(&self) -> Duration {
        self.delta
    }

    /// Delays until the next loop cycle.
    pub fn delay(&mut self, clock: &impl Clock) {
        clock.delay_until(self.next);
        self.next += self.delta;
    }
}

//! Clock abstraction and trailing-debounce timer.
//!
//! # Responsibility
//! - Decouple timed behavior from wall-clock time so it can be driven by tests.
//! - Model a debounced write as an explicit handle: arm, cancel, poll.
//!
//! # Invariants
//! - Re-arming replaces the pending deadline; only the last arm in a burst fires.
//! - A fired or cancelled debouncer is idle until armed again.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Clock backed by `Instant::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for deterministic tests and replays.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Trailing-edge debounce timer.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arms (or re-arms) the timer relative to `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drops the pending deadline; returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` exactly once when the pending deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, Debouncer, ManualClock};
    use std::time::Duration;

    #[test]
    fn rearm_pushes_deadline_back() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(Duration::from_millis(1000));

        debouncer.arm(clock.now());
        clock.advance(Duration::from_millis(600));
        debouncer.arm(clock.now());
        clock.advance(Duration::from_millis(600));
        assert!(!debouncer.fire_if_due(clock.now()));

        clock.advance(Duration::from_millis(400));
        assert!(debouncer.fire_if_due(clock.now()));
        assert!(!debouncer.fire_if_due(clock.now()));
    }

    #[test]
    fn cancel_clears_pending_deadline() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));

        assert!(!debouncer.cancel());
        debouncer.arm(clock.now());
        assert!(debouncer.cancel());
        clock.advance(Duration::from_millis(50));
        assert!(!debouncer.fire_if_due(clock.now()));
        assert!(!debouncer.is_pending());
    }
}

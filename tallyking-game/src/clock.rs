//! Wall-clock seam so sessions can be timed deterministically in tests.
use std::cell::Cell;

/// Source of millisecond timestamps (Unix epoch).
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Real time from the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Hand-driven clock for tests and scripted playthroughs.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Cell<i64>,
}

impl ManualClock {
    #[must_use]
    pub const fn starting_at(now_ms: i64) -> Self {
        Self {
            now: Cell::new(now_ms),
        }
    }

    pub fn advance_ms(&self, delta: i64) {
        self.now.set(self.now.get().saturating_add(delta));
    }

    pub fn set_ms(&self, now_ms: i64) {
        self.now.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}

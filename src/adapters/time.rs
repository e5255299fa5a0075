//! Wall-clock adapter.
//!
//! - [`SystemClock`] reads the host clock.
//! - [`FixedClock`] returns a pinned instant that can be advanced manually,
//!   for simulation replays and tests.

use std::cell::Cell;

use chrono::{DateTime, Duration, Utc};

use crate::app::ports::TimePort;

/// Host wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimePort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { now: Cell::new(at) }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl TimePort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

impl<T: TimePort + ?Sized> TimePort for &T {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

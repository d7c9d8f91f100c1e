//! Interval timer measured from the last actual fire
//!
//! Firing sets `last_fired := now`, not `last_fired += interval`. A stall
//! therefore never produces a burst of catch-up fires: the next fire is
//! one full interval after the late one.

use crate::clock::{elapsed, is_due, Interval, Timestamp};

/// One periodic activity's timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntervalTimer {
    interval: Interval,
    last_fired: Timestamp,
}

impl IntervalTimer {
    /// Create a timer that last fired at timestamp zero
    pub const fn new(interval: Interval) -> Self {
        Self {
            interval,
            last_fired: 0,
        }
    }

    /// Configured interval (ms)
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Timestamp of the last fire
    pub fn last_fired(&self) -> Timestamp {
        self.last_fired
    }

    /// Milliseconds since the last fire
    pub fn since_last(&self, now: Timestamp) -> Interval {
        elapsed(now, self.last_fired)
    }

    /// True if the activity should run at `now`
    pub fn is_due(&self, now: Timestamp) -> bool {
        is_due(now, self.last_fired, self.interval)
    }

    /// Record a fire at `now`
    pub fn fire(&mut self, now: Timestamp) {
        self.last_fired = now;
    }

    /// Fire if due; returns whether it fired
    pub fn poll(&mut self, now: Timestamp) -> bool {
        if self.is_due(now) {
            self.fire(now);
            true
        } else {
            false
        }
    }
}

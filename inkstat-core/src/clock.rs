//! Millisecond clock arithmetic
//!
//! Timestamps come from a free-running millisecond counter that wraps at
//! `u32::MAX` (about 49.7 days). Every comparison goes through
//! [`elapsed`], which subtracts with wraparound, so a due-check keeps
//! working across the wrap.

/// Milliseconds since an arbitrary epoch, wrapping at `u32::MAX`
pub type Timestamp = u32;

/// A duration in milliseconds
pub type Interval = u32;

/// Milliseconds per second
pub const ONE_SECOND: Interval = 1000;

/// Milliseconds per minute
pub const ONE_MINUTE: Interval = 60 * ONE_SECOND;

/// Monotonic millisecond clock source
pub trait Clock {
    /// Current timestamp
    fn now_ms(&self) -> Timestamp;
}

/// Milliseconds from `since` to `now`, correct across one counter wrap
#[inline]
pub const fn elapsed(now: Timestamp, since: Timestamp) -> Interval {
    now.wrapping_sub(since)
}

/// The due-check: true once at least `interval` has passed since `last`
#[inline]
pub const fn is_due(now: Timestamp, last: Timestamp, interval: Interval) -> bool {
    elapsed(now, last) >= interval
}

//! Cooperative multi-rate scheduler
//!
//! A single control loop calls [`Scheduler::tick`] as fast as it can.
//! Each call decides independently whether the service pump, the feed
//! poll and the display render are due, and runs the ones that are.

pub mod executor;
pub mod timer;

pub use executor::{Activity, RenderOutcome, Scheduler, TickOutcome};
pub use timer::IntervalTimer;

//! Configuration types
//!
//! The monitor is configured once at startup from compiled-in constants
//! and the resulting [`MonitorConfig`] is handed to the scheduler,
//! observation state and renderer.

pub mod types;

pub use types::*;

//! Board-agnostic core logic for the Inkstat feed monitor
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Millisecond clock arithmetic (wraparound-safe due-checks)
//! - Monitor configuration
//! - Observation state (latest readings and change flags)
//! - The cooperative multi-rate scheduler
//! - Remote session and display traits
//! - Startup connection loop and the bridge-backed remote session

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod clock;
pub mod config;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod traits;

pub use inkstat_protocol::{ConnectionState, FeedId};

//! Observation state
//!
//! Latest readings received from the remote feeds and whether each has
//! changed since the display last consumed it.

pub mod observation;

pub use observation::ObservationState;

//! Collaborator traits
//!
//! These traits define the interface between the monitor logic and the
//! outside world: the remote feed session and the display.

pub mod display;
pub mod session;

pub use display::{DisplayError, ObservationDisplay};
pub use session::{RemoteSession, SessionError, ValueSink};

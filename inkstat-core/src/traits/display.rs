//! Display trait for showing observations

use crate::state::ObservationState;

/// Errors that can occur while committing a frame to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus communication with the panel failed
    Communication,
    /// Panel stayed busy past its refresh timeout
    Timeout,
    /// Drawing into the frame buffer failed
    Draw,
}

/// Something that can show the current readings
pub trait ObservationDisplay {
    /// Draw the readings and commit them to the panel
    ///
    /// Returns `Ok(false)` when there was nothing to show and the panel
    /// was left untouched.
    fn show(&mut self, observations: &ObservationState) -> Result<bool, DisplayError>;
}

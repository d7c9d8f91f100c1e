//! Control-loop tick
//!
//! Owns the pump, poll and render timers plus the first-tick suppression
//! and decides, on every call to [`Scheduler::tick`], which activities run.

use inkstat_protocol::FeedId;

use super::timer::IntervalTimer;
use crate::clock::{Interval, Timestamp};
use crate::config::MonitorConfig;
use crate::state::ObservationState;
use crate::traits::{DisplayError, ObservationDisplay, RemoteSession, SessionError};

/// What happened to a session activity during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Activity {
    /// Not due this tick
    #[default]
    Idle,
    /// Due and performed
    Fired,
    /// Due, performed, and the session reported an error
    Failed(SessionError),
}

impl Activity {
    /// True if the activity was due this tick
    pub fn fired(&self) -> bool {
        !matches!(self, Activity::Idle)
    }

    fn from_result(result: Result<(), SessionError>) -> Self {
        match result {
            Ok(()) => Activity::Fired,
            Err(e) => Activity::Failed(e),
        }
    }
}

/// What happened to the display during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderOutcome {
    /// Render timer not due
    #[default]
    NotDue,
    /// First tick: render timer armed, nothing else checked
    Suppressed,
    /// Due, but no new data worth drawing
    Skipped,
    /// Due and drawn
    Rendered,
    /// Due and handed to the display, which had nothing to show
    NothingToShow,
    /// Due and handed to the display, which failed to commit
    Failed(DisplayError),
}

/// Summary of one tick, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutcome {
    /// Service pump
    pub pump: Activity,
    /// Feed value requests
    pub poll: Activity,
    /// Display refresh
    pub render: RenderOutcome,
}

impl TickOutcome {
    /// True if nothing was due
    pub fn is_idle(&self) -> bool {
        !self.pump.fired() && !self.poll.fired() && self.render == RenderOutcome::NotDue
    }

    /// True if the display was handed the readings
    pub fn display_invoked(&self) -> bool {
        matches!(
            self.render,
            RenderOutcome::Rendered | RenderOutcome::NothingToShow | RenderOutcome::Failed(_)
        )
    }
}

/// Multi-rate scheduler for the monitor control loop
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scheduler {
    /// Remote session service pump
    pump: IntervalTimer,
    /// Feed value requests
    poll: IntervalTimer,
    /// Display refresh
    render: IntervalTimer,
    /// Timestamp of the first tick (valid once `first_tick_seen`)
    started_at: Timestamp,
    /// Set by the first tick, which never renders
    first_tick_seen: bool,
}

impl Scheduler {
    /// Create a scheduler from the monitor configuration
    pub fn new(config: &MonitorConfig) -> Self {
        Self::with_intervals(
            config.pump_interval_ms,
            config.poll_interval_ms,
            config.render_interval_ms,
        )
    }

    /// Create a scheduler with explicit intervals (ms)
    pub const fn with_intervals(pump: Interval, poll: Interval, render: Interval) -> Self {
        Self {
            pump: IntervalTimer::new(pump),
            poll: IntervalTimer::new(poll),
            render: IntervalTimer::new(render),
            started_at: 0,
            first_tick_seen: false,
        }
    }

    /// True once the first tick has run
    pub fn first_tick_seen(&self) -> bool {
        self.first_tick_seen
    }

    /// Timestamp of the first tick, if it has run
    pub fn started_at(&self) -> Option<Timestamp> {
        self.first_tick_seen.then_some(self.started_at)
    }

    /// Service pump timer
    pub fn pump_timer(&self) -> &IntervalTimer {
        &self.pump
    }

    /// Feed poll timer
    pub fn poll_timer(&self) -> &IntervalTimer {
        &self.poll
    }

    /// Display render timer
    pub fn render_timer(&self) -> &IntervalTimer {
        &self.render
    }

    /// Run one pass of the control loop
    ///
    /// Each activity fires at most once per call, however much time has
    /// passed. Session and display failures are reported in the returned
    /// outcome and otherwise ignored; the next due tick simply tries again.
    ///
    /// The very first call never renders: it arms the render timer at
    /// `now` and returns after the pump and poll checks.
    pub fn tick<S, D>(
        &mut self,
        now: Timestamp,
        session: &mut S,
        observations: &mut ObservationState,
        display: &mut D,
    ) -> TickOutcome
    where
        S: RemoteSession + ?Sized,
        D: ObservationDisplay + ?Sized,
    {
        let mut outcome = TickOutcome::default();

        if self.pump.poll(now) {
            outcome.pump = Activity::from_result(session.pump(observations));
        }

        if self.poll.poll(now) {
            outcome.poll = Activity::from_result(request_all(session));
        }

        if !self.first_tick_seen {
            self.first_tick_seen = true;
            self.started_at = now;
            self.render.fire(now);
            outcome.render = RenderOutcome::Suppressed;
            return outcome;
        }

        if self.render.poll(now) {
            outcome.render = if observations.is_render_worthy() {
                let result = display.show(observations);
                observations.mark_rendered();
                match result {
                    Ok(true) => RenderOutcome::Rendered,
                    Ok(false) => RenderOutcome::NothingToShow,
                    Err(e) => RenderOutcome::Failed(e),
                }
            } else {
                RenderOutcome::Skipped
            };
        }

        outcome
    }
}

/// Request every feed; all requests are attempted, the first error is kept
fn request_all<S: RemoteSession + ?Sized>(session: &mut S) -> Result<(), SessionError> {
    let mut result = Ok(());
    for feed in FeedId::ALL {
        if let Err(e) = session.request_value(feed) {
            if result.is_ok() {
                result = Err(e);
            }
        }
    }
    result
}

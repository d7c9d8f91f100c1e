//! Startup connection loop
//!
//! Blocks until the remote service is reachable. There is no timeout and
//! no cancellation: a monitor that cannot connect has nothing to show, so
//! it keeps trying with a fixed delay between checks.

use embedded_hal::delay::DelayNs;
use inkstat_protocol::{ConnectionState, FeedId};

use crate::config::MonitorConfig;
use crate::traits::{RemoteSession, SessionError};

/// Diagnostics for one failed connection check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectAttempt {
    /// 1-based attempt counter
    pub attempt: u32,
    /// Overall status
    pub status: ConnectionState,
    /// Network-level status
    pub network: ConnectionState,
    /// Service-level status
    pub service: ConnectionState,
    /// Set when a reconnect was requested and could not be sent
    pub connect_error: Option<SessionError>,
}

/// Start connecting and wait until the session reports connected
///
/// Calls `on_attempt` once per unsuccessful check, then sleeps
/// `retry_ms`. A session that fell back to [`ConnectionState::Idle`] is
/// asked to connect again. Returns the number of unsuccessful checks.
pub fn wait_for_connection<S, D, F>(
    session: &mut S,
    delay: &mut D,
    retry_ms: u32,
    mut on_attempt: F,
) -> u32
where
    S: RemoteSession + ?Sized,
    D: DelayNs,
    F: FnMut(&ConnectAttempt),
{
    let mut connect_error = session.connect().err();
    let mut attempts = 0u32;

    loop {
        let status = session.status();
        if status.is_connected() {
            return attempts;
        }
        attempts = attempts.saturating_add(1);

        on_attempt(&ConnectAttempt {
            attempt: attempts,
            status,
            network: session.network_status(),
            service: session.service_status(),
            connect_error,
        });

        delay.delay_ms(retry_ms);

        connect_error = if status == ConnectionState::Idle {
            session.connect().err()
        } else {
            None
        };
    }
}

/// Register both configured feeds with the session
pub fn subscribe_feeds<S>(session: &mut S, config: &MonitorConfig) -> Result<(), SessionError>
where
    S: RemoteSession + ?Sized,
{
    for feed in FeedId::ALL {
        session.subscribe(feed, config.feed_name(feed))?;
    }
    Ok(())
}

/// Subscribe both feeds, retrying with a fixed delay until it succeeds
///
/// Values for a feed that was never subscribed are dropped, so the
/// monitor cannot do anything useful until this returns. `on_failure`
/// sees the 1-based attempt number and the error before each sleep.
/// Returns the number of failed attempts.
pub fn subscribe_with_retry<S, D, F>(
    session: &mut S,
    config: &MonitorConfig,
    delay: &mut D,
    retry_ms: u32,
    mut on_failure: F,
) -> u32
where
    S: RemoteSession + ?Sized,
    D: DelayNs,
    F: FnMut(u32, SessionError),
{
    let mut failures = 0u32;
    while let Err(e) = subscribe_feeds(session, config) {
        failures = failures.saturating_add(1);
        on_failure(failures, e);
        delay.delay_ms(retry_ms);
    }
    failures
}

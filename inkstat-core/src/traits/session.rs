//! Remote session trait
//!
//! A remote session keeps a connection to a pub/sub feed service. Values
//! arrive asynchronously from the service's point of view, but are handed
//! to the monitor only from inside [`RemoteSession::pump`], on the caller's
//! stack. Nothing else ever mutates the observation state.

use inkstat_protocol::{ConnectionState, FeedId, MessageError};

/// Errors talking to the remote session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    /// Transport read/write failed
    Io,
    /// Outgoing message could not be encoded
    Encode(MessageError),
}

impl From<MessageError> for SessionError {
    fn from(e: MessageError) -> Self {
        SessionError::Encode(e)
    }
}

/// Receiver for feed values delivered during a pump
pub trait ValueSink {
    /// A feed value message arrived
    fn deliver(&mut self, feed: FeedId, payload: &[u8]);
}

/// Connection to the remote feed service
pub trait RemoteSession {
    /// Start connecting
    fn connect(&mut self) -> Result<(), SessionError>;

    /// Overall connection status
    ///
    /// May perform I/O to refresh the status. Compare against the
    /// connected threshold with [`ConnectionState::is_connected`].
    fn status(&mut self) -> ConnectionState;

    /// Network-level status from the last report
    fn network_status(&self) -> ConnectionState;

    /// Service-level (MQTT) status from the last report
    fn service_status(&self) -> ConnectionState;

    /// Bind a feed to a named remote feed and start delivering its values
    fn subscribe(&mut self, feed: FeedId, name: &str) -> Result<(), SessionError>;

    /// Service the connection, delivering any pending values to `sink`
    fn pump(&mut self, sink: &mut dyn ValueSink) -> Result<(), SessionError>;

    /// Ask for a feed's current value
    ///
    /// Fire-and-forget: the value arrives later through [`pump`](Self::pump).
    fn request_value(&mut self, feed: FeedId) -> Result<(), SessionError>;
}

//! Remote session over a serial link to a network bridge
//!
//! The bridge co-processor owns the network and the feed service
//! connection. The controller drives it with framed [`HostMessage`]s and
//! reads back [`BridgeMessage`]s. Reads never block: only bytes the link
//! reports as ready are consumed, so a reply to a request usually shows up
//! on a later call.

use embedded_io::{Read, ReadReady, Write};
use inkstat_protocol::{
    BridgeMessage, ConnectionState, FeedId, FrameParser, HostMessage, MessageError,
    MAX_FRAME_SIZE,
};

use crate::traits::{RemoteSession, SessionError, ValueSink};

/// Bytes pulled from the link per read
const RX_CHUNK_SIZE: usize = 64;

/// Upper bound on reads per drain, so a chatty bridge cannot stall a tick
const MAX_READS_PER_DRAIN: usize = 16;

/// [`RemoteSession`] backed by a bridge on a serial link
pub struct BridgeSession<L> {
    link: L,
    parser: FrameParser,
    overall: ConnectionState,
    network: ConnectionState,
    service: ConnectionState,
    /// Indexed by feed; values for unsubscribed feeds are dropped
    subscribed: [bool; FeedId::ALL.len()],
    rx_errors: u32,
}

impl<L> BridgeSession<L>
where
    L: Read + Write + ReadReady,
{
    /// Wrap a link; nothing is sent until [`RemoteSession::connect`]
    pub fn new(link: L) -> Self {
        Self {
            link,
            parser: FrameParser::new(),
            overall: ConnectionState::Idle,
            network: ConnectionState::Idle,
            service: ConnectionState::Idle,
            subscribed: [false; FeedId::ALL.len()],
            rx_errors: 0,
        }
    }

    /// Received frames that failed to parse or decode
    pub fn rx_errors(&self) -> u32 {
        self.rx_errors
    }

    /// True if values for `feed` are being delivered
    pub fn is_subscribed(&self, feed: FeedId) -> bool {
        self.subscribed[feed_index(feed)]
    }

    /// Give the link back
    pub fn release(self) -> L {
        self.link
    }

    fn send(&mut self, message: HostMessage<'_>) -> Result<(), SessionError> {
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let len = message
            .to_frame()?
            .encode(&mut buf)
            .map_err(MessageError::from)?;
        self.link
            .write_all(&buf[..len])
            .map_err(|_| SessionError::Io)?;
        self.link.flush().map_err(|_| SessionError::Io)
    }

    /// Consume every ready byte, handling complete frames as they finish
    fn drain<'s>(
        &mut self,
        mut sink: Option<&mut (dyn ValueSink + 's)>,
    ) -> Result<(), SessionError> {
        let mut buf = [0u8; RX_CHUNK_SIZE];

        for _ in 0..MAX_READS_PER_DRAIN {
            if !self.link.read_ready().map_err(|_| SessionError::Io)? {
                break;
            }
            let n = self.link.read(&mut buf).map_err(|_| SessionError::Io)?;
            if n == 0 {
                break;
            }

            for &byte in &buf[..n] {
                match self.parser.feed(byte) {
                    Ok(Some(frame)) => match BridgeMessage::from_frame(&frame) {
                        Ok(message) => self.handle(message, sink.as_deref_mut()),
                        Err(_) => self.rx_errors = self.rx_errors.wrapping_add(1),
                    },
                    Ok(None) => {}
                    Err(_) => self.rx_errors = self.rx_errors.wrapping_add(1),
                }
            }
        }
        Ok(())
    }

    fn handle<'s>(&mut self, message: BridgeMessage, sink: Option<&mut (dyn ValueSink + 's)>) {
        match message {
            BridgeMessage::Status {
                overall,
                network,
                service,
            } => {
                self.overall = overall;
                self.network = network;
                self.service = service;
            }
            BridgeMessage::Value { feed, payload } => {
                if let Some(sink) = sink {
                    if self.is_subscribed(feed) {
                        sink.deliver(feed, &payload);
                    }
                }
            }
        }
    }
}

impl<L> RemoteSession for BridgeSession<L>
where
    L: Read + Write + ReadReady,
{
    fn connect(&mut self) -> Result<(), SessionError> {
        self.send(HostMessage::Connect)
    }

    /// Returns the most recent report; a failed query leaves it unchanged
    fn status(&mut self) -> ConnectionState {
        if self.send(HostMessage::StatusQuery).is_ok() {
            let _ = self.drain(None);
        }
        self.overall
    }

    fn network_status(&self) -> ConnectionState {
        self.network
    }

    fn service_status(&self) -> ConnectionState {
        self.service
    }

    fn subscribe(&mut self, feed: FeedId, name: &str) -> Result<(), SessionError> {
        self.send(HostMessage::Subscribe { feed, name })?;
        self.subscribed[feed_index(feed)] = true;
        Ok(())
    }

    fn pump(&mut self, sink: &mut dyn ValueSink) -> Result<(), SessionError> {
        self.send(HostMessage::Run)?;
        self.drain(Some(sink))
    }

    fn request_value(&mut self, feed: FeedId) -> Result<(), SessionError> {
        self.send(HostMessage::Get { feed })
    }
}

fn feed_index(feed: FeedId) -> usize {
    match feed {
        FeedId::Temperature => 0,
        FeedId::Humidity => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::{ErrorKind, ErrorType};
    use heapless::{Deque, Vec};
    use inkstat_protocol::Frame;

    /// In-memory link: `rx` is what the bridge has sent, `tx` what we wrote
    #[derive(Default)]
    struct MockLink {
        rx: Deque<u8, 1024>,
        tx: Vec<u8, 1024>,
        broken: bool,
    }

    impl MockLink {
        fn push_message(&mut self, message: &BridgeMessage) {
            let bytes = message.to_frame().unwrap().encode_to_vec().unwrap();
            self.push_bytes(&bytes);
        }

        fn push_bytes(&mut self, bytes: &[u8]) {
            for &b in bytes {
                self.rx.push_back(b).unwrap();
            }
        }

        /// Decode everything written so far
        fn sent(&self) -> Vec<Frame, 16> {
            let mut parser = FrameParser::new();
            let mut frames = Vec::new();
            for &b in &self.tx {
                if let Ok(Some(frame)) = parser.feed(b) {
                    frames.push(frame).unwrap();
                }
            }
            frames
        }
    }

    impl ErrorType for MockLink {
        type Error = ErrorKind;
    }

    impl Read for MockLink {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            if self.broken {
                return Err(ErrorKind::BrokenPipe);
            }
            let mut n = 0;
            while n < buf.len() {
                match self.rx.pop_front() {
                    Some(b) => {
                        buf[n] = b;
                        n += 1;
                    }
                    None => break,
                }
            }
            Ok(n)
        }
    }

    impl ReadReady for MockLink {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.rx.is_empty())
        }
    }

    impl Write for MockLink {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            if self.broken {
                return Err(ErrorKind::BrokenPipe);
            }
            self.tx.extend_from_slice(buf).map_err(|_| ErrorKind::OutOfMemory)?;
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        values: Vec<(FeedId, Vec<u8, 32>), 8>,
    }

    impl ValueSink for RecordingSink {
        fn deliver(&mut self, feed: FeedId, payload: &[u8]) {
            self.values
                .push((feed, Vec::from_slice(payload).unwrap()))
                .unwrap();
        }
    }

    fn value(feed: FeedId, text: &[u8]) -> BridgeMessage {
        BridgeMessage::Value {
            feed,
            payload: Vec::from_slice(text).unwrap(),
        }
    }

    fn status(overall: ConnectionState) -> BridgeMessage {
        BridgeMessage::Status {
            overall,
            network: ConnectionState::NetConnected,
            service: overall,
        }
    }

    #[test]
    fn test_connect_sends_connect_frame() {
        let mut session = BridgeSession::new(MockLink::default());
        session.connect().unwrap();

        let sent = session.release().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            HostMessage::from_frame(&sent[0]).unwrap(),
            HostMessage::Connect
        );
    }

    #[test]
    fn test_status_without_reply_is_idle() {
        let mut session = BridgeSession::new(MockLink::default());
        assert_eq!(session.status(), ConnectionState::Idle);
        assert_eq!(session.network_status(), ConnectionState::Idle);
    }

    #[test]
    fn test_status_reads_report() {
        let mut link = MockLink::default();
        link.push_message(&status(ConnectionState::Connected));
        let mut session = BridgeSession::new(link);

        assert_eq!(session.status(), ConnectionState::Connected);
        assert_eq!(session.network_status(), ConnectionState::NetConnected);
        assert_eq!(session.service_status(), ConnectionState::Connected);

        let sent = session.release().sent();
        assert_eq!(
            HostMessage::from_frame(&sent[0]).unwrap(),
            HostMessage::StatusQuery
        );
    }

    #[test]
    fn test_status_keeps_last_report_on_link_failure() {
        let mut link = MockLink::default();
        link.push_message(&status(ConnectionState::Connected));
        let mut session = BridgeSession::new(link);
        session.status();

        session.link.broken = true;
        assert_eq!(session.status(), ConnectionState::Connected);
    }

    #[test]
    fn test_pump_delivers_subscribed_values() {
        let mut session = BridgeSession::new(MockLink::default());
        session.subscribe(FeedId::Temperature, "temperature-c").unwrap();
        session.subscribe(FeedId::Humidity, "humidity").unwrap();
        session.link.push_message(&value(FeedId::Temperature, b"21.50"));
        session.link.push_message(&value(FeedId::Humidity, b"44.0"));

        let mut sink = RecordingSink::default();
        session.pump(&mut sink).unwrap();

        assert_eq!(sink.values.len(), 2);
        assert_eq!(sink.values[0].0, FeedId::Temperature);
        assert_eq!(&sink.values[0].1[..], b"21.50");
        assert_eq!(sink.values[1].0, FeedId::Humidity);
        assert_eq!(&sink.values[1].1[..], b"44.0");

        let sent = session.release().sent();
        let last = sent.last().unwrap();
        assert_eq!(HostMessage::from_frame(last).unwrap(), HostMessage::Run);
    }

    #[test]
    fn test_unsubscribed_values_are_dropped() {
        let mut session = BridgeSession::new(MockLink::default());
        session.subscribe(FeedId::Humidity, "humidity").unwrap();
        session.link.push_message(&value(FeedId::Temperature, b"21.5"));

        let mut sink = RecordingSink::default();
        session.pump(&mut sink).unwrap();
        assert!(sink.values.is_empty());
        assert!(!session.is_subscribed(FeedId::Temperature));
        assert!(session.is_subscribed(FeedId::Humidity));
    }

    #[test]
    fn test_values_during_status_are_dropped() {
        let mut session = BridgeSession::new(MockLink::default());
        session.subscribe(FeedId::Temperature, "temperature-c").unwrap();
        session.link.push_message(&value(FeedId::Temperature, b"1.0"));
        session.status();

        let mut sink = RecordingSink::default();
        session.pump(&mut sink).unwrap();
        assert!(sink.values.is_empty());
    }

    #[test]
    fn test_pump_updates_status_and_counts_garbage() {
        let mut session = BridgeSession::new(MockLink::default());
        // Valid frame of an unknown message type, then a status report
        let unknown = Frame::new(0x7F, &[1, 2]).unwrap().encode_to_vec().unwrap();
        session.link.push_bytes(&unknown);
        session.link.push_message(&status(ConnectionState::FingerprintValid));

        session.pump(&mut RecordingSink::default()).unwrap();
        assert_eq!(session.rx_errors(), 1);
        assert_eq!(session.status(), ConnectionState::FingerprintValid);
    }

    #[test]
    fn test_pump_reports_link_failure() {
        let mut session = BridgeSession::new(MockLink::default());
        session.link.broken = true;
        assert_eq!(
            session.pump(&mut RecordingSink::default()),
            Err(SessionError::Io)
        );
    }

    #[test]
    fn test_request_value_sends_get() {
        let mut session = BridgeSession::new(MockLink::default());
        session.request_value(FeedId::Humidity).unwrap();
        let sent = session.release().sent();
        assert_eq!(
            HostMessage::from_frame(&sent[0]).unwrap(),
            HostMessage::Get {
                feed: FeedId::Humidity
            }
        );
    }

    #[test]
    fn test_subscribe_rejects_long_name() {
        let mut session = BridgeSession::new(MockLink::default());
        let long = [b'f'; 65];
        let long = core::str::from_utf8(&long).unwrap();
        assert!(session.subscribe(FeedId::Temperature, long).is_err());
        assert!(!session.is_subscribed(FeedId::Temperature));
    }
}

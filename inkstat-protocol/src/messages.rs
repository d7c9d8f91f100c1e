//! Message types for the bridge link
//!
//! Message types are divided into two categories:
//! - Controller → Bridge: connection control, subscriptions, value requests
//! - Bridge → Controller: status reports, feed values

use heapless::Vec;

use crate::feed::{FeedId, MAX_FEED_NAME_LEN, MAX_VALUE_LEN};
use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use crate::status::ConnectionState;

// Message type IDs: Controller → Bridge
pub const MSG_CONNECT: u8 = 0x40;
pub const MSG_STATUS_QUERY: u8 = 0x41;
pub const MSG_SUBSCRIBE: u8 = 0x42;
pub const MSG_GET: u8 = 0x43;
pub const MSG_RUN: u8 = 0x44;

// Message type IDs: Bridge → Controller
pub const MSG_STATUS: u8 = 0x50;
pub const MSG_VALUE: u8 = 0x51;

/// Errors decoding a message from a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    /// Frame type is not a known message
    UnknownType(u8),
    /// Payload shorter than the message requires
    Truncated,
    /// Feed byte does not name a known feed
    UnknownFeed(u8),
    /// Status byte is not a known connection state
    UnknownStatus(u8),
    /// Name or value longer than the protocol allows
    TooLong,
    /// Underlying frame error
    Frame(FrameError),
}

impl From<FrameError> for MessageError {
    fn from(e: FrameError) -> Self {
        MessageError::Frame(e)
    }
}

/// Messages from the controller to the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostMessage<'a> {
    /// Start connecting (network first, then the feed service)
    Connect,
    /// Ask for a status report
    StatusQuery,
    /// Bind a feed to a named remote feed
    Subscribe { feed: FeedId, name: &'a str },
    /// Request the current value of a feed
    Get { feed: FeedId },
    /// Service the connection and flush pending deliveries
    Run,
}

impl<'a> HostMessage<'a> {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, MessageError> {
        match self {
            HostMessage::Connect => Ok(Frame::empty(MSG_CONNECT)),
            HostMessage::StatusQuery => Ok(Frame::empty(MSG_STATUS_QUERY)),
            HostMessage::Subscribe { feed, name } => {
                // Payload: [feed][len][name...]
                let name = name.as_bytes();
                if name.len() > MAX_FEED_NAME_LEN {
                    return Err(MessageError::TooLong);
                }
                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                payload
                    .extend_from_slice(&[feed.to_byte(), name.len() as u8])
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                payload
                    .extend_from_slice(name)
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                Ok(Frame::new(MSG_SUBSCRIBE, &payload)?)
            }
            HostMessage::Get { feed } => Ok(Frame::new(MSG_GET, &[feed.to_byte()])?),
            HostMessage::Run => Ok(Frame::empty(MSG_RUN)),
        }
    }

    /// Parse a message from a frame (bridge side, and for testing)
    pub fn from_frame(frame: &'a Frame) -> Result<Self, MessageError> {
        match frame.msg_type {
            MSG_CONNECT => Ok(HostMessage::Connect),
            MSG_STATUS_QUERY => Ok(HostMessage::StatusQuery),
            MSG_SUBSCRIBE => {
                let (feed, name) = split_feed_and_bytes(&frame.payload, MAX_FEED_NAME_LEN)?;
                let name = core::str::from_utf8(name).map_err(|_| FrameError::InvalidFrame)?;
                Ok(HostMessage::Subscribe { feed, name })
            }
            MSG_GET => {
                let byte = *frame.payload.first().ok_or(MessageError::Truncated)?;
                let feed = FeedId::from_byte(byte).ok_or(MessageError::UnknownFeed(byte))?;
                Ok(HostMessage::Get { feed })
            }
            MSG_RUN => Ok(HostMessage::Run),
            other => Err(MessageError::UnknownType(other)),
        }
    }
}

/// Messages from the bridge to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeMessage {
    /// Status report: overall, network level and service level
    Status {
        overall: ConnectionState,
        network: ConnectionState,
        service: ConnectionState,
    },
    /// Latest value of a feed, as the ASCII text the service sent
    Value {
        feed: FeedId,
        payload: Vec<u8, MAX_VALUE_LEN>,
    },
}

impl BridgeMessage {
    /// Parse a message from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, MessageError> {
        match frame.msg_type {
            MSG_STATUS => {
                if frame.payload.len() < 3 {
                    return Err(MessageError::Truncated);
                }
                let state = |byte: u8| {
                    ConnectionState::from_byte(byte).ok_or(MessageError::UnknownStatus(byte))
                };
                Ok(BridgeMessage::Status {
                    overall: state(frame.payload[0])?,
                    network: state(frame.payload[1])?,
                    service: state(frame.payload[2])?,
                })
            }
            MSG_VALUE => {
                let (feed, bytes) = split_feed_and_bytes(&frame.payload, MAX_VALUE_LEN)?;
                let payload = Vec::from_slice(bytes).map_err(|_| MessageError::TooLong)?;
                Ok(BridgeMessage::Value { feed, payload })
            }
            other => Err(MessageError::UnknownType(other)),
        }
    }

    /// Encode this message into a frame (bridge side, and for testing)
    pub fn to_frame(&self) -> Result<Frame, MessageError> {
        match self {
            BridgeMessage::Status {
                overall,
                network,
                service,
            } => Ok(Frame::new(
                MSG_STATUS,
                &[overall.to_byte(), network.to_byte(), service.to_byte()],
            )?),
            BridgeMessage::Value { feed, payload } => {
                let mut bytes = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                bytes
                    .extend_from_slice(&[feed.to_byte(), payload.len() as u8])
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                bytes
                    .extend_from_slice(payload)
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                Ok(Frame::new(MSG_VALUE, &bytes)?)
            }
        }
    }
}

/// Split a `[feed][len][bytes...]` payload
fn split_feed_and_bytes(payload: &[u8], max_len: usize) -> Result<(FeedId, &[u8]), MessageError> {
    let [feed_byte, len, rest @ ..] = payload else {
        return Err(MessageError::Truncated);
    };
    let feed = FeedId::from_byte(*feed_byte).ok_or(MessageError::UnknownFeed(*feed_byte))?;
    let len = *len as usize;
    if len > max_len {
        return Err(MessageError::TooLong);
    }
    let bytes = rest.get(..len).ok_or(MessageError::Truncated)?;
    Ok((feed, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_message_connect() {
        let frame = HostMessage::Connect.to_frame().unwrap();
        assert_eq!(frame.msg_type, MSG_CONNECT);
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn test_host_message_subscribe() {
        let msg = HostMessage::Subscribe {
            feed: FeedId::Humidity,
            name: "humidity",
        };
        let frame = msg.to_frame().unwrap();
        assert_eq!(frame.msg_type, MSG_SUBSCRIBE);
        assert_eq!(frame.payload[0], 0x02); // feed
        assert_eq!(frame.payload[1], 8); // len
        assert_eq!(&frame.payload[2..], b"humidity");

        assert_eq!(HostMessage::from_frame(&frame), Ok(msg));
    }

    #[test]
    fn test_host_message_subscribe_name_too_long() {
        let name = core::str::from_utf8(&[b'x'; MAX_FEED_NAME_LEN + 1]).unwrap();
        let msg = HostMessage::Subscribe {
            feed: FeedId::Temperature,
            name,
        };
        assert_eq!(msg.to_frame(), Err(MessageError::TooLong));
    }

    #[test]
    fn test_host_message_get() {
        let frame = HostMessage::Get {
            feed: FeedId::Temperature,
        }
        .to_frame()
        .unwrap();
        assert_eq!(frame.msg_type, MSG_GET);
        assert_eq!(frame.payload.as_slice(), &[0x01]);
    }

    #[test]
    fn test_bridge_status_parse() {
        let frame = Frame::new(MSG_STATUS, &[21, 20, 21]).unwrap();
        assert_eq!(
            BridgeMessage::from_frame(&frame),
            Ok(BridgeMessage::Status {
                overall: ConnectionState::Connected,
                network: ConnectionState::NetConnected,
                service: ConnectionState::Connected,
            })
        );
    }

    #[test]
    fn test_bridge_status_rejects_unknown_code() {
        let frame = Frame::new(MSG_STATUS, &[21, 99, 21]).unwrap();
        assert_eq!(
            BridgeMessage::from_frame(&frame),
            Err(MessageError::UnknownStatus(99))
        );
    }

    #[test]
    fn test_bridge_value_parse() {
        let frame = Frame::new(MSG_VALUE, &[0x01, 4, b'2', b'1', b'.', b'5']).unwrap();
        match BridgeMessage::from_frame(&frame).unwrap() {
            BridgeMessage::Value { feed, payload } => {
                assert_eq!(feed, FeedId::Temperature);
                assert_eq!(payload.as_slice(), b"21.5");
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn test_bridge_value_truncated() {
        let frame = Frame::new(MSG_VALUE, &[0x02, 5, b'4', b'7']).unwrap();
        assert_eq!(
            BridgeMessage::from_frame(&frame),
            Err(MessageError::Truncated)
        );
        let frame = Frame::new(MSG_VALUE, &[0x02]).unwrap();
        assert_eq!(
            BridgeMessage::from_frame(&frame),
            Err(MessageError::Truncated)
        );
    }

    #[test]
    fn test_bridge_value_unknown_feed() {
        let frame = Frame::new(MSG_VALUE, &[0x09, 1, b'1']).unwrap();
        assert_eq!(
            BridgeMessage::from_frame(&frame),
            Err(MessageError::UnknownFeed(0x09))
        );
    }

    #[test]
    fn test_unknown_message_type() {
        let frame = Frame::empty(0x7E);
        assert_eq!(
            BridgeMessage::from_frame(&frame),
            Err(MessageError::UnknownType(0x7E))
        );
        assert_eq!(
            HostMessage::from_frame(&frame),
            Err(MessageError::UnknownType(0x7E))
        );
    }

    #[test]
    fn test_bridge_value_to_frame_matches_parser_layout() {
        let msg = BridgeMessage::Value {
            feed: FeedId::Humidity,
            payload: Vec::from_slice(b"47.25").unwrap(),
        };
        let frame = msg.to_frame().unwrap();
        assert_eq!(frame.payload.as_slice(), &[0x02, 5, b'4', b'7', b'.', b'2', b'5']);
        assert_eq!(BridgeMessage::from_frame(&frame), Ok(msg));
    }
}

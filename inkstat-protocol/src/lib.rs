//! Inkstat Bridge Communication Protocol
//!
//! This crate defines the UART protocol between the monitor controller
//! (RP2040) and the network bridge co-processor that owns Wi-Fi, TLS and
//! the connection to the remote feed service.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–250B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! The bridge is a "dumb modem": it connects when told to, forwards feed
//! values and reports its status. Scheduling stays on the controller.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod feed;
pub mod frame;
pub mod messages;
pub mod status;

pub use feed::{parse_value, FeedId, MAX_FEED_NAME_LEN, MAX_VALUE_LEN};
pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use messages::{BridgeMessage, HostMessage, MessageError};
pub use status::ConnectionState;

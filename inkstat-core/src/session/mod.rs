//! Remote session startup and the bridge-backed session

pub mod bridge;
pub mod connect;

pub use bridge::BridgeSession;
pub use connect::{subscribe_feeds, subscribe_with_retry, wait_for_connection, ConnectAttempt};

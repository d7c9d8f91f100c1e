//! Connection status reported by the bridge
//!
//! Statuses are ordered: everything at or above [`ConnectionState::Connected`]
//! means the remote service is reachable. Failure codes sit between the
//! idle states and the connected ones so a single comparison answers
//! "are we there yet".

/// Bridge connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    /// Nothing attempted yet
    #[default]
    Idle,
    /// Network link is down
    NetDisconnected,
    /// Service link is down
    Disconnected,
    /// TLS fingerprint not checked yet
    FingerprintUnknown,
    /// Could not join the network
    NetConnectFailed,
    /// Could not reach the service
    ConnectFailed,
    /// TLS fingerprint mismatch
    FingerprintInvalid,
    /// Service rejected the credentials
    AuthFailed,
    /// Network name not found
    SsidInvalid,
    /// Network joined, service not yet connected
    NetConnected,
    /// Service connected
    Connected,
    /// Service connected with a verified fingerprint
    FingerprintValid,
}

impl ConnectionState {
    /// Parse a status from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        use ConnectionState::*;
        Some(match byte {
            0 => Idle,
            1 => NetDisconnected,
            2 => Disconnected,
            3 => FingerprintUnknown,
            10 => NetConnectFailed,
            11 => ConnectFailed,
            12 => FingerprintInvalid,
            13 => AuthFailed,
            14 => SsidInvalid,
            20 => NetConnected,
            21 => Connected,
            22 => FingerprintValid,
            _ => return None,
        })
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        use ConnectionState::*;
        match self {
            Idle => 0,
            NetDisconnected => 1,
            Disconnected => 2,
            FingerprintUnknown => 3,
            NetConnectFailed => 10,
            ConnectFailed => 11,
            FingerprintInvalid => 12,
            AuthFailed => 13,
            SsidInvalid => 14,
            NetConnected => 20,
            Connected => 21,
            FingerprintValid => 22,
        }
    }

    /// True once the remote service is reachable
    pub fn is_connected(self) -> bool {
        self >= ConnectionState::Connected
    }

    /// Human-readable status text
    pub fn as_str(self) -> &'static str {
        use ConnectionState::*;
        match self {
            Idle => "Idle. Waiting for connect to be called...",
            NetDisconnected => "Network disconnected.",
            Disconnected => "Disconnected from the feed service.",
            FingerprintUnknown => "Fingerprint not checked.",
            NetConnectFailed => "Network connection failed.",
            ConnectFailed => "Feed service connection failed.",
            FingerprintInvalid => "Feed service SSL fingerprint verification failed.",
            AuthFailed => "Feed service authentication failed.",
            SsidInvalid => "Network SSID not found.",
            NetConnected => "Network connected.",
            Connected => "Feed service connected.",
            FingerprintValid => "Feed service SSL fingerprint verified.",
        }
    }
}
